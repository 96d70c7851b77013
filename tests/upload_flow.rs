mod common;

use common::{episode_metadata, FakeApi};
use lti_media::models::{FieldValue, MediaFile};
use lti_media::upload::{FlowState, SubmitState, UploadFlow};
use lti_media::{Messages, QueryContext};
use std::sync::Arc;
use std::time::Duration;

fn api() -> FakeApi {
	FakeApi {
		metadata: episode_metadata(),
		..Default::default()
	}
}

async fn loaded(api: &Arc<FakeApi>, query: &str) -> UploadFlow {
	let mut flow = UploadFlow::new(api.clone(), QueryContext::parse(query));
	flow.load().await;
	flow
}

#[tokio::test]
async fn new_upload_without_file_sends_nothing() {
	let api = Arc::new(api());
	let mut flow = loaded(&api, "?tool=upload&series=alg-1").await;
	assert_eq!(flow.state(), &FlowState::Ready);

	flow.form_mut().set_value("title", FieldValue::Text("Week 1".into())).unwrap();
	assert!(!flow.submit().await);
	assert_eq!(api.count("upload"), 0);
	assert_eq!(flow.submit_state(), &SubmitState::None);
}

#[tokio::test]
async fn successful_new_upload_resets_the_form() {
	let api = Arc::new(api());
	let mut flow = loaded(&api, "?tool=upload&seriesName=Algebra").await;
	assert_eq!(flow.series_id(), Some("alg-1"));

	flow.form_mut().set_value("title", FieldValue::Text("Week 1".into())).unwrap();
	flow.form_mut().set_presenter_file(MediaFile::new("week1.mp4", vec![0, 1, 2]));
	assert!(flow.submit().await);

	assert_eq!(flow.submit_state(), &SubmitState::Success);
	assert_eq!(flow.form().field("title").unwrap().value, FieldValue::Text(String::new()));
	assert!(flow.form().presenter().is_none());
	assert_eq!(flow.form().field("isPartOf").unwrap().value, FieldValue::Text("alg-1".into()));

	let uploads = api.uploads.lock().unwrap();
	let request = &uploads[0];
	assert_eq!(request.series_id.as_deref(), Some("alg-1"));
	assert_eq!(request.series_name.as_deref(), Some("Algebra"));
	assert_eq!(request.presenter.as_ref().unwrap().mime_type, "video/mp4");
	assert!(request.event_id.is_none());
	let title = lti_media::models::metadata::find_field(&request.metadata, "title").unwrap();
	assert_eq!(title.value, FieldValue::Text("Week 1".into()));
}

#[tokio::test]
async fn edit_in_place_keeps_the_edits() {
	let api = Arc::new(api());
	let mut flow = loaded(&api, "?tool=upload&episode_id=ep-9").await;
	assert!(flow.is_edit());
	assert_eq!(api.calls(), vec!["editMetadata ep-9"]);

	flow.form_mut().set_value("title", FieldValue::Text("Renamed".into())).unwrap();
	assert!(flow.submit().await);

	assert_eq!(api.count("setMetadata ep-9"), 1);
	assert_eq!(api.count("upload"), 0);
	assert_eq!(flow.submit_state(), &SubmitState::Success);
	assert_eq!(flow.form().field("title").unwrap().value, FieldValue::Text("Renamed".into()));
	assert!(flow.render(&Messages::new()).contains("Metadata saved"));
}

#[tokio::test]
async fn edit_with_captions_goes_through_upload() {
	let api = Arc::new(api());
	let mut flow = loaded(&api, "?episode_id=ep-9").await;
	flow.form_mut().set_caption_file(MediaFile::new("ep.vtt", b"WEBVTT".to_vec()));
	assert!(flow.submit().await);
	let uploads = api.uploads.lock().unwrap();
	assert_eq!(uploads[0].event_id.as_deref(), Some("ep-9"));
	assert!(uploads[0].presenter.is_none());
}

#[tokio::test]
async fn unknown_series_name_never_submits() {
	let api = Arc::new(api());
	let mut flow = loaded(&api, "?tool=upload&seriesName=Chemistry").await;
	assert_eq!(flow.state(), &FlowState::SeriesUnresolved);

	flow.form_mut().set_presenter_file(MediaFile::new("a.mp4", vec![1]));
	assert!(!flow.submit().await);
	assert_eq!(api.count("upload"), 0);
	assert!(flow.render(&Messages::new()).contains("Cannot determine the series"));
}

#[tokio::test]
async fn failed_upload_keeps_the_form_for_retry() {
	let api = Arc::new(FakeApi {
		fail_writes: true,
		..api()
	});
	let mut flow = loaded(&api, "?series=alg-1").await;
	flow.form_mut().set_value("title", FieldValue::Text("Keep me".into())).unwrap();
	flow.form_mut().set_presenter_file(MediaFile::new("a.mp4", vec![1]));
	assert!(flow.submit().await);

	assert!(matches!(flow.submit_state(), SubmitState::Error(_)));
	assert_eq!(flow.form().field("title").unwrap().value, FieldValue::Text("Keep me".into()));
	assert!(flow.form().presenter().is_some());
	assert!(flow.render(&Messages::new()).contains("Upload failed"));
}

#[tokio::test]
async fn empty_metadata_is_a_load_failure() {
	let api = Arc::new(FakeApi::default());
	let flow = loaded(&api, "?series=alg-1").await;
	assert!(matches!(flow.state(), FlowState::LoadFailed(_)));
	assert!(!flow.can_submit());
}

#[tokio::test]
async fn copy_to_series_targets_the_episode() {
	let api = Arc::new(api());
	let mut flow = loaded(&api, "?episode_id=ep-9").await;
	let choices = flow.series_choices(&Messages::new());
	assert_eq!(choices[0].label, "Physics");
	flow.copy_to_series("phys-1").await.unwrap();
	assert_eq!(api.count("copy ep-9 phys-1"), 1);
	assert_eq!(flow.copy_state(), &SubmitState::Success);
}

#[tokio::test]
async fn copy_needs_an_existing_episode() {
	let api = Arc::new(api());
	let mut flow = loaded(&api, "?series=alg-1").await;
	assert!(flow.copy_to_series("phys-1").await.is_err());
	assert_eq!(api.count("copy"), 0);
}

#[tokio::test(start_paused = true)]
async fn lock_refresh_flips_read_only_state() {
	let api = Arc::new(api());
	let mut locked = episode_metadata();
	locked[0].fields[0].read_only = true;
	locked[0].fields[0].lock_reason = Some("processing".into());
	*api.event_metadata.lock().unwrap() = locked;

	let mut flow = loaded(&api, "?episode_id=ep-9").await;
	flow.form_mut().set_value("title", FieldValue::Text("Draft".into())).unwrap();
	let mut watch = flow.watch_locks(Duration::from_millis(500)).unwrap();
	let fresh = watch.next().await.unwrap();
	assert!(flow.apply_lock_refresh(&fresh));

	let title = flow.form().field("title").unwrap();
	assert!(title.is_locked());
	assert_eq!(title.value, FieldValue::Text("Draft".into()));
	assert!(flow.form_mut().set_value("title", FieldValue::Text("x".into())).is_err());
}

#[tokio::test(start_paused = true)]
async fn failing_lock_refresh_is_shown() {
	let api = Arc::new(FakeApi {
		fail_event_metadata: true,
		..api()
	});
	let mut flow = loaded(&api, "?episode_id=ep-9").await;
	let mut watch = flow.watch_locks(Duration::from_millis(500)).unwrap();
	let refresh = watch.next().await.unwrap();
	assert!(refresh.is_err());
	assert!(flow.apply_lock_refresh(&refresh));
	assert!(!flow.apply_lock_refresh(&refresh));
	assert_eq!(flow.lock_error(), Some("metadata service down"));
	assert!(flow
		.render(&Messages::new())
		.contains("Could not refresh lock state: metadata service down"));

	assert!(flow.apply_lock_refresh(&Ok(episode_metadata())));
	assert_eq!(flow.lock_error(), None);
}

#[tokio::test]
async fn series_picked_in_the_form_is_the_upload_target() {
	let api = Arc::new(api());
	let mut flow = loaded(&api, "?tool=upload&series=alg-1").await;
	flow.form_mut().set_value("isPartOf", FieldValue::Text("phys-1".into())).unwrap();
	assert!(flow.form_mut().set_value("isPartOf", FieldValue::Text("chem-9".into())).is_err());
	assert_eq!(flow.target_series().as_deref(), Some("phys-1"));

	flow.form_mut().set_presenter_file(MediaFile::new("a.mp4", vec![1]));
	assert!(flow.submit().await);
	let uploads = api.uploads.lock().unwrap();
	let part_of = lti_media::models::metadata::find_field(&uploads[0].metadata, "isPartOf").unwrap();
	assert_eq!(part_of.value, FieldValue::Text("phys-1".into()));
	assert_eq!(uploads[0].series_id.as_deref(), Some("phys-1"));
}

#[tokio::test]
async fn new_uploads_have_no_lock_watch() {
	let api = Arc::new(api());
	let flow = loaded(&api, "?series=alg-1").await;
	assert!(flow.watch_locks(Duration::from_secs(1)).is_none());
}
