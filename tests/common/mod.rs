#![allow(dead_code)]

use async_trait::async_trait;
use lti_media::models::{JobResult, LtiData, MetadataContainer, SearchResults, UploadRequest};
use lti_media::requester::EpisodeQuery;
use lti_media::{MediaApi, MediaError, Result, SeriesRef};
use serde_json::json;
use std::sync::Mutex;

/// In-memory backend that records every call.
#[derive(Default)]
pub struct FakeApi {
	pub calls: Mutex<Vec<String>>,
	pub searches: Mutex<Vec<EpisodeQuery>>,
	pub uploads: Mutex<Vec<UploadRequest>>,
	pub search: SearchResults,
	pub roles: Option<Vec<String>>,
	pub course: Option<String>,
	pub metadata: Vec<MetadataContainer>,
	pub event_metadata: Mutex<Vec<MetadataContainer>>,
	pub jobs: Vec<JobResult>,
	pub fail_writes: bool,
	pub fail_event_metadata: bool,
}

impl FakeApi {
	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().unwrap().clone()
	}

	pub fn count(&self, prefix: &str) -> usize {
		self.calls().iter().filter(|c| c.starts_with(prefix)).count()
	}

	fn record(&self, call: impl Into<String>) {
		self.calls.lock().unwrap().push(call.into());
	}

	fn write_result(&self) -> Result<()> {
		if self.fail_writes {
			Err(MediaError::Domain("backend unavailable".into()))
		} else {
			Ok(())
		}
	}
}

#[async_trait]
impl MediaApi for FakeApi {
	async fn search_episodes(&self, query: &EpisodeQuery) -> Result<SearchResults> {
		self.record(format!("search {} {}", query.limit, query.offset));
		self.searches.lock().unwrap().push(query.clone());
		Ok(self.search.clone())
	}

	async fn delete_episode(&self, episode_id: &str) -> Result<()> {
		self.record(format!("delete {episode_id}"));
		self.write_result()
	}

	async fn get_lti(&self) -> Result<LtiData> {
		self.record("lti");
		match &self.roles {
			Some(roles) => Ok(LtiData {
				roles: roles.clone(),
				context_label: self.course.clone(),
			}),
			None => Err(MediaError::Domain("no session".into())),
		}
	}

	async fn get_edit_metadata(&self, episode_id: Option<&str>) -> Result<Vec<MetadataContainer>> {
		self.record(format!("editMetadata {}", episode_id.unwrap_or("-")));
		Ok(self.metadata.clone())
	}

	async fn get_event_metadata(&self, episode_id: &str) -> Result<Vec<MetadataContainer>> {
		self.record(format!("metadata {episode_id}"));
		if self.fail_event_metadata {
			return Err(MediaError::Domain("metadata service down".into()));
		}
		Ok(self.event_metadata.lock().unwrap().clone())
	}

	async fn set_event_metadata(&self, episode_id: &str, _metadata: &[MetadataContainer]) -> Result<()> {
		self.record(format!("setMetadata {episode_id}"));
		self.write_result()
	}

	async fn get_jobs(&self, series: &SeriesRef) -> Result<Vec<JobResult>> {
		self.record(format!("jobs {series:?}"));
		Ok(self.jobs.clone())
	}

	async fn upload(&self, request: UploadRequest) -> Result<()> {
		self.record("upload");
		self.uploads.lock().unwrap().push(request);
		self.write_result()
	}

	async fn copy_episode_to_series(&self, episode_id: &str, series_id: &str) -> Result<()> {
		self.record(format!("copy {episode_id} {series_id}"));
		self.write_result()
	}
}

pub fn episode_metadata() -> Vec<MetadataContainer> {
	serde_json::from_value(json!([{
		"flavor": "dublincore/episode",
		"title": "EVENTS.EVENTS.DETAILS.CATALOG.EPISODE",
		"fields": [
			{ "id": "title", "label": "TITLE", "value": "", "type": "text", "required": true },
			{ "id": "creator", "label": "CREATOR_LABEL", "value": [], "type": "mixed_text", "collection": {} },
			{ "id": "isPartOf", "label": "SERIES", "value": "", "type": "text", "collection": {
				"Algebra": "alg-1",
				"{\"label\":\"Physics\",\"order\":1}": "phys-1"
			} },
			{ "id": "duration", "label": "DURATION", "value": "", "type": "text", "readOnly": true }
		]
	}]))
	.unwrap()
}
