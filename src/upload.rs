//! New uploads, in-place metadata edits and copying episodes between series.

use crate::error::{MediaError, Result};
use crate::form::{collection_to_options, MetadataForm, SelectOption};
use crate::messages::Messages;
use crate::models::metadata::find_field;
use crate::models::{CollectionKey, FieldValue, MetadataContainer, UploadRequest};
use crate::poller::Poller;
use crate::query::QueryContext;
use crate::requester::MediaApi;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

/// Field holding the series an episode belongs to. Its vocabulary lists the
/// series the user may post to, title to id.
pub const SERIES_FIELD: &str = "isPartOf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
	None,
	Pending,
	Success,
	Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
	Loading,
	Ready,
	/// Terminal: neither a series id nor a known series name was given.
	SeriesUnresolved,
	LoadFailed(String),
}

/// Finds the series a new upload goes to: the explicit id first, then the
/// name looked up in the `isPartOf` vocabulary.
pub fn resolve_series(context: &QueryContext, metadata: &[MetadataContainer]) -> Result<String> {
	if let Some(id) = &context.series {
		return Ok(id.clone());
	}
	let Some(name) = &context.series_name else {
		return Err(MediaError::SeriesUnresolved);
	};
	let collection = find_field(metadata, SERIES_FIELD).and_then(|f| f.collection.as_ref());
	let Some(collection) = collection else {
		return Err(MediaError::SeriesUnresolved);
	};
	collection
		.get(name)
		.or_else(|| {
			collection
				.iter()
				.find(|(key, _)| CollectionKey::parse(key).label == *name)
				.map(|(_, id)| id)
		})
		.cloned()
		.ok_or(MediaError::SeriesUnresolved)
}

pub struct UploadFlow {
	api: Arc<dyn MediaApi>,
	context: QueryContext,
	state: FlowState,
	form: MetadataForm,
	series_id: Option<String>,
	submit: SubmitState,
	copy: SubmitState,
	lock_error: Option<String>,
}

impl UploadFlow {
	pub fn new(api: Arc<dyn MediaApi>, context: QueryContext) -> Self {
		UploadFlow {
			api,
			context,
			state: FlowState::Loading,
			form: MetadataForm::default(),
			series_id: None,
			submit: SubmitState::None,
			copy: SubmitState::None,
			lock_error: None,
		}
	}

	/// Editing an existing episode rather than uploading a new one.
	pub fn is_edit(&self) -> bool {
		self.context.episode_id.is_some()
	}

	pub async fn load(&mut self) {
		let episode_id = self.context.episode_id.as_deref();
		let metadata = match self.api.get_edit_metadata(episode_id).await {
			Ok(metadata) if metadata.is_empty() => {
				self.state = FlowState::LoadFailed(MediaError::MetadataMissing.to_string());
				return;
			}
			Ok(metadata) => metadata,
			Err(err) => {
				tracing::warn!(%err, "could not load metadata");
				self.state = FlowState::LoadFailed(err.to_string());
				return;
			}
		};

		if self.is_edit() {
			self.series_id = self.context.series.clone();
			self.form = MetadataForm::new(metadata);
			self.state = FlowState::Ready;
			return;
		}

		match resolve_series(&self.context, &metadata) {
			Ok(series_id) => {
				tracing::debug!(%series_id, "target series resolved");
				let mut form = MetadataForm::new(metadata);
				if form.field(SERIES_FIELD).is_some() {
					form.replace_value(SERIES_FIELD, FieldValue::Text(series_id.clone()));
				}
				// The resolved series is part of the pristine state a reset returns to.
				self.form = MetadataForm::new(form.edited().to_vec());
				self.series_id = Some(series_id);
				self.state = FlowState::Ready;
			}
			Err(err) => {
				tracing::warn!(
					series_name = ?self.context.series_name,
					"{err}; uploads are disabled for this page"
				);
				self.form = MetadataForm::new(metadata);
				self.state = FlowState::SeriesUnresolved;
			}
		}
	}

	pub fn state(&self) -> &FlowState {
		&self.state
	}

	pub fn submit_state(&self) -> &SubmitState {
		&self.submit
	}

	pub fn copy_state(&self) -> &SubmitState {
		&self.copy
	}

	pub fn series_id(&self) -> Option<&str> {
		self.series_id.as_deref()
	}

	pub fn form(&self) -> &MetadataForm {
		&self.form
	}

	pub fn form_mut(&mut self) -> &mut MetadataForm {
		&mut self.form
	}

	pub fn can_submit(&self) -> bool {
		self.state == FlowState::Ready && self.submit != SubmitState::Pending
	}

	/// Sends the form. Returns whether a request was issued: nothing is sent
	/// while another submit is pending, before the flow is ready, or for a
	/// new upload without a presenter file.
	pub async fn submit(&mut self) -> bool {
		if !self.can_submit() {
			return false;
		}
		if !self.is_edit() && self.form.presenter().is_none() {
			tracing::debug!("no presenter file selected, not uploading");
			return false;
		}

		self.submit = SubmitState::Pending;
		let result = match (&self.context.episode_id, self.form.caption()) {
			(Some(episode_id), None) => self.api.set_event_metadata(episode_id, self.form.edited()).await,
			_ => self.api.upload(self.upload_request()).await,
		};
		match result {
			Ok(()) => {
				tracing::info!(edit = self.is_edit(), "submission accepted");
				self.submit = SubmitState::Success;
				if !self.is_edit() {
					self.form.reset();
				}
			}
			Err(err) => {
				tracing::warn!(%err, "submission failed");
				self.submit = SubmitState::Error(err.to_string());
			}
		}
		true
	}

	/// The series the form currently targets. A value picked in the form wins
	/// over the one resolved at load time.
	pub fn target_series(&self) -> Option<String> {
		self.form
			.field(SERIES_FIELD)
			.and_then(|f| f.value.as_text())
			.filter(|v| !v.is_empty())
			.map(str::to_owned)
			.or_else(|| self.series_id.clone())
	}

	fn upload_request(&self) -> UploadRequest {
		UploadRequest {
			event_id: self.context.episode_id.clone(),
			series_id: self.target_series(),
			series_name: self.context.series_name.clone(),
			metadata: self.form.edited().to_vec(),
			presenter: self.form.presenter().cloned(),
			caption: self.form.caption().cloned(),
		}
	}

	/// Series an episode can be copied to.
	pub fn series_choices(&self, messages: &Messages) -> Vec<SelectOption> {
		let field = self.form.field(SERIES_FIELD);
		collection_to_options(
			field.and_then(|f| f.collection.as_ref()),
			field.is_some_and(|f| f.translatable),
			messages,
		)
	}

	pub async fn copy_to_series(&mut self, target_series_id: &str) -> Result<()> {
		let Some(episode_id) = self.context.episode_id.clone() else {
			return Err(MediaError::Domain("only existing episodes can be copied".into()));
		};
		if target_series_id.is_empty() {
			return Err(MediaError::Domain("no target series selected".into()));
		}
		if self.copy == SubmitState::Pending {
			return Ok(());
		}
		self.copy = SubmitState::Pending;
		self.copy = match self.api.copy_episode_to_series(&episode_id, target_series_id).await {
			Ok(()) => SubmitState::Success,
			Err(err) => {
				tracing::warn!(%err, %episode_id, target_series_id, "copy failed");
				SubmitState::Error(err.to_string())
			}
		};
		Ok(())
	}

	/// Starts refreshing lock state of the edited episode. `None` for new
	/// uploads, which have nothing to lock.
	pub fn watch_locks(&self, interval: Duration) -> Option<LockWatch> {
		let episode_id = self.context.episode_id.clone()?;
		let api = self.api.clone();
		let poller = Poller::spawn("locks", interval, move || {
			let api = api.clone();
			let episode_id = episode_id.clone();
			async move {
				api.get_event_metadata(&episode_id).await.map_err(|err| {
					tracing::warn!(%err, "lock refresh failed");
					err.to_string()
				})
			}
		});
		Some(LockWatch { poller })
	}

	/// Merges a lock refresh into the working copy. A failed refresh is kept
	/// for display until the next successful one. Returns whether the page
	/// needs to be redrawn.
	pub fn apply_lock_refresh(&mut self, refresh: &LockRefresh) -> bool {
		match refresh {
			Ok(fresh) => {
				let cleared = self.lock_error.take().is_some();
				self.form.apply_locks(fresh) || cleared
			}
			Err(message) => {
				let changed = self.lock_error.as_deref() != Some(message.as_str());
				self.lock_error = Some(message.clone());
				changed
			}
		}
	}

	pub fn lock_error(&self) -> Option<&str> {
		self.lock_error.as_deref()
	}

	pub fn render(&self, messages: &Messages) -> String {
		let mut out = String::new();
		let heading = if self.is_edit() { "EDIT_EPISODE" } else { "NEW_UPLOAD" };
		let _ = writeln!(out, "== {} ==", messages.t(heading));
		match &self.state {
			FlowState::Loading => {
				let _ = writeln!(out, "{}", messages.t("LOADING"));
				return out;
			}
			FlowState::LoadFailed(message) => {
				let _ = writeln!(out, "{}", messages.t_with("GENERIC_ERROR", &[("message", message)]));
				return out;
			}
			FlowState::SeriesUnresolved => {
				let _ = writeln!(out, "{}", messages.t("NO_SERIES"));
				return out;
			}
			FlowState::Ready => {}
		}
		match &self.submit {
			SubmitState::Success if self.is_edit() => {
				let _ = writeln!(out, "{}", messages.t("EDIT_SUCCESS"));
			}
			SubmitState::Success => {
				let _ = writeln!(out, "{}", messages.t("UPLOAD_SUCCESS"));
			}
			SubmitState::Error(_) => {
				let _ = writeln!(out, "{}", messages.t("UPLOAD_FAILURE"));
				let _ = writeln!(out, "  {}", messages.t("UPLOAD_FAILURE_DESCRIPTION"));
			}
			SubmitState::None | SubmitState::Pending => {}
		}
		if let Some(message) = &self.lock_error {
			let _ = writeln!(out, "{}", messages.t_with("LOCK_REFRESH_FAILED", &[("message", message)]));
		}
		out.push_str(&self.form.render(messages, !self.is_edit(), self.submit == SubmitState::Pending));
		if self.is_edit() {
			match &self.copy {
				SubmitState::Success => {
					let _ = writeln!(out, "{}", messages.t("COPY_SUCCESS"));
				}
				SubmitState::Error(_) => {
					let _ = writeln!(out, "{}", messages.t("COPY_FAILURE"));
				}
				SubmitState::None | SubmitState::Pending => {}
			}
		}
		out
	}
}

/// Outcome of one lock refresh; errors are kept as display text.
pub type LockRefresh = std::result::Result<Vec<MetadataContainer>, String>;

/// Running lock refresh for one episode. Dropping it stops the refresh.
pub struct LockWatch {
	poller: Poller<LockRefresh>,
}

impl LockWatch {
	/// Next refresh outcome; `None` once the watch has ended.
	pub async fn next(&mut self) -> Option<LockRefresh> {
		if !self.poller.changed().await {
			return None;
		}
		self.poller.latest()
	}
}
