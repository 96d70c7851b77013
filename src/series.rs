use crate::error::{MediaError, Result};
use crate::messages::Messages;
use crate::models::{EpisodeSearchResult, LtiData, SearchResults};
use crate::query::QueryContext;
use crate::requester::{EpisodeQuery, MediaApi};
use std::fmt::Write;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionBanner {
	Success,
	Failure,
}

/// Paginated episode list of one series.
pub struct SeriesView {
	api: Arc<dyn MediaApi>,
	context: QueryContext,
	page_size: u64,
	current_page: u64,
	search_results: Option<SearchResults>,
	lti: Option<LtiData>,
	http_errors: Vec<String>,
	deletion: Option<DeletionBanner>,
}

impl SeriesView {
	pub fn new(api: Arc<dyn MediaApi>, context: QueryContext, page_size: u64) -> Self {
		SeriesView {
			api,
			context,
			page_size: page_size.max(1),
			current_page: 1,
			search_results: None,
			lti: None,
			http_errors: Vec::new(),
			deletion: None,
		}
	}

	/// Initial load: the first page and the LTI roles, fetched together.
	pub async fn mount(&mut self) {
		let api = self.api.clone();
		let query = self.page_query();
		let (results, lti) = futures::join!(api.search_episodes(&query), api.get_lti());
		self.commit_results(results);
		match lti {
			Ok(lti) => self.lti = Some(lti),
			Err(err) => {
				tracing::warn!(%err, "could not read LTI context");
				self.http_errors.push(format!("LTI: {err}"));
			}
		}
	}

	fn page_query(&self) -> EpisodeQuery {
		EpisodeQuery::page(
			self.page_size,
			(self.current_page - 1).saturating_mul(self.page_size),
			self.context.series_ref(),
		)
	}

	fn commit_results(&mut self, results: Result<SearchResults>) {
		match results {
			Ok(results) => {
				tracing::debug!(page = self.current_page, count = results.results.len(), total = results.total, "episodes loaded");
				self.search_results = Some(results);
			}
			Err(err) => {
				tracing::warn!(%err, page = self.current_page, "episode search failed");
				self.http_errors.push(err.to_string());
			}
		}
	}

	pub async fn load_current_page(&mut self) {
		let results = self.api.search_episodes(&self.page_query()).await;
		self.commit_results(results);
	}

	/// Switches to a 1-based page. Clears the deletion banner.
	pub async fn change_page(&mut self, page: u64) {
		self.deletion = None;
		self.current_page = page.max(1);
		self.load_current_page().await;
	}

	pub fn can_delete(&self) -> bool {
		self.context.deletion && self.lti.as_ref().is_some_and(LtiData::is_instructor)
	}

	pub async fn delete_episode(&mut self, episode_id: &str) -> Result<()> {
		if !self.can_delete() {
			return Err(MediaError::Domain("deletion is not enabled for this user".into()));
		}
		self.deletion = Some(match self.api.delete_episode(episode_id).await {
			Ok(()) => DeletionBanner::Success,
			Err(err) => {
				tracing::warn!(%err, episode_id, "deletion failed");
				DeletionBanner::Failure
			}
		});
		Ok(())
	}

	pub fn current_page(&self) -> u64 {
		self.current_page
	}

	pub fn results(&self) -> Option<&SearchResults> {
		self.search_results.as_ref()
	}

	pub fn errors(&self) -> &[String] {
		&self.http_errors
	}

	pub fn deletion_banner(&self) -> Option<DeletionBanner> {
		self.deletion
	}

	pub fn page_count(&self) -> u64 {
		match &self.search_results {
			Some(sr) => sr.total.div_ceil(self.page_size),
			None => 0,
		}
	}

	/// `(begin, end, total)` of the visible slice, 1-based and inclusive.
	pub fn range(&self) -> Option<(u64, u64, u64)> {
		let sr = self.search_results.as_ref()?;
		let limit = if sr.limit == 0 { self.page_size } else { sr.limit };
		Some((
			sr.offset.saturating_add(1).min(sr.total),
			sr.offset.saturating_add(limit).min(sr.total),
			sr.total,
		))
	}

	pub fn render(&self, messages: &Messages) -> String {
		if let Some(first) = self.http_errors.first() {
			return messages.t_with("GENERIC_ERROR", &[("message", first)]);
		}
		let (Some(sr), Some((begin, end, total))) = (&self.search_results, self.range()) else {
			return messages.t("LOADING");
		};
		if self.lti.is_none() {
			return messages.t("LOADING");
		}

		let mut out = String::new();
		match self.lti.as_ref().and_then(|l| l.context_label.as_deref()) {
			Some(course) => {
				let _ = writeln!(out, "== {}: {course} ==", messages.t("SERIES_TITLE"));
			}
			None => {
				let _ = writeln!(out, "== {} ==", messages.t("SERIES_TITLE"));
			}
		}
		match self.deletion {
			Some(DeletionBanner::Success) => {
				let _ = writeln!(out, "{}", messages.t("DELETION_SUCCESS"));
				let _ = writeln!(out, "  {}", messages.t("DELETION_SUCCESS_DESCRIPTION"));
			}
			Some(DeletionBanner::Failure) => {
				let _ = writeln!(out, "{}", messages.t("DELETION_FAILURE"));
				let _ = writeln!(out, "  {}", messages.t("DELETION_FAILURE_DESCRIPTION"));
			}
			None => {}
		}
		let (begin, end, total) = (begin.to_string(), end.to_string(), total.to_string());
		let _ = writeln!(
			out,
			"{}",
			messages.t_with("RESULTS", &[("begin", &begin), ("end", &end), ("total", &total)])
		);
		let deletable = self.can_delete();
		for episode in &sr.results {
			render_episode(&mut out, episode, deletable, messages);
		}
		let _ = writeln!(out, "Page {} / {}", self.current_page, self.page_count().max(1));
		out
	}
}

fn render_episode(out: &mut String, episode: &EpisodeSearchResult, deletable: bool, messages: &Messages) {
	let _ = writeln!(out, "- {}  <{}>", episode.title, episode.player_url());
	if let Some(creator) = &episode.creator {
		let _ = writeln!(out, "    {}", messages.t_with("CREATOR", &[("creator", creator)]));
	}
	let _ = writeln!(out, "    {}", episode.created);
	if let Some(preview) = episode.preview_url() {
		let _ = writeln!(out, "    preview: {preview}");
	}
	if deletable {
		let _ = writeln!(out, "    [{}: {}]", messages.t("DELETE"), episode.id);
	}
}
