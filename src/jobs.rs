use crate::messages::Messages;
use crate::models::JobResult;
use crate::poller::Poller;
use crate::query::SeriesRef;
use crate::requester::MediaApi;
use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobsState {
	Loading,
	Loaded(Vec<JobResult>),
	Failed(String),
}

/// The "current jobs" table, refreshed while the view is alive.
pub struct JobsView {
	poller: Poller<JobsState>,
}

impl JobsView {
	pub fn mount(api: Arc<dyn MediaApi>, series: SeriesRef, interval: Duration) -> Self {
		let poller = Poller::spawn("jobs", interval, move || {
			let api = api.clone();
			let series = series.clone();
			async move {
				match api.get_jobs(&series).await {
					Ok(jobs) => JobsState::Loaded(jobs),
					Err(err) => {
						tracing::warn!(%err, "could not list jobs");
						JobsState::Failed(err.to_string())
					}
				}
			}
		});
		JobsView { poller }
	}

	pub fn state(&self) -> JobsState {
		self.poller.latest().unwrap_or(JobsState::Loading)
	}

	/// Waits for the next refresh.
	pub async fn refreshed(&mut self) -> Option<JobsState> {
		if self.poller.changed().await {
			Some(self.state())
		} else {
			None
		}
	}

	pub fn render(&self, messages: &Messages) -> String {
		render_jobs(&self.state(), messages)
	}
}

/// Title and translated status per job. Duplicate titles are kept.
pub fn job_rows(jobs: &[JobResult], messages: &Messages) -> Vec<(String, String)> {
	let mut seen = HashSet::new();
	for job in jobs {
		if !seen.insert(job.title.as_str()) {
			tracing::warn!(title = %job.title, "several jobs share a title");
		}
	}
	jobs.iter()
		.map(|job| (job.title.clone(), messages.t(&job.status)))
		.collect()
}

pub fn render_jobs(state: &JobsState, messages: &Messages) -> String {
	let mut out = String::new();
	let _ = writeln!(out, "== {} ==", messages.t("CURRENT_JOBS"));
	match state {
		JobsState::Loading => {
			let _ = writeln!(out, "{}", messages.t("LOADING"));
		}
		JobsState::Failed(message) => {
			let _ = writeln!(out, "{}", messages.t_with("GENERIC_ERROR", &[("message", message)]));
		}
		JobsState::Loaded(jobs) => {
			let _ = writeln!(out, "{} | {}", messages.t("TITLE"), messages.t("STATUS"));
			for (title, status) in job_rows(jobs, messages) {
				let _ = writeln!(out, "{title} | {status}");
			}
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn finished_job_renders_localized_status() {
		let jobs = vec![JobResult {
			title: "lec1".into(),
			status: "FINISHED".into(),
		}];
		let rows = job_rows(&jobs, &Messages::new());
		assert_eq!(rows, vec![("lec1".to_owned(), "Finished".to_owned())]);
		assert!(render_jobs(&JobsState::Loaded(jobs), &Messages::new()).contains("lec1 | Finished"));
	}

	#[test]
	fn duplicate_titles_both_render() {
		let job = JobResult {
			title: "same".into(),
			status: "RUNNING".into(),
		};
		assert_eq!(job_rows(&[job.clone(), job], &Messages::new()).len(), 2);
	}

	#[test]
	fn failure_replaces_table() {
		let out = render_jobs(&JobsState::Failed("boom".into()), &Messages::new());
		assert!(out.contains("An error occurred: boom"));
		assert!(!out.contains("Status"));
	}
}
