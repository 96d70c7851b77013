use serde::Deserialize;

/// A backend ingest/processing job. The title is its only identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobResult {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub status: String,
}
