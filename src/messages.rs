//! Built-in English message table with i18next-style lookup.
//!
//! Unknown keys render as the key itself so backend-provided labels such as
//! `EVENTS.EVENTS.DETAILS.METADATA.TITLE` pass through untouched.

use regex::{Captures, Regex};
use std::collections::HashMap;

lazy_static! {
	static ref PLACEHOLDER: Regex = Regex::new(r"\{\{\s*(\w+)\s*\}\}").unwrap();
	static ref ENGLISH: HashMap<&'static str, &'static str> = [
		("SERIES_TITLE", "Series"),
		("UPLOAD_TITLE", "Upload"),
		("NEW_UPLOAD", "New upload"),
		("EDIT_EPISODE", "Edit episode"),
		("UPLOAD", "Upload"),
		("UPLOADING", "Uploading..."),
		("UPLOAD_SUCCESS", "Upload successful"),
		("UPLOAD_FAILURE", "Upload failed"),
		("UPLOAD_FAILURE_DESCRIPTION", "The file could not be uploaded. Please try again."),
		("EDIT_SUCCESS", "Metadata saved"),
		("COPY_TO_SERIES", "Copy to series"),
		("COPY_SUCCESS", "Episode copied"),
		("COPY_FAILURE", "Episode could not be copied"),
		("TITLE", "Title"),
		("STATUS", "Status"),
		("PRESENTER", "Presenter video"),
		("CAPTION", "Captions"),
		("NO_FILE_SELECTED", "No presenter file selected, nothing was uploaded."),
		("CURRENT_JOBS", "Current jobs"),
		("SELECT_OPTION", "Select an option"),
		("CREATOR", "Created by {{creator}}"),
		("RESULTS", "Results {{begin}}-{{end}} of {{total}}"),
		("GENERIC_ERROR", "An error occurred: {{message}}"),
		("NO_SERIES", "Cannot determine the series to upload to."),
		("LOCKED", "Locked: {{reason}}"),
		("LOCK_REFRESH_FAILED", "Could not refresh lock state: {{message}}"),
		("LOADING", "Loading..."),
		("DELETE", "Delete"),
		("DELETION_SUCCESS", "Episode deleted"),
		("DELETION_SUCCESS_DESCRIPTION", "It may take a moment until the episode disappears from the list."),
		("DELETION_FAILURE", "Deletion failed"),
		("DELETION_FAILURE_DESCRIPTION", "The episode could not be deleted."),
		("WELCOME", "Welcome to the media LTI tool."),
		("UNKNOWN_TOOL", "Unknown tool: {{tool}}"),
		("CANNOT_DISPLAY_CONTROL", "Cannot display control of type {{type}}"),
		("INSTANTIATED", "Created"),
		("RUNNING", "Processing"),
		("PAUSED", "Paused"),
		("STOPPED", "Stopped"),
		("FAILING", "Failing"),
		("FAILED", "Failed"),
		("SUCCEEDED", "Finished"),
		("FINISHED", "Finished"),
	]
	.into_iter()
	.collect();
}

/// Looks up and interpolates user-facing text.
#[derive(Debug, Clone, Default)]
pub struct Messages {
	overrides: HashMap<String, String>,
}

impl Messages {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces or adds a translation, e.g. from an external resource file.
	pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
		self.overrides.insert(key.into(), text.into());
		self
	}

	pub fn t(&self, key: &str) -> String {
		self.lookup(key).to_owned()
	}

	pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
		let template = self.lookup(key);
		PLACEHOLDER
			.replace_all(template, |caps: &Captures| {
				let name = &caps[1];
				args.iter()
					.find(|(k, _)| *k == name)
					.map(|(_, v)| (*v).to_owned())
					.unwrap_or_else(|| caps[0].to_owned())
			})
			.into_owned()
	}

	fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
		self.overrides
			.get(key)
			.map(String::as_str)
			.or_else(|| ENGLISH.get(key).copied())
			.unwrap_or(key)
	}
}
