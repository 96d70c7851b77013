//! The page's query string, read once per load.

use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryContext {
	pub tool: Option<String>,
	pub series: Option<String>,
	pub series_name: Option<String>,
	pub episode_id: Option<String>,
	pub debug: bool,
	pub deletion: bool,
	empty: bool,
}

impl QueryContext {
	pub fn parse(query: &str) -> Self {
		let query = query.strip_prefix('?').unwrap_or(query);
		let mut context = QueryContext {
			empty: query.trim().is_empty(),
			..Default::default()
		};
		for (key, value) in form_urlencoded::parse(query.as_bytes()) {
			let value = value.into_owned();
			match key.as_ref() {
				"tool" => context.tool = Some(value),
				"series" => context.series = non_empty(value),
				"seriesName" | "series_name" => context.series_name = non_empty(value),
				"episode_id" => context.episode_id = non_empty(value),
				"debug" => context.debug = value == "true",
				"deletion" => context.deletion = value == "true",
				other => tracing::trace!(key = other, "ignoring query parameter"),
			}
		}
		context
	}

	pub fn series_ref(&self) -> SeriesRef {
		match (&self.series, &self.series_name) {
			(Some(id), _) => SeriesRef::Id(id.clone()),
			(None, Some(name)) => SeriesRef::Name(name.clone()),
			(None, None) => SeriesRef::None,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.empty
	}
}

fn non_empty(value: String) -> Option<String> {
	if value.is_empty() {
		None
	} else {
		Some(value)
	}
}

/// How a request names its series: by id, which wins, or by title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesRef {
	Id(String),
	Name(String),
	None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
	Welcome,
	Series,
	Upload,
	Other(String),
}

impl Route {
	pub fn from_context(context: &QueryContext) -> Route {
		if context.is_empty() {
			return Route::Welcome;
		}
		match context.tool.as_deref() {
			None => Route::Welcome,
			Some("series") => Route::Series,
			Some("upload") => Route::Upload,
			Some(other) => Route::Other(other.to_owned()),
		}
	}
}
