use super::one_or_many::{lenient_u64, one_or_many};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attachment {
	#[serde(rename = "type", default)]
	pub kind: String,
	#[serde(default)]
	pub url: String,
}

/// One episode as the search index reports it. Never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeSearchResult {
	pub id: String,
	pub title: String,
	pub creator: Option<String>,
	pub created: String,
	pub attachments: Vec<Attachment>,
	pub language: Option<String>,
	pub license: Option<String>,
}

impl EpisodeSearchResult {
	const PREVIEW_SUFFIX: &'static str = "/search+preview";

	/// URL of the search preview image, if the episode has one.
	pub fn preview_url(&self) -> Option<&str> {
		self.attachments
			.iter()
			.find(|a| a.kind.ends_with(Self::PREVIEW_SUFFIX))
			.map(|a| a.url.as_str())
	}

	pub fn player_url(&self) -> String {
		format!("/play/{}", self.id)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResults {
	pub results: Vec<EpisodeSearchResult>,
	pub total: u64,
	pub limit: u64,
	pub offset: u64,
}

#[derive(Deserialize)]
pub(crate) struct SearchEnvelope {
	#[serde(rename = "search-results")]
	search_results: RawSearchResults,
}

#[derive(Deserialize)]
struct RawSearchResults {
	#[serde(default, deserialize_with = "lenient_u64")]
	total: u64,
	#[serde(default, deserialize_with = "lenient_u64")]
	limit: u64,
	#[serde(default, deserialize_with = "lenient_u64")]
	offset: u64,
	#[serde(default, deserialize_with = "one_or_many")]
	result: Vec<RawEpisode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEpisode {
	id: String,
	#[serde(default)]
	dc_title: String,
	dc_creator: Option<String>,
	#[serde(default)]
	dc_created: String,
	dc_language: Option<String>,
	dc_license: Option<String>,
	#[serde(default)]
	mediapackage: RawMediaPackage,
}

#[derive(Deserialize, Default)]
struct RawMediaPackage {
	#[serde(default)]
	attachments: RawAttachments,
}

#[derive(Deserialize, Default)]
struct RawAttachments {
	#[serde(default, deserialize_with = "one_or_many")]
	attachment: Vec<Attachment>,
}

impl From<RawEpisode> for EpisodeSearchResult {
	fn from(raw: RawEpisode) -> Self {
		EpisodeSearchResult {
			id: raw.id,
			title: raw.dc_title,
			creator: raw.dc_creator,
			created: raw.dc_created,
			attachments: raw.mediapackage.attachments.attachment,
			language: raw.dc_language,
			license: raw.dc_license,
		}
	}
}

impl From<SearchEnvelope> for SearchResults {
	fn from(envelope: SearchEnvelope) -> Self {
		let raw = envelope.search_results;
		SearchResults {
			results: raw.result.into_iter().map(EpisodeSearchResult::from).collect(),
			total: raw.total,
			limit: raw.limit,
			offset: raw.offset,
		}
	}
}
