use crate::config::Config;
use crate::error::Result;
use crate::models::episode::SearchEnvelope;
use crate::models::lti::RawLti;
use crate::models::metadata::submission_json;
use crate::models::one_or_many::list_from_value;
use crate::models::{
	JobResult, LtiData, MediaFile, MetadataContainer, SearchResults, UploadRequest,
};
use crate::query::{QueryContext, SeriesRef};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;
use url::Url;

const SERVICE_PATH: &str = "lti-service-gui";

/// Field ids the tool lets users change. Everything else is display-only.
pub const EDITABLE_FIELDS: &[&str] = &["title", "language", "license", "creator", "isPartOf"];

/// Parameters of an episode search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeQuery {
	pub limit: u64,
	pub offset: u64,
	pub series: SeriesRef,
	pub episode_id: Option<String>,
	pub text: Option<String>,
}

impl EpisodeQuery {
	pub fn page(limit: u64, offset: u64, series: SeriesRef) -> Self {
		EpisodeQuery {
			limit,
			offset,
			series,
			episode_id: None,
			text: None,
		}
	}
}

/// One call per backend endpoint. Failures surface unchanged; no retries.
#[async_trait]
pub trait MediaApi: Send + Sync {
	async fn search_episodes(&self, query: &EpisodeQuery) -> Result<SearchResults>;
	async fn delete_episode(&self, episode_id: &str) -> Result<()>;
	async fn get_lti(&self) -> Result<LtiData>;
	async fn get_edit_metadata(&self, episode_id: Option<&str>) -> Result<Vec<MetadataContainer>>;
	async fn get_event_metadata(&self, episode_id: &str) -> Result<Vec<MetadataContainer>>;
	async fn set_event_metadata(&self, episode_id: &str, metadata: &[MetadataContainer]) -> Result<()>;
	async fn get_jobs(&self, series: &SeriesRef) -> Result<Vec<JobResult>>;
	async fn upload(&self, request: UploadRequest) -> Result<()>;
	async fn copy_episode_to_series(&self, episode_id: &str, series_id: &str) -> Result<()>;
}

/// HTTP implementation of [`MediaApi`].
pub struct Requester {
	net: Client,
	host: Url,
}

impl Requester {
	pub fn new(host: &str) -> Result<Requester> {
		Ok(Requester {
			net: Client::new(),
			host: Url::parse(host)?,
		})
	}

	/// Client for one page load; `debug=true` redirects to the development host.
	pub fn for_context(config: &Config, context: &QueryContext) -> Result<Requester> {
		let host = config.host_for(context);
		tracing::debug!(host, "using media backend");
		Self::new(host)
	}

	fn url(&self, segments: &[&str]) -> Result<Url> {
		let mut url = self.host.clone();
		url.path_segments_mut()
			.map_err(|_| "backend host cannot be a base URL")?
			.pop_if_empty()
			.extend(segments);
		Ok(url)
	}

	fn service_url(&self, segments: &[&str]) -> Result<Url> {
		let mut all = Vec::with_capacity(segments.len() + 1);
		all.push(SERVICE_PATH);
		all.extend_from_slice(segments);
		self.url(&all)
	}

	fn checked(response: std::result::Result<Response, reqwest::Error>) -> Result<Response> {
		let response = response?;
		let status = response.status();
		if !status.is_success() {
			tracing::warn!(%status, url = %response.url(), "backend rejected request");
		}
		Ok(response.error_for_status()?)
	}

	async fn get_json(&self, url: Url) -> Result<Value> {
		tracing::debug!(%url, "GET");
		let response = Self::checked(self.net.get(url).send().await)?;
		let text = response.text().await?;
		if text.trim().is_empty() {
			return Ok(Value::Null);
		}
		Ok(serde_json::from_str(&text)?)
	}

	fn file_part(file: MediaFile) -> Result<Part> {
		let part = Part::bytes(file.data)
			.file_name(file.file_name)
			.mime_str(&file.mime_type)?;
		Ok(part)
	}

	/// Named multipart parts in send order. The backend stops reading at the
	/// presenter track, so it has to be the last part.
	fn upload_parts(request: UploadRequest) -> Result<Vec<(&'static str, Part)>> {
		let metadata = submission_json(&request.metadata, EDITABLE_FIELDS)?;
		let mut parts = vec![
			("isPartOf", Part::text(request.series_id.unwrap_or_default())),
			("hidden_series_name", Part::text(request.series_name.unwrap_or_default())),
			("metadata", Part::text(metadata)),
		];
		if let Some(event_id) = request.event_id {
			parts.push(("eventId", Part::text(event_id)));
		}
		if let Some(caption) = request.caption {
			parts.push(("captions", Self::file_part(caption)?));
		}
		if let Some(presenter) = request.presenter {
			parts.push(("presenter", Self::file_part(presenter)?));
		}
		Ok(parts)
	}

	fn upload_form(request: UploadRequest) -> Result<Form> {
		Ok(Self::upload_parts(request)?
			.into_iter()
			.fold(Form::new(), |form, (name, part)| form.part(name, part)))
	}

	fn search_url(&self, query: &EpisodeQuery) -> Result<Url> {
		let mut url = self.url(&["search", "episode.json"])?;
		{
			let mut pairs = url.query_pairs_mut();
			pairs
				.append_pair("limit", &query.limit.to_string())
				.append_pair("offset", &query.offset.to_string());
			match &query.series {
				SeriesRef::Id(id) => {
					pairs.append_pair("sid", id);
				}
				SeriesRef::Name(name) => {
					pairs.append_pair("sname", name);
				}
				SeriesRef::None => {}
			}
			if let Some(id) = &query.episode_id {
				pairs.append_pair("id", id);
			}
			if let Some(text) = &query.text {
				pairs.append_pair("q", text);
			}
		}
		Ok(url)
	}

	fn jobs_url(&self, series: &SeriesRef) -> Result<Url> {
		let mut url = self.service_url(&["jobs"])?;
		match series {
			SeriesRef::Id(id) => {
				url.query_pairs_mut().append_pair("series", id);
			}
			SeriesRef::Name(name) => {
				url.query_pairs_mut().append_pair("series_name", name);
			}
			SeriesRef::None => {}
		}
		Ok(url)
	}
}

#[async_trait]
impl MediaApi for Requester {
	async fn search_episodes(&self, query: &EpisodeQuery) -> Result<SearchResults> {
		let url = self.search_url(query)?;
		let envelope: SearchEnvelope = serde_json::from_value(self.get_json(url).await?)?;
		Ok(envelope.into())
	}

	async fn delete_episode(&self, episode_id: &str) -> Result<()> {
		let url = self.service_url(&[episode_id])?;
		tracing::info!(episode_id, "deleting episode");
		Self::checked(self.net.delete(url).send().await)?;
		Ok(())
	}

	async fn get_lti(&self) -> Result<LtiData> {
		let raw: RawLti = serde_json::from_value(self.get_json(self.url(&["lti"])?).await?)?;
		Ok(raw.into())
	}

	async fn get_edit_metadata(&self, episode_id: Option<&str>) -> Result<Vec<MetadataContainer>> {
		let mut url = self.service_url(&["editMetadata"])?;
		if let Some(id) = episode_id {
			url.query_pairs_mut().append_pair("episode_id", id);
		}
		Ok(list_from_value(self.get_json(url).await?)?)
	}

	async fn get_event_metadata(&self, episode_id: &str) -> Result<Vec<MetadataContainer>> {
		let url = self.service_url(&[episode_id, "metadata"])?;
		Ok(list_from_value(self.get_json(url).await?)?)
	}

	async fn set_event_metadata(&self, episode_id: &str, metadata: &[MetadataContainer]) -> Result<()> {
		let url = self.service_url(&[episode_id, "metadata"])?;
		let body = submission_json(metadata, EDITABLE_FIELDS)?;
		tracing::info!(episode_id, "updating episode metadata");
		let form = Form::new().text("metadata", body);
		Self::checked(self.net.post(url).multipart(form).send().await)?;
		Ok(())
	}

	async fn get_jobs(&self, series: &SeriesRef) -> Result<Vec<JobResult>> {
		let url = self.jobs_url(series)?;
		Ok(list_from_value(self.get_json(url).await?)?)
	}

	async fn upload(&self, request: UploadRequest) -> Result<()> {
		let url = self.service_url(&[])?;
		tracing::info!(
			event_id = ?request.event_id,
			series_id = ?request.series_id,
			presenter = ?request.presenter.as_ref().map(|f| &f.file_name),
			"submitting upload"
		);
		let form = Self::upload_form(request)?;
		Self::checked(self.net.post(url).multipart(form).send().await)?;
		Ok(())
	}

	async fn copy_episode_to_series(&self, episode_id: &str, series_id: &str) -> Result<()> {
		let mut url = self.service_url(&[episode_id, "copy"])?;
		url.query_pairs_mut().append_pair("seriesId", series_id);
		tracing::info!(episode_id, series_id, "copying episode");
		Self::checked(self.net.post(url).send().await)?;
		Ok(())
	}
}
