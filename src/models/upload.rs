use super::metadata::MetadataContainer;
use crate::error::Result;
use crate::format::Format;
use std::path::Path;

/// A file picked for upload, held in memory for the duration of one submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
	pub file_name: String,
	pub mime_type: String,
	pub data: Vec<u8>,
}

impl MediaFile {
	pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
		let file_name = file_name.into();
		let mime_type = Format::from_path(&file_name).mime_type().to_owned();
		MediaFile {
			file_name,
			mime_type,
			data,
		}
	}

	pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let data = tokio::fs::read(path).await?;
		let file_name = path
			.file_name()
			.and_then(|n| n.to_str())
			.unwrap_or("upload")
			.to_owned();
		Ok(MediaFile::new(file_name, data))
	}
}

/// Multipart payload for `POST /lti-service-gui`.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
	pub event_id: Option<String>,
	pub series_id: Option<String>,
	pub series_name: Option<String>,
	pub metadata: Vec<MetadataContainer>,
	pub presenter: Option<MediaFile>,
	pub caption: Option<MediaFile>,
}
