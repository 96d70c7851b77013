use thiserror::Error;

/// Everything that can go wrong talking to the media backend or driving a view.
#[derive(Error, Debug)]
pub enum MediaError {
	#[error("request failed: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("could not parse backend JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("configuration error: {0}")]
	Config(#[from] Box<figment::Error>),

	#[error("invalid URL: {0}")]
	Url(#[from] url::ParseError),

	#[error("{0}")]
	Domain(String),

	#[error("cannot determine the target series")]
	SeriesUnresolved,

	#[error("backend returned no metadata")]
	MetadataMissing,
}

impl From<figment::Error> for MediaError {
	fn from(err: figment::Error) -> Self {
		MediaError::Config(Box::new(err))
	}
}

impl From<&str> for MediaError {
	fn from(val: &str) -> Self {
		MediaError::Domain(val.to_owned())
	}
}

impl From<String> for MediaError {
	fn from(val: String) -> Self {
		MediaError::Domain(val)
	}
}
