use crate::error::Result;
use crate::query::QueryContext;
use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_PREFIX: &str = "LTI_MEDIA_";

/// Runtime settings, read from `LTI_MEDIA_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Origin of the media backend in normal operation.
	pub base_url: String,
	/// Local development host used when the page carries `debug=true`.
	pub debug_host: String,
	pub page_size: u64,
	pub poll_interval_ms: u64,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			base_url: "http://localhost:8080".into(),
			debug_host: "http://localhost:7878".into(),
			page_size: 15,
			poll_interval_ms: 1000,
		}
	}
}

impl Config {
	pub fn load() -> Result<Self> {
		Self::from_figment(Figment::new().merge(Env::prefixed(ENV_PREFIX)))
	}

	fn from_figment(overrides: Figment) -> Result<Self> {
		let config = Figment::from(Serialized::defaults(Config::default()))
			.merge(overrides)
			.extract()?;
		Ok(config)
	}

	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms.max(1))
	}

	/// Host every request of this page load goes to.
	pub fn host_for(&self, context: &QueryContext) -> &str {
		if context.debug {
			&self.debug_host
		} else {
			&self.base_url
		}
	}
}
