#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod error;
pub mod event;
pub mod form;
pub mod format;
pub mod jobs;
pub mod messages;
pub mod models;
pub mod poller;
pub mod query;
pub mod requester;
pub mod series;
pub mod upload;

pub use config::Config;
pub use error::{MediaError, Result};
pub use messages::Messages;
pub use query::{QueryContext, Route, SeriesRef};
pub use requester::{MediaApi, Requester};
