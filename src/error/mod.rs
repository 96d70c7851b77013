pub mod media_error;
pub mod ok_or_domain;

pub use media_error::MediaError;
pub use ok_or_domain::OkOrDomain;

pub type Result<T> = std::result::Result<T, MediaError>;
