use super::media_error::MediaError;

pub trait OkOrDomain<T> {
	fn ok_or_domain<S: ToString>(self, msg: S) -> Result<T, MediaError>;
}

impl<T> OkOrDomain<T> for Option<T> {
	fn ok_or_domain<S: ToString>(self, msg: S) -> Result<T, MediaError> {
		self.ok_or_else(|| MediaError::Domain(msg.to_string()))
	}
}
