use std::borrow::Cow;
use std::path::Path;

/// File format of an uploaded track, keyed by extension.
pub struct Format<'a> {
	format_ext: Cow<'a, str>,
}

impl<'a> Format<'a> {
	pub fn new(name_or_ext: impl AsRef<str>) -> Self {
		let mut format = name_or_ext.as_ref().to_ascii_lowercase();
		if !format.starts_with('.') {
			format.insert(0, '.');
		}

		Self {
			format_ext: Cow::Owned(format),
		}
	}

	/// Construct format with EXACT format extension on comptime.
	pub const fn from_exact_extension(ext: &'a str) -> Self {
		Self {
			format_ext: Cow::Borrowed(ext),
		}
	}

	pub fn from_path(path: impl AsRef<Path>) -> Self {
		match path.as_ref().extension().and_then(|e| e.to_str()) {
			Some(ext) => Self::new(ext),
			None => Self::from_exact_extension(""),
		}
	}

	pub fn get_extension(&self) -> &str {
		&self.format_ext
	}

	pub fn mime_type(&self) -> &'static str {
		match self.get_extension() {
			".mp4" | ".m4v" => "video/mp4",
			".webm" => "video/webm",
			".mkv" => "video/x-matroska",
			".mov" => "video/quicktime",
			".mp3" => "audio/mpeg",
			".m4a" => "audio/mp4",
			".vtt" => "text/vtt",
			".srt" => "application/x-subrip",
			".dfxp" | ".xml" => "application/ttml+xml",
			_ => "application/octet-stream",
		}
	}
}
