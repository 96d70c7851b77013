pub mod episode;
pub mod job;
pub mod lti;
pub mod metadata;
pub mod one_or_many;
pub mod upload;

pub use episode::{Attachment, EpisodeSearchResult, SearchResults};
pub use job::JobResult;
pub use lti::LtiData;
pub use metadata::{
	CollectionKey, FieldKind, FieldValue, MetadataCollection, MetadataContainer, MetadataField,
};
pub use upload::{MediaFile, UploadRequest};
