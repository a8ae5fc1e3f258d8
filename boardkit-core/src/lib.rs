pub mod clock;
pub mod error;
pub mod model;
pub mod policy;
pub mod search;
pub mod status;

pub use clock::{Clock, SystemClock};
pub use error::{BoardError, Result};
pub use model::{
    Attachment, BoardKind, ContentDraft, ContentItem, SearchCriteria, SearchType, UploadedFile,
};
pub use policy::ExtensionPolicy;
pub use search::apply_filters;
pub use status::{resolve_status, PublicationStatus};
