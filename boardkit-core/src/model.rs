//! Board data models
//!
//! Core records for the content engine:
//! - ContentItem: one post on one board
//! - Attachment: uploaded file linked to an item
//! - ContentDraft: incoming save request
//! - SearchCriteria: multi-stage filter input

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::PublicationStatus;

// ============================================================================
// Board kinds
// ============================================================================

/// The near-identical content categories sharing the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardKind {
    Notice,
    Press,
    Video,
    Visit,
    Award,
}

impl BoardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Press => "press",
            Self::Video => "video",
            Self::Visit => "visit",
            Self::Award => "award",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "notice" => Some(Self::Notice),
            "press" => Some(Self::Press),
            "video" => Some(Self::Video),
            "visit" => Some(Self::Visit),
            "award" => Some(Self::Award),
            _ => None,
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Notice,
            Self::Press,
            Self::Video,
            Self::Visit,
            Self::Award,
        ]
    }
}

// ============================================================================
// Content items
// ============================================================================

/// A stored content item (notice, press release, video post, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: i64,
    pub board: BoardKind,
    pub title: String,
    pub body: String,
    pub category: Option<String>,
    pub author: Option<String>,
    /// Pinned items appear before everything else
    pub pinned: bool,
    pub view_count: i64,
    /// Number of attachment rows referencing this item
    pub attachment_count: i64,
    /// Publication window start; item is scheduled until this instant
    pub start_date: Option<DateTime<Utc>>,
    /// Publication window end; item is expired after this instant
    pub end_date: Option<DateTime<Utc>>,
    /// Snapshot computed at save time, never re-derived on read
    pub status: PublicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Incoming save request. `id` absent means create, present means update.
///
/// Updates are partial-field overwrites: every editable field here replaces
/// the stored value; `created_at` and `view_count` are preserved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentDraft {
    pub id: Option<i64>,
    pub title: String,
    pub body: String,
    pub category: Option<String>,
    pub author: Option<String>,
    pub pinned: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

// ============================================================================
// Attachments
// ============================================================================

/// An uploaded file linked to a content item, cascade-deleted with it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub content_id: i64,
    pub board: BoardKind,
    /// Filename as uploaded
    pub file_name: String,
    /// Path in the blob store (uuid-prefixed, collision resistant)
    pub stored_path: String,
    pub file_size: i64,
    /// Lowercased extension, e.g. "pdf"
    pub file_type: String,
    /// At most one per item, granted to the item's first ingested image
    pub is_representative: bool,
    pub created_at: DateTime<Utc>,
}

/// Raw upload as received from the boundary layer
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Empty uploads are skipped by ingestion
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

// ============================================================================
// Search criteria
// ============================================================================

/// Which field(s) the keyword stage matches against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Title,
    Author,
    /// Title or author
    #[default]
    Any,
}

/// Multi-criteria search input. Every field is optional; an empty
/// criteria set returns the canonical ordered listing unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub search_type: SearchType,
    pub keyword: Option<String>,
    /// "전체" / "all" mean no category filter
    pub category: Option<String>,
    /// "전체" / "all" mean no status filter
    pub status: Option<String>,
    /// Inclusive: created_at >= start of this day
    pub start_date: Option<chrono::NaiveDate>,
    /// Inclusive: created_at <= 23:59:59 of this day
    pub end_date: Option<chrono::NaiveDate>,
}

/// Sentinel values that disable the category/status stages
pub(crate) fn is_wildcard(value: &str) -> bool {
    value.is_empty() || value == "전체" || value.eq_ignore_ascii_case("all")
}
