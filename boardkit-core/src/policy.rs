//! Per-board upload and title policies
//!
//! Each board kind carries a whitelist of file extensions, a batch count
//! limit, and an aggregate size limit. The award board additionally
//! restricts filename characters and title content.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{BoardError, Result};
use crate::model::BoardKind;

/// Image extensions, fixed regardless of a board's broader whitelist.
/// The first upload matching this set becomes the representative attachment.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "svg", "gif"];

/// Base document/image whitelist shared by notice, press, and visit boards
const DOCUMENT_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "svg", "gif", "hwp", "doc", "docx", "pdf", "ppt", "pptx", "txt", "xls",
    "xlsx", "gz", "zip",
];

/// Video formats accepted by the video board on top of the document set
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "wmv", "flv", "mkv"];

/// Punctuation permitted in award titles besides letters and digits
const ALLOWED_TITLE_PUNCTUATION: &str = "!@#$%^&*()_+-=[]{}|;:',.<>?/~`\" ";

static FILENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._-]+$").expect("filename regex"));

/// Upload and title policy for one board kind
#[derive(Debug, Clone)]
pub struct ExtensionPolicy {
    allowed_extensions: HashSet<String>,
    pub max_file_count: usize,
    pub max_total_bytes: u64,
    /// Restrict filenames to `[a-zA-Z0-9._-]`
    strict_filenames: bool,
    /// Restrict titles to letters, digits, and the fixed punctuation set
    strict_titles: bool,
    title_min_chars: usize,
    title_max_chars: usize,
}

impl ExtensionPolicy {
    fn from_extensions(extensions: &[&str]) -> Self {
        Self {
            allowed_extensions: extensions.iter().map(|e| e.to_string()).collect(),
            max_file_count: 5,
            max_total_bytes: 90 * 1024 * 1024,
            strict_filenames: false,
            strict_titles: false,
            title_min_chars: 1,
            title_max_chars: 200,
        }
    }

    /// Document policy: notice, press, and visit boards
    pub fn document() -> Self {
        Self::from_extensions(DOCUMENT_EXTENSIONS)
    }

    /// Video policy: document set plus common video containers
    pub fn video() -> Self {
        let extensions: Vec<&str> = DOCUMENT_EXTENSIONS
            .iter()
            .chain(VIDEO_EXTENSIONS.iter())
            .copied()
            .collect();
        Self::from_extensions(&extensions)
    }

    /// Award policy: single image, 20 MiB, strict filename and title rules
    pub fn award() -> Self {
        Self {
            allowed_extensions: ["jpg", "jpeg", "png", "svg"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            max_file_count: 1,
            max_total_bytes: 20 * 1024 * 1024,
            strict_filenames: true,
            strict_titles: true,
            title_min_chars: 10,
            title_max_chars: 50,
        }
    }

    /// Case-insensitive whitelist membership
    pub fn is_allowed(&self, extension: &str) -> bool {
        self.allowed_extensions.contains(&extension.to_lowercase())
    }

    /// Fixed image set, independent of this policy's whitelist
    pub fn is_image(extension: &str) -> bool {
        let lower = extension.to_lowercase();
        IMAGE_EXTENSIONS.contains(&lower.as_str())
    }

    /// Lowercased substring after the last `.`, empty when there is none.
    /// An empty extension then fails the whitelist check deterministically.
    pub fn file_extension(file_name: &str) -> String {
        match file_name.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => String::new(),
        }
    }

    /// Title length bound plus, for strict boards, a character whitelist
    pub fn validate_title(&self, title: &str) -> Result<()> {
        let len = title.chars().count();
        if len < self.title_min_chars || len > self.title_max_chars {
            return Err(BoardError::validation(format!(
                "title must be {}-{} characters, got {}",
                self.title_min_chars, self.title_max_chars, len
            )));
        }
        if self.strict_titles {
            for c in title.chars() {
                if !c.is_alphanumeric() && !ALLOWED_TITLE_PUNCTUATION.contains(c) {
                    return Err(BoardError::validation(format!(
                        "title contains disallowed character {:?}",
                        c
                    )));
                }
            }
        }
        Ok(())
    }

    /// Filename character check for strict boards; permissive otherwise
    pub fn validate_file_name(&self, file_name: &str) -> Result<()> {
        if self.strict_filenames && !FILENAME_RE.is_match(file_name) {
            return Err(BoardError::upload_rejected(format!(
                "file name {:?} contains whitespace or disallowed characters",
                file_name
            )));
        }
        Ok(())
    }
}

impl BoardKind {
    /// The upload/title policy this board runs under
    pub fn policy(&self) -> ExtensionPolicy {
        match self {
            Self::Notice | Self::Press | Self::Visit => ExtensionPolicy::document(),
            Self::Video => ExtensionPolicy::video(),
            Self::Award => ExtensionPolicy::award(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitelist_is_case_insensitive() {
        let policy = ExtensionPolicy::document();
        assert!(policy.is_allowed("pdf"));
        assert!(policy.is_allowed("PDF"));
        assert!(policy.is_allowed("Zip"));
        assert!(!policy.is_allowed("exe"));
        assert!(!policy.is_allowed(""));
    }

    #[test]
    fn test_video_policy_extends_document() {
        let policy = ExtensionPolicy::video();
        assert!(policy.is_allowed("mp4"));
        assert!(policy.is_allowed("mkv"));
        assert!(policy.is_allowed("pdf"));
        assert!(!policy.is_allowed("exe"));

        // Document boards do not take video files
        assert!(!ExtensionPolicy::document().is_allowed("mp4"));
    }

    #[test]
    fn test_image_set_is_fixed() {
        assert!(ExtensionPolicy::is_image("jpg"));
        assert!(ExtensionPolicy::is_image("GIF"));
        assert!(!ExtensionPolicy::is_image("pdf"));
        // mp4 is allowed on the video board but is not an image
        assert!(!ExtensionPolicy::is_image("mp4"));
    }

    #[test]
    fn test_file_extension_extraction() {
        assert_eq!(ExtensionPolicy::file_extension("report.PDF"), "pdf");
        assert_eq!(ExtensionPolicy::file_extension("archive.tar.gz"), "gz");
        assert_eq!(ExtensionPolicy::file_extension("no_extension"), "");
        assert_eq!(ExtensionPolicy::file_extension("trailing."), "");
    }

    #[test]
    fn test_award_title_length_bounds() {
        let policy = ExtensionPolicy::award();
        assert!(policy.validate_title("123456789").is_err()); // 9 chars
        assert!(policy.validate_title("1234567890").is_ok()); // 10 chars
        assert!(policy.validate_title(&"a".repeat(50)).is_ok());
        assert!(policy.validate_title(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_award_title_charset() {
        let policy = ExtensionPolicy::award();
        assert!(policy.validate_title("Award 2025: Grand Prize!").is_ok());
        // Hangul counts as letters
        assert!(policy.validate_title("수상 내역 2025년도 대상").is_ok());
        // Em dash is not in the allowed punctuation set
        assert!(policy.validate_title("Award — Grand Prize").is_err());
    }

    #[test]
    fn test_document_title_bounds() {
        let policy = ExtensionPolicy::document();
        assert!(policy.validate_title("").is_err());
        assert!(policy.validate_title("short").is_ok());
        assert!(policy.validate_title(&"a".repeat(200)).is_ok());
        assert!(policy.validate_title(&"a".repeat(201)).is_err());
        // No charset restriction on document boards
        assert!(policy.validate_title("유지보수 공지 — 6월").is_ok());
    }

    #[test]
    fn test_strict_filenames() {
        let award = ExtensionPolicy::award();
        assert!(award.validate_file_name("medal_2025.png").is_ok());
        assert!(award.validate_file_name("my medal.png").is_err());
        assert!(award.validate_file_name("메달.png").is_err());

        // Document boards accept anything
        let doc = ExtensionPolicy::document();
        assert!(doc.validate_file_name("공지 사항.pdf").is_ok());
    }

    #[test]
    fn test_kind_policies() {
        assert_eq!(BoardKind::Award.policy().max_file_count, 1);
        assert_eq!(BoardKind::Notice.policy().max_file_count, 5);
        assert!(BoardKind::Video.policy().is_allowed("mov"));
        assert!(!BoardKind::Press.policy().is_allowed("mov"));
    }
}
