//! Engine configuration - paths and environment loading
//!
//! Configuration is loaded from environment variables:
//! - `BOARDKIT_DB_PATH`: SQLite database file (default: /var/lib/boardkit/boardkit.db)
//! - `BOARDKIT_UPLOAD_ROOT`: Base directory for uploaded files (default: /var/lib/boardkit/uploads)

use std::path::PathBuf;

use boardkit_core::BoardKind;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Root directory for uploaded files; each board gets a subdirectory
    pub upload_root: PathBuf,
}

impl EngineConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let database_path = std::env::var("BOARDKIT_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/var/lib/boardkit/boardkit.db"));
        let upload_root = std::env::var("BOARDKIT_UPLOAD_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/var/lib/boardkit/uploads"));

        Self {
            database_path,
            upload_root,
        }
    }

    /// Create config with explicit paths (for testing)
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            database_path: root.join("boardkit.db"),
            upload_root: root.join("uploads"),
        }
    }

    /// Upload directory for a board kind
    pub fn board_dir(&self, kind: BoardKind) -> PathBuf {
        self.upload_root.join(kind.as_str())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
