//! Blob store for uploaded files
//!
//! Files land under one directory per board kind. Stored names carry a
//! uuid prefix so same-named uploads never collide, including across
//! concurrent requests.

use std::path::PathBuf;

use tokio::fs;
use uuid::Uuid;

use crate::error::EngineResult;

/// Durable byte storage rooted at a per-board directory
#[derive(Debug, Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Write a blob under a collision-resistant name, returning its path
    pub async fn write(&self, original_name: &str, bytes: &[u8]) -> EngineResult<PathBuf> {
        fs::create_dir_all(&self.base_dir).await?;

        let stored_name = format!("{}_{}", Uuid::new_v4(), original_name);
        let path = self.base_dir.join(stored_name);
        fs::write(&path, bytes).await?;

        Ok(path)
    }

    /// Delete a blob by path; missing files are not an error
    pub async fn delete(&self, path: &str) -> EngineResult<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_delete() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("notice"));

        let path = store.write("report.pdf", b"content").await.unwrap();
        assert!(path.exists());
        assert!(path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap()
            .ends_with("_report.pdf"));

        store.delete(&path.display().to_string()).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_same_name_does_not_collide() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().to_path_buf());

        let a = store.write("clip.mp4", b"one").await.unwrap();
        let b = store.write("clip.mp4", b"two").await.unwrap();
        assert_ne!(a, b);
        assert!(a.exists() && b.exists());
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().to_path_buf());
        store.delete("/nonexistent/path/file.bin").await.unwrap();
    }
}
