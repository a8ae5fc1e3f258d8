//! Attachment validation and ingestion
//!
//! Applies a board's `ExtensionPolicy` to an upload batch: batch-level
//! count and aggregate-size checks run before any byte is written, then
//! files are validated and stored one by one in upload order. The first
//! accepted file with an image extension becomes the representative
//! attachment for its item.
//!
//! If anything fails after files were already written, the written blobs
//! are deleted again before the error surfaces, so a rejected batch
//! leaves no stray files behind.

use boardkit_core::{BoardError, ExtensionPolicy, UploadedFile};

use crate::error::EngineResult;
use crate::files::FileStore;

/// A validated upload, written to the blob store but not yet recorded
#[derive(Debug, Clone)]
pub struct IngestedFile {
    pub file_name: String,
    pub stored_path: String,
    pub file_size: i64,
    pub file_type: String,
    pub is_representative: bool,
}

/// Validate and store an upload batch. Empty parts are skipped in the
/// per-file loop but still count toward the batch-level limits.
///
/// `has_representative` is the owning item's current state: when an
/// earlier save already produced a representative attachment, no file in
/// this batch gets the flag — it is set once per item, never recomputed.
pub async fn ingest(
    uploads: &[UploadedFile],
    policy: &ExtensionPolicy,
    store: &FileStore,
    has_representative: bool,
) -> EngineResult<Vec<IngestedFile>> {
    if uploads.len() > policy.max_file_count {
        return Err(BoardError::upload_rejected(format!(
            "at most {} files per upload, got {}",
            policy.max_file_count,
            uploads.len()
        ))
        .into());
    }

    let total: u64 = uploads.iter().map(|f| f.size()).sum();
    if total > policy.max_total_bytes {
        return Err(BoardError::upload_rejected(format!(
            "upload batch is {} bytes, limit is {}",
            total, policy.max_total_bytes
        ))
        .into());
    }

    let mut ingested: Vec<IngestedFile> = Vec::new();

    for upload in uploads {
        if upload.is_empty() {
            continue;
        }

        let result = ingest_one(upload, policy, store, has_representative, &ingested).await;
        match result {
            Ok(file) => ingested.push(file),
            Err(e) => {
                cleanup(&ingested, store).await;
                return Err(e);
            }
        }
    }

    Ok(ingested)
}

async fn ingest_one(
    upload: &UploadedFile,
    policy: &ExtensionPolicy,
    store: &FileStore,
    item_has_representative: bool,
    accepted_so_far: &[IngestedFile],
) -> EngineResult<IngestedFile> {
    policy.validate_file_name(&upload.file_name)?;

    let extension = ExtensionPolicy::file_extension(&upload.file_name);
    if !policy.is_allowed(&extension) {
        return Err(BoardError::upload_rejected(format!(
            "file type not allowed: {}",
            upload.file_name
        ))
        .into());
    }

    let path = store.write(&upload.file_name, &upload.bytes).await?;

    let already_has_representative =
        item_has_representative || accepted_so_far.iter().any(|f| f.is_representative);
    Ok(IngestedFile {
        file_name: upload.file_name.clone(),
        stored_path: path.display().to_string(),
        file_size: upload.bytes.len() as i64,
        file_type: extension.clone(),
        is_representative: !already_has_representative && ExtensionPolicy::is_image(&extension),
    })
}

/// Remove blobs written by a failed batch, best effort
async fn cleanup(ingested: &[IngestedFile], store: &FileStore) {
    for file in ingested {
        if let Err(e) = store.delete(&file.stored_path).await {
            tracing::warn!(
                "Failed to clean up {} after rejected upload batch: {}",
                file.stored_path,
                e
            );
        }
    }
}
