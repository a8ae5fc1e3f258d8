//! Board service - the per-kind orchestrator
//!
//! One `BoardService` per board kind, all sharing a `Database`. Each
//! service binds the kind's `ExtensionPolicy`, its upload directory, and
//! an injected clock for status snapshots.

use std::sync::Arc;

use boardkit_core::{
    apply_filters, resolve_status, Attachment, BoardError, BoardKind, Clock, ContentDraft,
    ContentItem, ExtensionPolicy, SearchCriteria, SystemClock, UploadedFile,
};

use crate::config::EngineConfig;
use crate::db::Database;
use crate::error::EngineResult;
use crate::files::FileStore;
use crate::ingest;

/// Orchestrates saves, deletes, view counts, and searches for one board
#[derive(Clone)]
pub struct BoardService {
    kind: BoardKind,
    policy: ExtensionPolicy,
    db: Database,
    files: FileStore,
    clock: Arc<dyn Clock>,
}

impl BoardService {
    pub fn new(kind: BoardKind, db: Database, config: &EngineConfig) -> Self {
        Self::with_clock(kind, db, config, Arc::new(SystemClock))
    }

    /// Pin the clock (for testing scheduled/expired transitions)
    pub fn with_clock(
        kind: BoardKind,
        db: Database,
        config: &EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            kind,
            policy: kind.policy(),
            db,
            files: FileStore::new(config.board_dir(kind)),
            clock,
        }
    }

    pub fn kind(&self) -> BoardKind {
        self.kind
    }

    /// Create or update an item, then ingest its upload batch.
    ///
    /// The publication status is snapshotted from the save-time instant
    /// and persisted verbatim. Updates are partial-field overwrites:
    /// every editable field is reset from the draft while `created_at`
    /// and `view_count` carry over. After ingestion the attachment count
    /// reflects every attachment row referencing the item, including
    /// ones from earlier saves.
    pub async fn save(
        &self,
        draft: ContentDraft,
        uploads: &[UploadedFile],
    ) -> EngineResult<ContentItem> {
        self.policy.validate_title(&draft.title)?;

        if let (Some(start), Some(end)) = (draft.start_date, draft.end_date) {
            if end < start {
                return Err(BoardError::validation(
                    "publication end date must not precede the start date",
                )
                .into());
            }
        }

        let now = self.clock.now();
        let status = resolve_status(draft.start_date, draft.end_date, now);

        let mut item = match draft.id {
            None => self.db.insert_item(self.kind, &draft, status, now)?,
            Some(id) => {
                let existing = self
                    .db
                    .get_item(self.kind, id)?
                    .ok_or(BoardError::NotFound { id })?;

                let updated = ContentItem {
                    id,
                    board: self.kind,
                    title: draft.title.clone(),
                    body: draft.body.clone(),
                    category: draft.category.clone(),
                    author: draft.author.clone(),
                    pinned: draft.pinned,
                    view_count: existing.view_count,
                    attachment_count: existing.attachment_count,
                    start_date: draft.start_date,
                    end_date: draft.end_date,
                    status,
                    created_at: existing.created_at,
                    updated_at: now,
                };
                self.db.update_item(&updated)?;
                updated
            }
        };

        if !uploads.is_empty() {
            // A representative from an earlier save stays the only one;
            // the flag is set once per item and never recomputed
            let has_representative = self
                .db
                .attachments_for(self.kind, item.id)?
                .iter()
                .any(|a| a.is_representative);

            let ingested =
                ingest::ingest(uploads, &self.policy, &self.files, has_representative).await?;

            if let Err(e) = self.db.insert_attachments(self.kind, item.id, &ingested, now) {
                // Row inserts roll back as one batch; drop the batch's
                // blobs too so disk and store stay consistent
                for written in &ingested {
                    if let Err(del) = self.files.delete(&written.stored_path).await {
                        tracing::warn!(
                            "Failed to clean up {} after attachment insert error: {}",
                            written.stored_path,
                            del
                        );
                    }
                }
                return Err(e);
            }

            item.attachment_count = self.db.count_attachments(self.kind, item.id)?;
            self.db.update_item(&item)?;
        }

        Ok(item)
    }

    /// Delete an item with its attachments and their backing files.
    /// A missing id is a no-op. File deletion is best effort: failures
    /// are logged and never block removal of the rows.
    pub async fn delete(&self, id: i64) -> EngineResult<()> {
        if self.db.get_item(self.kind, id)?.is_none() {
            return Ok(());
        }

        for attachment in self.db.attachments_for(self.kind, id)? {
            if let Err(e) = self.files.delete(&attachment.stored_path).await {
                tracing::warn!(
                    "Failed to delete file {} for {} item {}: {}",
                    attachment.stored_path,
                    self.kind.as_str(),
                    id,
                    e
                );
            }
        }

        self.db.delete_attachments_for(self.kind, id)?;
        self.db.delete_item(self.kind, id)?;
        Ok(())
    }

    /// Bump the view counter; a missing id is a no-op
    pub fn increment_view_count(&self, id: i64) -> EngineResult<()> {
        let Some(mut item) = self.db.get_item(self.kind, id)? else {
            return Ok(());
        };

        item.view_count += 1;
        item.updated_at = self.clock.now();
        self.db.update_item(&item)
    }

    pub fn get(&self, id: i64) -> EngineResult<Option<ContentItem>> {
        self.db.get_item(self.kind, id)
    }

    /// Full scan in canonical order, narrowed by the filter pipeline
    pub fn search(&self, criteria: &SearchCriteria) -> EngineResult<Vec<ContentItem>> {
        let items = self.db.list_items_ordered(self.kind)?;
        Ok(apply_filters(items, criteria))
    }

    pub fn attachments(&self, id: i64) -> EngineResult<Vec<Attachment>> {
        self.db.attachments_for(self.kind, id)
    }
}
