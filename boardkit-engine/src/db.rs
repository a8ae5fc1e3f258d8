//! SQLite record store for board content
//!
//! Uses rusqlite with automatic schema migrations on open. One
//! `content_items`/`attachments` table pair serves every board kind,
//! discriminated by a `board` column; the per-kind `BoardService`
//! instances share a single `Database`.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use boardkit_core::{Attachment, BoardError, BoardKind, ContentDraft, ContentItem, PublicationStatus};

use crate::error::EngineResult;
use crate::ingest::IngestedFile;

/// Thread-safe database wrapper
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database at the given path
    pub fn open(path: impl Into<PathBuf>) -> EngineResult<Self> {
        let path = path.into();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> EngineResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Run schema migrations
    fn run_migrations(&self) -> EngineResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(SCHEMA)?;
        conn.execute_batch(INDEXES)?;

        Ok(())
    }

    // ========================================================================
    // Content items
    // ========================================================================

    /// Insert a new item; the stored row comes back with its assigned id
    pub fn insert_item(
        &self,
        kind: BoardKind,
        draft: &ContentDraft,
        status: PublicationStatus,
        now: DateTime<Utc>,
    ) -> EngineResult<ContentItem> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO content_items
                (board, title, body, category, author, pinned, view_count,
                 attachment_count, start_date, end_date, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, 0, ?, ?, ?, ?, ?)
            "#,
            params![
                kind.as_str(),
                draft.title,
                draft.body,
                draft.category,
                draft.author,
                draft.pinned,
                draft.start_date.map(format_datetime),
                draft.end_date.map(format_datetime),
                status.as_str(),
                format_datetime(now),
                format_datetime(now),
            ],
        )?;
        let id = conn.last_insert_rowid();

        Ok(ContentItem {
            id,
            board: kind,
            title: draft.title.clone(),
            body: draft.body.clone(),
            category: draft.category.clone(),
            author: draft.author.clone(),
            pinned: draft.pinned,
            view_count: 0,
            attachment_count: 0,
            start_date: draft.start_date,
            end_date: draft.end_date,
            status,
            created_at: now,
            updated_at: now,
        })
    }

    /// Overwrite every mutable column of an existing item
    pub fn update_item(&self, item: &ContentItem) -> EngineResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            r#"
            UPDATE content_items
            SET title = ?, body = ?, category = ?, author = ?, pinned = ?,
                view_count = ?, attachment_count = ?, start_date = ?, end_date = ?,
                status = ?, updated_at = ?
            WHERE id = ? AND board = ?
            "#,
            params![
                item.title,
                item.body,
                item.category,
                item.author,
                item.pinned,
                item.view_count,
                item.attachment_count,
                item.start_date.map(format_datetime),
                item.end_date.map(format_datetime),
                item.status.as_str(),
                format_datetime(item.updated_at),
                item.id,
                item.board.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(BoardError::not_found(item.id).into());
        }
        Ok(())
    }

    pub fn get_item(&self, kind: BoardKind, id: i64) -> EngineResult<Option<ContentItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM content_items WHERE id = ? AND board = ?",
            ITEM_COLUMNS
        ))?;

        let item = stmt
            .query_row(params![id, kind.as_str()], |row| map_item(kind, row))
            .optional()?;

        Ok(item)
    }

    pub fn delete_item(&self, kind: BoardKind, id: i64) -> EngineResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM content_items WHERE id = ? AND board = ?",
            params![id, kind.as_str()],
        )?;
        Ok(())
    }

    /// Canonical listing: pinned items first, then newest first.
    /// This is the iteration order the search pipeline consumes.
    pub fn list_items_ordered(&self, kind: BoardKind) -> EngineResult<Vec<ContentItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM content_items
            WHERE board = ?
            ORDER BY pinned DESC, created_at DESC, id DESC
            "#,
            ITEM_COLUMNS
        ))?;

        let items = stmt
            .query_map(params![kind.as_str()], |row| map_item(kind, row))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    // ========================================================================
    // Attachments
    // ========================================================================

    /// Record an ingested batch in one transaction: either every
    /// attachment row lands or none do
    pub fn insert_attachments(
        &self,
        kind: BoardKind,
        content_id: i64,
        files: &[IngestedFile],
        now: DateTime<Utc>,
    ) -> EngineResult<Vec<Attachment>> {
        let conn = self.conn.lock().unwrap();
        let tx = conn.unchecked_transaction()?;

        let mut attachments = Vec::with_capacity(files.len());
        for file in files {
            tx.execute(
                r#"
                INSERT INTO attachments
                    (content_id, board, file_name, stored_path, file_size, file_type,
                     is_representative, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    content_id,
                    kind.as_str(),
                    file.file_name,
                    file.stored_path,
                    file.file_size,
                    file.file_type,
                    file.is_representative,
                    format_datetime(now),
                ],
            )?;
            attachments.push(Attachment {
                id: tx.last_insert_rowid(),
                content_id,
                board: kind,
                file_name: file.file_name.clone(),
                stored_path: file.stored_path.clone(),
                file_size: file.file_size,
                file_type: file.file_type.clone(),
                is_representative: file.is_representative,
                created_at: now,
            });
        }

        tx.commit()?;
        Ok(attachments)
    }

    /// Attachments for an item, in ingestion order
    pub fn attachments_for(&self, kind: BoardKind, content_id: i64) -> EngineResult<Vec<Attachment>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, content_id, file_name, stored_path, file_size, file_type,
                   is_representative, created_at
            FROM attachments
            WHERE content_id = ? AND board = ?
            ORDER BY id ASC
            "#,
        )?;

        let attachments = stmt
            .query_map(params![content_id, kind.as_str()], |row| {
                Ok(Attachment {
                    id: row.get(0)?,
                    content_id: row.get(1)?,
                    board: kind,
                    file_name: row.get(2)?,
                    stored_path: row.get(3)?,
                    file_size: row.get(4)?,
                    file_type: row.get(5)?,
                    is_representative: row.get(6)?,
                    created_at: parse_datetime(row.get::<_, String>(7)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(attachments)
    }

    pub fn count_attachments(&self, kind: BoardKind, content_id: i64) -> EngineResult<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM attachments WHERE content_id = ? AND board = ?",
            params![content_id, kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn delete_attachments_for(&self, kind: BoardKind, content_id: i64) -> EngineResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM attachments WHERE content_id = ? AND board = ?",
            params![content_id, kind.as_str()],
        )?;
        Ok(())
    }
}

// ============================================================================
// Schema
// ============================================================================

const ITEM_COLUMNS: &str = "id, title, body, category, author, pinned, view_count, \
     attachment_count, start_date, end_date, status, created_at, updated_at";

const SCHEMA: &str = r#"
-- Content items across all board kinds
CREATE TABLE IF NOT EXISTS content_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    board TEXT NOT NULL,
    title TEXT NOT NULL,
    body TEXT NOT NULL DEFAULT '',
    category TEXT,
    author TEXT,
    pinned INTEGER NOT NULL DEFAULT 0,
    view_count INTEGER NOT NULL DEFAULT 0,
    attachment_count INTEGER NOT NULL DEFAULT 0,
    start_date TEXT,
    end_date TEXT,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Uploaded files, cascade-deleted with their item
CREATE TABLE IF NOT EXISTS attachments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content_id INTEGER NOT NULL,
    board TEXT NOT NULL,
    file_name TEXT NOT NULL,
    stored_path TEXT NOT NULL,
    file_size INTEGER NOT NULL CHECK (file_size >= 0),
    file_type TEXT NOT NULL,
    is_representative INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);
"#;

const INDEXES: &str = r#"
-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_items_listing ON content_items(board, pinned DESC, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_attachments_content ON attachments(content_id);
"#;

// ============================================================================
// Helpers
// ============================================================================

fn map_item(kind: BoardKind, row: &rusqlite::Row<'_>) -> rusqlite::Result<ContentItem> {
    Ok(ContentItem {
        id: row.get(0)?,
        board: kind,
        title: row.get(1)?,
        body: row.get(2)?,
        category: row.get(3)?,
        author: row.get(4)?,
        pinned: row.get(5)?,
        view_count: row.get(6)?,
        attachment_count: row.get(7)?,
        start_date: row.get::<_, Option<String>>(8)?.map(parse_datetime),
        end_date: row.get::<_, Option<String>>(9)?.map(parse_datetime),
        status: parse_status(row.get::<_, String>(10)?),
        created_at: parse_datetime(row.get::<_, String>(11)?),
        updated_at: parse_datetime(row.get::<_, String>(12)?),
    })
}

fn parse_status(s: String) -> PublicationStatus {
    PublicationStatus::from_str(&s).unwrap_or_default()
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            tracing::warn!("Unparseable stored timestamp {:?}: {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> ContentDraft {
        ContentDraft {
            title: title.to_string(),
            body: "body".to_string(),
            ..Default::default()
        }
    }

    fn now() -> DateTime<Utc> {
        "2025-06-15T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let db = Database::open_in_memory().unwrap();

        let item = db
            .insert_item(BoardKind::Notice, &draft("first"), PublicationStatus::Published, now())
            .unwrap();
        assert!(item.id > 0);

        let fetched = db.get_item(BoardKind::Notice, item.id).unwrap().unwrap();
        assert_eq!(fetched.title, "first");
        assert_eq!(fetched.status, PublicationStatus::Published);
        assert_eq!(fetched.created_at, now());

        // Same id under another board kind resolves to nothing
        assert!(db.get_item(BoardKind::Press, item.id).unwrap().is_none());
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let mut item = db
            .insert_item(BoardKind::Notice, &draft("a"), PublicationStatus::Published, now())
            .unwrap();

        item.id = 999;
        let err = db.update_item(&item).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_listing_order_pinned_then_recent() {
        let db = Database::open_in_memory().unwrap();
        let t0 = now();
        let t1 = t0 + chrono::Duration::hours(1);

        let old = db
            .insert_item(BoardKind::Notice, &draft("old"), PublicationStatus::Published, t0)
            .unwrap();
        let new = db
            .insert_item(BoardKind::Notice, &draft("new"), PublicationStatus::Published, t1)
            .unwrap();
        let pinned = db
            .insert_item(
                BoardKind::Notice,
                &ContentDraft {
                    pinned: true,
                    ..draft("pinned")
                },
                PublicationStatus::Published,
                t0,
            )
            .unwrap();

        let ids: Vec<i64> = db
            .list_items_ordered(BoardKind::Notice)
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![pinned.id, new.id, old.id]);
    }

    #[test]
    fn test_attachment_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let item = db
            .insert_item(BoardKind::Press, &draft("a"), PublicationStatus::Published, now())
            .unwrap();

        let file = IngestedFile {
            file_name: "photo.jpg".to_string(),
            stored_path: "/tmp/x_photo.jpg".to_string(),
            file_size: 3,
            file_type: "jpg".to_string(),
            is_representative: true,
        };
        db.insert_attachments(BoardKind::Press, item.id, &[file], now())
            .unwrap();

        assert_eq!(db.count_attachments(BoardKind::Press, item.id).unwrap(), 1);
        let stored = db.attachments_for(BoardKind::Press, item.id).unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].is_representative);

        db.delete_attachments_for(BoardKind::Press, item.id).unwrap();
        assert_eq!(db.count_attachments(BoardKind::Press, item.id).unwrap(), 0);
    }

    #[test]
    fn test_attachment_batch_is_all_or_nothing() {
        let db = Database::open_in_memory().unwrap();
        let item = db
            .insert_item(BoardKind::Press, &draft("a"), PublicationStatus::Published, now())
            .unwrap();

        let file = |name: &str, size: i64| IngestedFile {
            file_name: name.to_string(),
            stored_path: format!("/tmp/x_{}", name),
            file_size: size,
            file_type: "jpg".to_string(),
            is_representative: false,
        };

        // The negative size trips the schema check on the second row;
        // the first row must not survive the failed batch
        let batch = vec![file("ok.jpg", 3), file("broken.jpg", -1)];
        db.insert_attachments(BoardKind::Press, item.id, &batch, now())
            .unwrap_err();

        assert_eq!(db.count_attachments(BoardKind::Press, item.id).unwrap(), 0);
        assert!(db.attachments_for(BoardKind::Press, item.id).unwrap().is_empty());
    }
}
