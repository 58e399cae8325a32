//! Conversation storage
//!
//! The title orchestrator only needs [`ConversationStore::save_convo`]; the
//! SQLite backend also serves the `history` commands.

use crate::error::{Result, TitlerError};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

pub mod types;
pub use types::{ConvoUpdate, RequestContext, SaveOptions, StoredConversation};

/// Durable conversation records
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Upsert a conversation's title on behalf of `req`
    ///
    /// # Errors
    ///
    /// Returns error if the write fails or the conversation belongs to a
    /// different user
    async fn save_convo(
        &self,
        req: &RequestContext,
        update: ConvoUpdate,
        options: SaveOptions,
    ) -> Result<()>;
}

fn storage_err(e: anyhow::Error) -> TitlerError {
    TitlerError::Storage(format!("{:#}", e))
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// SQLite storage backend for conversation titles
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db_path: PathBuf,
}

impl SqliteStorage {
    /// Create a storage instance in the user's data directory
    ///
    /// `TITLER_HISTORY_DB` overrides the location.
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var("TITLER_HISTORY_DB") {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "titler", "titler")
            .ok_or_else(|| TitlerError::Storage("Could not determine data directory".into()))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .context("Failed to create data directory")
            .map_err(storage_err)?;

        Self::new_with_path(data_dir.join("history.db"))
    }

    /// Create a storage instance that uses the specified database path
    ///
    /// # Examples
    ///
    /// ```
    /// use titler::storage::SqliteStorage;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let storage = SqliteStorage::new_with_path(dir.path().join("history.db")).unwrap();
    /// assert!(storage.db_path().ends_with("history.db"));
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(storage_err)?;
        }

        let storage = Self { db_path };
        storage.init()?;
        Ok(storage)
    }

    /// Open storage at a configured path, or the default location
    pub fn open(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::new_with_path(path),
            None => Self::new(),
        }
    }

    /// Location of the database file
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(storage_err)?)
    }

    fn init(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS conversations (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                context TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create tables")
        .map_err(storage_err)?;

        Ok(())
    }

    /// Save or update a conversation title
    ///
    /// Preserves `created_at` on update. A conversation owned by another user
    /// is left untouched and reported as an error.
    pub fn save_title(
        &self,
        user_id: &str,
        conversation_id: &str,
        title: &str,
        context: &str,
    ) -> Result<()> {
        let mut conn = self.connect()?;
        let now = Utc::now().to_rfc3339();

        let tx = conn
            .transaction()
            .context("Failed to start transaction")
            .map_err(storage_err)?;

        let owner: Option<String> = tx
            .query_row(
                "SELECT user_id FROM conversations WHERE id = ?",
                params![conversation_id],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query conversation owner")
            .map_err(storage_err)?;

        match owner {
            Some(owner) if owner != user_id => {
                return Err(TitlerError::Storage(format!(
                    "Conversation {} belongs to another user",
                    conversation_id
                ))
                .into());
            }
            Some(_) => {
                tx.execute(
                    "UPDATE conversations SET title = ?, context = ?, updated_at = ? WHERE id = ?",
                    params![title, context, now, conversation_id],
                )
                .context("Failed to update conversation")
                .map_err(storage_err)?;
            }
            None => {
                tx.execute(
                    "INSERT INTO conversations (id, user_id, title, context, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?)",
                    params![conversation_id, user_id, title, context, now, now],
                )
                .context("Failed to insert conversation")
                .map_err(storage_err)?;
            }
        }

        tx.commit()
            .context("Failed to commit transaction")
            .map_err(storage_err)?;

        Ok(())
    }

    /// Resolve a full ID or unique ID prefix to a stored conversation ID
    fn resolve_id(conn: &Connection, id: &str) -> Result<Option<String>> {
        let exact: Option<String> = conn
            .query_row(
                "SELECT id FROM conversations WHERE id = ?",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query conversation")
            .map_err(storage_err)?;
        if exact.is_some() {
            return Ok(exact);
        }

        let mut stmt = conn
            .prepare("SELECT id FROM conversations WHERE substr(id, 1, length(?1)) = ?1 LIMIT 2")
            .context("Failed to prepare statement")
            .map_err(storage_err)?;
        let matches: Vec<String> = stmt
            .query_map(params![id], |row| row.get(0))
            .context("Failed to query conversations by prefix")
            .map_err(storage_err)?
            .flatten()
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.into_iter().next()),
            _ => Err(TitlerError::Storage(format!("Conversation ID prefix {} is ambiguous", id)).into()),
        }
    }

    /// Load a conversation by ID (full ID or unique prefix)
    pub fn load_conversation(&self, id: &str) -> Result<Option<StoredConversation>> {
        let conn = self.connect()?;
        let Some(id) = Self::resolve_id(&conn, id)? else {
            return Ok(None);
        };

        conn.query_row(
            "SELECT id, user_id, title, context, created_at, updated_at
            FROM conversations WHERE id = ?",
            params![id],
            Self::row_to_conversation,
        )
        .optional()
        .context("Failed to load conversation")
        .map_err(|e| storage_err(e).into())
    }

    /// List stored conversations, most recently updated first
    pub fn list_conversations(&self, user_id: Option<&str>) -> Result<Vec<StoredConversation>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, title, context, created_at, updated_at
                FROM conversations
                WHERE ?1 IS NULL OR user_id = ?1
                ORDER BY updated_at DESC",
            )
            .context("Failed to prepare statement")
            .map_err(storage_err)?;

        let conversations = stmt
            .query_map(params![user_id], Self::row_to_conversation)
            .context("Failed to query conversations")
            .map_err(storage_err)?
            .flatten()
            .collect();

        Ok(conversations)
    }

    /// Delete a conversation (full ID or unique prefix)
    ///
    /// Returns whether a conversation was removed.
    pub fn delete_conversation(&self, id: &str) -> Result<bool> {
        let conn = self.connect()?;
        let Some(id) = Self::resolve_id(&conn, id)? else {
            return Ok(false);
        };

        let removed = conn
            .execute("DELETE FROM conversations WHERE id = ?", params![id])
            .context("Failed to delete conversation")
            .map_err(storage_err)?;

        Ok(removed > 0)
    }

    fn row_to_conversation(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredConversation> {
        let created_at: String = row.get(4)?;
        let updated_at: String = row.get(5)?;
        Ok(StoredConversation {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            context: row.get(3)?,
            created_at: parse_timestamp(&created_at),
            updated_at: parse_timestamp(&updated_at),
        })
    }
}

#[async_trait]
impl ConversationStore for SqliteStorage {
    async fn save_convo(
        &self,
        req: &RequestContext,
        update: ConvoUpdate,
        options: SaveOptions,
    ) -> Result<()> {
        let storage = self.clone();
        let user_id = req.user_id.clone();

        tokio::task::spawn_blocking(move || {
            storage.save_title(
                &user_id,
                &update.conversation_id,
                &update.title,
                &options.context,
            )
        })
        .await
        .map_err(|e| TitlerError::Storage(format!("Storage task failed: {}", e)))?
    }
}
