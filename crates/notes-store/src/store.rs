//! Main store implementation for note persistence.
//!
//! The `Store` type provides the CRUD operations behind the REST surface.
//! It talks to PostgreSQL when a database URL is configured and falls back
//! to an in-memory collection otherwise.

use std::sync::Arc;

use notes_core::{NewNote, Note, NoteId, NoteUpdate};
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::error::{StoreError, StoreResult};
use crate::memory::MemoryNotes;
use crate::models::NoteRow;
use crate::schema;

/// Configuration for connecting to the database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database connection URL. `None` selects the in-memory backend.
    pub database_url: Option<String>,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum number of connections to maintain.
    pub min_connections: u32,
    /// Run migrations on connect.
    pub run_migrations: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 10,
            min_connections: 1,
            run_migrations: true,
        }
    }
}

impl StoreConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `DATABASE_URL` - Optional database connection string
    /// - `DATABASE_MAX_CONNECTIONS` - Optional, defaults to 10
    /// - `DATABASE_MIN_CONNECTIONS` - Optional, defaults to 1
    /// - `DATABASE_RUN_MIGRATIONS` - Optional, defaults to true
    pub fn from_env() -> StoreResult<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let max_connections = parse_var("DATABASE_MAX_CONNECTIONS")?.unwrap_or(10);
        let min_connections = parse_var("DATABASE_MIN_CONNECTIONS")?.unwrap_or(1);

        let run_migrations = std::env::var("DATABASE_RUN_MIGRATIONS")
            .ok()
            .map(|s| s.to_lowercase() != "false" && s != "0")
            .unwrap_or(true);

        Ok(Self {
            database_url,
            max_connections,
            min_connections,
            run_migrations,
        })
    }
}

fn parse_var(name: &str) -> StoreResult<Option<u32>> {
    match std::env::var(name) {
        Ok(raw) => raw.parse().map(Some).map_err(|_| {
            StoreError::ConfigError(format!("{} must be a number, got {:?}", name, raw))
        }),
        Err(_) => Ok(None),
    }
}

#[derive(Debug, Clone)]
enum Backend {
    Postgres(PgPool),
    Memory(Arc<MemoryNotes>),
}

/// Note store backing the REST API.
#[derive(Debug, Clone)]
pub struct Store {
    backend: Backend,
}

impl Store {
    /// Connect using the given configuration.
    ///
    /// Without a database URL this logs a warning and returns an in-memory
    /// store; notes then live only as long as the process.
    pub async fn connect(config: StoreConfig) -> StoreResult<Self> {
        let Some(url) = config.database_url.as_deref() else {
            tracing::warn!("DATABASE_URL not set, using in-memory note store");
            return Ok(Self::in_memory());
        };

        tracing::info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect(url)
            .await?;

        tracing::info!("Connected to database");

        if config.run_migrations {
            schema::run_migrations(&pool).await?;
        } else if !schema::is_schema_initialized(&pool).await? {
            tracing::warn!("Migrations disabled and the notes table does not exist yet");
        }

        Ok(Self::from_pool(pool))
    }

    /// Create a store from an existing connection pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            backend: Backend::Postgres(pool),
        }
    }

    /// Create an empty in-memory store.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryNotes::new())),
        }
    }

    /// Whether this store is backed by PostgreSQL.
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, Backend::Postgres(_))
    }

    // ==================== Note Operations ====================

    /// List all notes, most recently created first.
    pub async fn list_notes(&self) -> StoreResult<Vec<Note>> {
        match &self.backend {
            Backend::Memory(notes) => Ok(notes.list()),
            Backend::Postgres(pool) => {
                let rows = sqlx::query_as::<_, NoteRow>(
                    r#"
                    SELECT id, title, body, created_at, updated_at
                    FROM notes
                    ORDER BY created_at DESC
                    "#,
                )
                .fetch_all(pool)
                .await?;

                Ok(rows.into_iter().map(Note::from).collect())
            }
        }
    }

    /// Get a note by id.
    pub async fn get_note(&self, id: &NoteId) -> StoreResult<Note> {
        match &self.backend {
            Backend::Memory(notes) => notes.get(id),
            Backend::Postgres(pool) => sqlx::query_as::<_, NoteRow>(
                r#"SELECT id, title, body, created_at, updated_at FROM notes WHERE id = $1"#,
            )
            .bind(id.as_str())
            .fetch_optional(pool)
            .await?
            .map(Note::from)
            .ok_or_else(|| StoreError::NoteNotFound(id.clone())),
        }
    }

    /// Insert a new note, assigning its id and timestamps.
    pub async fn insert_note(&self, new: &NewNote) -> StoreResult<Note> {
        match &self.backend {
            Backend::Memory(notes) => notes.insert(new),
            Backend::Postgres(pool) => {
                let id = NoteId::generate();
                let row = sqlx::query_as::<_, NoteRow>(
                    r#"
                    INSERT INTO notes (id, title, body)
                    VALUES ($1, $2, $3)
                    RETURNING id, title, body, created_at, updated_at
                    "#,
                )
                .bind(id.as_str())
                .bind(&new.title)
                .bind(&new.body)
                .fetch_one(pool)
                .await
                .map_err(|e| StoreError::from_write(e, Some(&new.title)))?;

                Ok(row.into())
            }
        }
    }

    /// Apply a partial update and refresh `updated_at`.
    pub async fn update_note(&self, id: &NoteId, update: &NoteUpdate) -> StoreResult<Note> {
        match &self.backend {
            Backend::Memory(notes) => notes.update(id, update),
            Backend::Postgres(pool) => sqlx::query_as::<_, NoteRow>(
                r#"
                UPDATE notes
                SET title = COALESCE($2, title),
                    body = COALESCE($3, body),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING id, title, body, created_at, updated_at
                "#,
            )
            .bind(id.as_str())
            .bind(update.title.as_deref())
            .bind(update.body.as_deref())
            .fetch_optional(pool)
            .await
            .map_err(|e| StoreError::from_write(e, update.title.as_deref()))?
            .map(Note::from)
            .ok_or_else(|| StoreError::NoteNotFound(id.clone())),
        }
    }

    /// Delete a note. Returns false if no note had this id.
    pub async fn delete_note(&self, id: &NoteId) -> StoreResult<bool> {
        match &self.backend {
            Backend::Memory(notes) => Ok(notes.delete(id)),
            Backend::Postgres(pool) => {
                let result = sqlx::query("DELETE FROM notes WHERE id = $1")
                    .bind(id.as_str())
                    .execute(pool)
                    .await?;

                Ok(result.rows_affected() > 0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[test]
    fn test_config_default() {
        let config = StoreConfig::default();
        assert!(config.database_url.is_none());
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert!(config.run_migrations);
    }

    #[tokio::test]
    async fn connect_without_url_uses_memory() {
        let store = assert_ok!(Store::connect(StoreConfig::default()).await);
        assert!(!store.is_persistent());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = Store::in_memory();
        let first = store.insert_note(&NewNote::new("first", "1")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.insert_note(&NewNote::new("second", "2")).await.unwrap();

        let notes = store.list_notes().await.unwrap();
        let ids: Vec<_> = notes.iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let store = Store::in_memory();
        let note = store.insert_note(&NewNote::new("A", "B")).await.unwrap();

        let fetched = store.get_note(&note.id).await.unwrap();
        assert_eq!(fetched, note);

        let updated = store
            .update_note(&note.id, &NoteUpdate::body("C"))
            .await
            .unwrap();
        assert_eq!(updated.title, "A");
        assert_eq!(updated.body, "C");

        assert!(store.delete_note(&note.id).await.unwrap());
        let err = store.get_note(&note.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NoteNotFound(_)));
    }

    #[tokio::test]
    async fn clones_share_the_same_collection() {
        let store = Store::in_memory();
        let other = store.clone();
        store.insert_note(&NewNote::new("A", "B")).await.unwrap();
        assert_eq!(other.list_notes().await.unwrap().len(), 1);
    }
}
