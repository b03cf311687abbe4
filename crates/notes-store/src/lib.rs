//! notes-store: document storage for the notes service.
//!
//! This crate provides:
//! - PostgreSQL storage for notes via sqlx
//! - An in-memory backend for tests and local runs
//! - Embedded schema migrations
//!
//! # Usage
//!
//! ```rust,ignore
//! use notes_store::{Store, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let store = Store::connect(config).await?;
//!
//! let note = store.insert_note(&NewNote::new("Groceries", "milk")).await?;
//! let notes = store.list_notes().await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryNotes;
pub use models::NoteRow;
pub use store::{Store, StoreConfig};

// Re-export notes-core for downstream crates
pub use notes_core;
