//! notes-client: client-side state for the notes service.
//!
//! This crate provides:
//! - [`NotesApi`]: HTTP client for the five note endpoints
//! - [`NoteStore`]: in-memory cache of the note collection with optimistic edits
//! - [`AutoSave`]: debounced persistence of a single editable value
//! - [`Debouncer`]: the trailing-edge debounce primitive both build on
//!
//! Control flow runs UI events → [`NoteStore`] → [`NotesRemote`] → REST API.
//! [`AutoSave`] and [`Debouncer`] are independent of the store.
//!
//! # Usage
//!
//! ```rust,ignore
//! use notes_client::{ClientConfig, NoteStore, NotesApi};
//!
//! let api = NotesApi::new(ClientConfig::from_env()?)?;
//! let store = NoteStore::new(api);
//! store.load().await;
//! let note = store.add(NewNote::new("Groceries", "milk")).await?;
//! store.edit(&note.id, NoteUpdate::body("milk, eggs")).await?;
//! ```

pub mod api;
pub mod autosave;
pub mod config;
pub mod debounce;
pub mod error;
pub mod notify;
pub mod store;

pub use api::{NotesApi, NotesRemote};
pub use autosave::AutoSave;
pub use config::{ClientConfig, ConfigError};
pub use debounce::Debouncer;
pub use error::{ErrorKind, NoteError};
pub use notify::{Notifier, TracingNotifier};
pub use store::NoteStore;

// Re-export notes-core for downstream crates
pub use notes_core;
