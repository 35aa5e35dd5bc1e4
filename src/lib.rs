//! Note-taking core: a canonical note collection with soft delete,
//! favorites, pinning, tag colors, search and persistence.
//!
//! The collection is owned by [`NoteStore`], persisted through a
//! [`NotePersistence`] adapter over a [`KeyValueStore`], and displayed through
//! the pure [`project`] function.

mod cli;
mod config;
mod errors;
mod helper;
mod kv;
mod note;
mod projector;
mod storage;
mod store;
mod tag;
mod theme;
mod types;

// Re-export key components
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use helper::*;
pub use kv::*;
pub use note::*;
pub use projector::*;
pub use storage::*;
pub use store::*;
pub use tag::*;
pub use theme::*;
pub use types::*;
