//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - projects(id, name, color, description, createdAt)
//! - items(id, type, projectId, parentId, title, body, tags, links, status, ...)
//! - youtube_favorites(id, title, channelTitle, thumbnail, publishedAt, addedAt)

pub mod schema;
pub mod migrate;
pub mod seed;
pub mod sqlite;
pub mod handle;

pub use sqlite::{DbStats, PINNED_PRIORITY, SqliteStore};
pub use handle::{Storage, StorageLocation};
