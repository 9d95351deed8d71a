//! # BrainPocket - personal capture store
//!
//! Local persistence for captured ideas, tasks, notes and links, optionally
//! grouped into projects.
//!
//! BrainPocket provides:
//! - SQLite-backed storage with additive schema migration and first-run demo data
//! - A typed repository over `projects` and `items` (CRUD + filtered search)
//! - Best-effort YouTube link enrichment on item creation
//! - Video search with persisted favorites
//! - Due-date agenda bucketing for tasks

pub mod clock;
pub mod project;
pub mod item;
pub mod storage;
pub mod enrich;
pub mod youtube;
pub mod agenda;
pub mod config;
pub mod server;
pub mod ui;

// Re-exports for convenient access
pub use project::{DeleteProjectOptions, NewProject, Project, ProjectUpdate};
pub use item::{Energy, Item, ItemFilter, ItemType, ItemUpdate, Link, LinkKind, NewItem, Source, Status};
pub use storage::{SqliteStore, Storage, StorageLocation};
pub use enrich::{OEmbedClient, TitleFetcher};

/// Result type alias for BrainPocket operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for BrainPocket operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Storage not initialized. Call initialize() first.")]
    NotInitialized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Missing YouTube API key (set youtube.api_key or BRAINPOCKET_YOUTUBE_API_KEY)")]
    MissingApiKey,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
