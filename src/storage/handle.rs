//! Storage handle
//!
//! [`Storage`] owns the one connection an application shares. It is built
//! explicitly, opened with [`Storage::initialize`] (idempotent) and released
//! with [`Storage::close`]. Access before initialization or after close fails
//! with [`Error::NotInitialized`].

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::enrich::{self, OEmbedClient, TitleFetcher};
use crate::item::{Item, NewItem};
use crate::{Error, Result};
use super::{SqliteStore, seed, sqlite::validate_title};

/// Where the store lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    File(PathBuf),
    Memory,
}

/// Lazily opened, shareable store
pub struct Storage {
    location: StorageLocation,
    seed_demo: bool,
    fetcher: Arc<dyn TitleFetcher>,
    store: Mutex<Option<SqliteStore>>,
}

impl Storage {
    pub fn new(location: StorageLocation) -> Self {
        Self {
            location,
            seed_demo: true,
            fetcher: Arc::new(OEmbedClient::default()),
            store: Mutex::new(None),
        }
    }

    /// Whether a brand-new store gets demo data (default `true`)
    pub fn with_seed_demo(mut self, seed_demo: bool) -> Self {
        self.seed_demo = seed_demo;
        self
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn TitleFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Option<SqliteStore>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open the store, create or migrate the schema, then seed demo data.
    /// Calling it again once open does nothing.
    pub fn initialize(&self) -> Result<()> {
        let mut guard = self.lock();
        if guard.is_some() {
            return Ok(());
        }

        let store = match &self.location {
            StorageLocation::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                SqliteStore::open(path)
            }
            StorageLocation::Memory => SqliteStore::open_in_memory(),
        }
        .inspect_err(|e| tracing::error!("Database initialization failed: {}", e))?
        .with_fetcher(Arc::clone(&self.fetcher));

        if self.seed_demo {
            seed::seed_demo_data(&store)?;
        }

        *guard = Some(store);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().is_some()
    }

    /// Run `f` against the open store
    pub fn with<T>(&self, f: impl FnOnce(&mut SqliteStore) -> Result<T>) -> Result<T> {
        let mut guard = self.lock();
        let store = guard.as_mut().ok_or(Error::NotInitialized)?;
        f(store)
    }

    /// Create an item. Link enrichment runs before the store is locked, so a
    /// slow title lookup never blocks other callers.
    pub fn create_item(&self, new: NewItem) -> Result<Item> {
        validate_title(&new.title)?;
        if !self.is_initialized() {
            return Err(Error::NotInitialized);
        }
        let new = enrich::enrich_new_item(new, self.fetcher.as_ref());
        self.with(|s| s.insert_new_item(new))
    }

    /// Drop the connection. Returns whether a store was open.
    pub fn close(&self) -> bool {
        self.lock().take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::EnrichError;
    use crate::enrich::tests::Offline;
    use crate::item::ItemType;
    use crate::project::NewProject;
    use std::time::{Duration, Instant};

    /// Answers after a delay
    struct Slow(Duration);

    impl TitleFetcher for Slow {
        fn fetch_title(&self, _url: &str) -> std::result::Result<String, EnrichError> {
            std::thread::sleep(self.0);
            Ok("Slow title".to_string())
        }
    }

    #[test]
    fn test_access_before_initialize_fails() {
        let storage = Storage::new(StorageLocation::Memory);
        assert!(!storage.is_initialized());
        let result = storage.with(|s| s.get_projects());
        assert!(matches!(result, Err(Error::NotInitialized)));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let storage = Storage::new(StorageLocation::Memory).with_fetcher(Arc::new(Offline));
        storage.initialize().unwrap();
        storage.with(|s| s.create_project(NewProject::new("Keep"))).unwrap();

        storage.initialize().unwrap();
        let names: Vec<_> = storage
            .with(|s| s.get_projects())
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert!(names.contains(&"Keep".to_string()));
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_title_lookup_does_not_block_readers() {
        let storage = Storage::new(StorageLocation::Memory)
            .with_seed_demo(false)
            .with_fetcher(Arc::new(Slow(Duration::from_millis(1500))));
        storage.initialize().unwrap();

        std::thread::scope(|scope| {
            let writer = scope.spawn(|| {
                storage.create_item(NewItem::new(ItemType::Link, "Link").body("https://youtu.be/abc123"))
            });

            std::thread::sleep(Duration::from_millis(100));
            let started = Instant::now();
            storage.with(|s| s.get_projects()).unwrap();
            assert!(started.elapsed() < Duration::from_millis(500));

            let item = writer.join().unwrap().unwrap();
            assert_eq!(item.title, "Slow title");
            assert_eq!(item.links.len(), 1);
        });
    }

    #[test]
    fn test_create_item_checks_state_before_fetching() {
        let storage = Storage::new(StorageLocation::Memory)
            .with_fetcher(Arc::new(Slow(Duration::from_secs(5))));
        let started = Instant::now();
        let result = storage.create_item(NewItem::new(ItemType::Link, "Link").body("https://youtu.be/abc123"));
        assert!(matches!(result, Err(Error::NotInitialized)));
        assert!(started.elapsed() < Duration::from_secs(1));

        storage.initialize().unwrap();
        assert!(matches!(storage.create_item(NewItem::new(ItemType::Note, " ")), Err(Error::Validation(_))));
    }

    #[test]
    fn test_seed_can_be_disabled() {
        let storage = Storage::new(StorageLocation::Memory).with_seed_demo(false);
        storage.initialize().unwrap();
        assert_eq!(storage.with(|s| s.count_items()).unwrap(), 0);
    }

    #[test]
    fn test_close_then_reopen_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("brainpocket.db");
        let storage = Storage::new(StorageLocation::File(path.clone()));

        storage.initialize().unwrap();
        assert!(path.exists());
        assert_eq!(storage.with(|s| s.count_projects()).unwrap(), 2);

        assert!(storage.close());
        assert!(matches!(storage.with(|s| s.count_projects()), Err(Error::NotInitialized)));
        assert!(!storage.close());

        // Seeding runs once per store, not once per process
        storage.initialize().unwrap();
        assert_eq!(storage.with(|s| s.count_projects()).unwrap(), 2);
        assert_eq!(storage.with(|s| s.count_items()).unwrap(), 5);
    }

    #[test]
    fn test_upgrades_old_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.db");
        {
            let conn = rusqlite::Connection::open(&path).unwrap();
            conn.execute_batch(
                r#"
                CREATE TABLE projects (id TEXT PRIMARY KEY, name TEXT NOT NULL, color TEXT, createdAt TEXT NOT NULL);
                CREATE TABLE items (
                    id TEXT PRIMARY KEY, type TEXT NOT NULL, projectId TEXT, title TEXT NOT NULL,
                    body TEXT, tags TEXT, links TEXT, status TEXT NOT NULL, priority INTEGER,
                    energy TEXT, timeEstimateMin INTEGER, remindAt TEXT, source TEXT NOT NULL,
                    createdAt TEXT NOT NULL, updatedAt TEXT NOT NULL
                );
                INSERT INTO projects VALUES ('project-old', 'Legacy', '#000000', '2023-05-01T10:00:00.000Z');
                INSERT INTO items VALUES ('item-old', 'Idea', 'project-old', 'Keep me', NULL, '["x"]', '[]',
                    'inbox', NULL, NULL, NULL, NULL, 'text', '2023-05-01T10:00:00.000Z', '2023-05-01T10:00:00.000Z');
                "#,
            )
            .unwrap();
        }

        let storage = Storage::new(StorageLocation::File(path));
        storage.initialize().unwrap();

        let project = storage.with(|s| s.get_project("project-old")).unwrap().unwrap();
        assert_eq!(project.name, "Legacy");
        assert!(project.description.is_none());

        let item = storage.with(|s| s.get_item("item-old")).unwrap().unwrap();
        assert_eq!(item.title, "Keep me");
        assert_eq!(item.tags, vec!["x"]);
        assert!(item.parent_id.is_none());

        // Existing projects suppress demo data
        assert_eq!(storage.with(|s| s.count_projects()).unwrap(), 1);
    }
}
