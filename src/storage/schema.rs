//! Database schema definitions
//!
//! Column names are camelCase to stay compatible with stores created by the
//! mobile app. `tags` and `links` hold JSON arrays.

/// SQL to create the projects table
pub const CREATE_PROJECTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    color TEXT,
    description TEXT,
    createdAt TEXT NOT NULL
)
"#;

/// SQL to create the items table
pub const CREATE_ITEMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id TEXT PRIMARY KEY,
    type TEXT NOT NULL,
    projectId TEXT,
    parentId TEXT,
    title TEXT NOT NULL,
    body TEXT,
    tags TEXT,
    links TEXT,
    status TEXT NOT NULL,
    priority INTEGER,
    energy TEXT,
    timeEstimateMin INTEGER,
    remindAt TEXT,
    source TEXT NOT NULL,
    createdAt TEXT NOT NULL,
    updatedAt TEXT NOT NULL,
    FOREIGN KEY (projectId) REFERENCES projects (id),
    FOREIGN KEY (parentId) REFERENCES items (id)
)
"#;

/// SQL to create the saved-videos table
pub const CREATE_YOUTUBE_FAVORITES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS youtube_favorites (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    channelTitle TEXT NOT NULL,
    thumbnail TEXT,
    publishedAt TEXT NOT NULL,
    addedAt TEXT NOT NULL
)
"#;

/// SQL to create indexes. Only columns present since the first schema
/// version are indexed, so these succeed even if migration did not.
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_items_project ON items(projectId)",
    "CREATE INDEX IF NOT EXISTS idx_items_status ON items(status)",
    "CREATE INDEX IF NOT EXISTS idx_items_created ON items(createdAt)",
    "CREATE INDEX IF NOT EXISTS idx_projects_created ON projects(createdAt)",
];

/// Table creation statements
pub fn table_statements() -> Vec<&'static str> {
    vec![
        CREATE_PROJECTS_TABLE,
        CREATE_ITEMS_TABLE,
        CREATE_YOUTUBE_FAVORITES_TABLE,
    ]
}

/// Columns added after the first schema version: (table, column, definition)
pub const ADDED_COLUMNS: &[(&str, &str, &str)] = &[
    ("items", "parentId", "TEXT"),
    ("projects", "description", "TEXT"),
];
