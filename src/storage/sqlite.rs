//! SQLite storage implementation

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use serde::{Serialize, de::DeserializeOwned};

use crate::enrich::{self, OEmbedClient, TitleFetcher};
use crate::item::{Item, ItemFilter, ItemType, ItemUpdate, NewItem, Status};
use crate::project::{DeleteProjectOptions, NewProject, Project, ProjectUpdate};
use crate::youtube::{SearchResult, VideoSummary};
use crate::{Error, Result, clock};
use super::{migrate, schema};

/// `priority` value that marks an item as pinned
pub const PINNED_PRIORITY: i64 = 1;

const PROJECT_COLUMNS: &str = "id, name, color, description, createdAt";
const ITEM_COLUMNS: &str = "id, type, projectId, parentId, title, body, tags, links, status, priority, energy, timeEstimateMin, remindAt, source, createdAt, updatedAt";
const VIDEO_COLUMNS: &str = "id, title, channelTitle, thumbnail, publishedAt";

/// Newest first. Rows created within the same millisecond fall back to
/// insertion order.
const NEWEST_FIRST: &str = "ORDER BY createdAt DESC, rowid DESC";

/// SQLite-backed repository for projects, items and saved videos
pub struct SqliteStore {
    conn: Connection,
    fetcher: Arc<dyn TitleFetcher>,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        tracing::info!("Opened store at {}", path.display());
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn,
            fetcher: Arc::new(OEmbedClient::default()),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Replace the title fetcher used for link enrichment
    pub fn with_fetcher(mut self, fetcher: Arc<dyn TitleFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Create missing tables, add missing columns, then build indexes
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::table_statements() {
            self.conn.execute(stmt, [])?;
        }
        let added = migrate::migrate(&self.conn);
        if !added.is_empty() {
            tracing::debug!("Migrated schema: added {}", added.join(", "));
        }
        for stmt in schema::CREATE_INDEXES {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Project Operations ==========

    /// All projects, newest first
    pub fn get_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM projects {}", PROJECT_COLUMNS, NEWEST_FIRST))?;
        let projects = stmt
            .query_map([], row_to_project)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(projects)
    }

    /// Get a project by id
    pub fn get_project(&self, id: &str) -> Result<Option<Project>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLUMNS),
                [id],
                row_to_project,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Create a project with a generated id and creation time
    pub fn create_project(&self, new: NewProject) -> Result<Project> {
        if new.name.trim().is_empty() {
            return Err(Error::Validation("project name must not be empty".into()));
        }
        let project = Project {
            id: clock::new_id("project"),
            name: new.name,
            color: new.color,
            description: new.description,
            created_at: clock::now(),
        };
        self.insert_project(&project)?;
        Ok(project)
    }

    pub(crate) fn insert_project(&self, project: &Project) -> Result<()> {
        self.conn.execute(
            "INSERT INTO projects (id, name, color, description, createdAt) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                project.id,
                project.name,
                project.color,
                project.description,
                clock::to_db(&project.created_at),
            ],
        )?;
        Ok(())
    }

    /// Apply a partial update. An empty update does nothing.
    pub fn update_project(&self, id: &str, update: &ProjectUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let mut sets: Vec<(&'static str, Value)> = Vec::new();
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(Error::Validation("project name must not be empty".into()));
            }
            sets.push(("name", Value::Text(name.clone())));
        }
        if let Some(color) = &update.color {
            sets.push(("color", opt_text(color.clone())));
        }
        if let Some(description) = &update.description {
            sets.push(("description", opt_text(description.clone())));
        }

        self.update_row("projects", id, sets)
    }

    /// Delete a project, either with its items or moving them to the inbox.
    ///
    /// Both statements run in one transaction.
    pub fn delete_project(&mut self, id: &str, options: DeleteProjectOptions) -> Result<()> {
        let tx = self.conn.transaction()?;
        if options.delete_items {
            tx.execute("DELETE FROM items WHERE projectId = ?1", [id])?;
        } else {
            tx.execute(
                "UPDATE items SET projectId = NULL, updatedAt = ?1 WHERE projectId = ?2",
                params![clock::to_db(&clock::now()), id],
            )?;
        }
        tx.execute("DELETE FROM projects WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(())
    }

    /// Count all projects
    pub fn count_projects(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Item Operations ==========

    /// Items filtered by status and/or project, newest first
    pub fn get_items(&self, status: Option<Status>, project_id: Option<&str>) -> Result<Vec<Item>> {
        let filter = ItemFilter {
            status,
            project_id: project_id.map(|p| Some(p.to_string())),
            ..Default::default()
        };
        self.search_items_with_filters(&filter)
    }

    /// Get an item by id
    pub fn get_item(&self, id: &str) -> Result<Option<Item>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM items WHERE id = ?1", ITEM_COLUMNS),
                [id],
                row_to_item,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Create an item, enriching YouTube links first.
    ///
    /// Enrichment never fails the insert; see [`enrich::enrich_new_item`].
    pub fn create_item(&self, new: NewItem) -> Result<Item> {
        validate_title(&new.title)?;
        let new = enrich::enrich_new_item(new, self.fetcher.as_ref());
        self.insert_new_item(new)
    }

    /// Create an item exactly as given, without link enrichment
    pub fn insert_new_item(&self, new: NewItem) -> Result<Item> {
        validate_title(&new.title)?;
        let now = clock::now();

        let item = Item {
            id: clock::new_id("item"),
            item_type: new.item_type,
            project_id: new.project_id,
            parent_id: new.parent_id,
            title: new.title,
            body: new.body,
            tags: new.tags,
            links: new.links,
            status: new.status,
            priority: new.priority,
            energy: new.energy,
            time_estimate_min: new.time_estimate_min,
            remind_at: new.remind_at,
            source: new.source,
            created_at: now,
            updated_at: now,
        };
        self.insert_item(&item)?;
        Ok(item)
    }

    pub(crate) fn insert_item(&self, item: &Item) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO items (
                id, type, projectId, parentId, title, body, tags, links, status, priority,
                energy, timeEstimateMin, remindAt, source, createdAt, updatedAt
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                item.id,
                item.item_type.as_str(),
                item.project_id,
                item.parent_id,
                item.title,
                item.body,
                serde_json::to_string(&item.tags)?,
                serde_json::to_string(&item.links)?,
                item.status.as_str(),
                item.priority,
                item.energy.map(|e| e.as_str()),
                item.time_estimate_min,
                item.remind_at.as_ref().map(clock::to_db),
                item.source.as_str(),
                clock::to_db(&item.created_at),
                clock::to_db(&item.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Apply a partial update. `updatedAt` is refreshed even when the
    /// update sets nothing else.
    pub fn update_item(&self, id: &str, update: &ItemUpdate) -> Result<()> {
        let mut sets: Vec<(&'static str, Value)> = Vec::new();

        if let Some(item_type) = update.item_type {
            sets.push(("type", text(item_type.as_str())));
        }
        if let Some(project_id) = &update.project_id {
            sets.push(("projectId", opt_text(project_id.clone())));
        }
        if let Some(parent_id) = &update.parent_id {
            sets.push(("parentId", opt_text(parent_id.clone())));
        }
        if let Some(title) = &update.title {
            validate_title(title)?;
            sets.push(("title", Value::Text(title.clone())));
        }
        if let Some(body) = &update.body {
            sets.push(("body", opt_text(body.clone())));
        }
        if let Some(tags) = &update.tags {
            sets.push(("tags", json_text(tags)?));
        }
        if let Some(links) = &update.links {
            sets.push(("links", json_text(links)?));
        }
        if let Some(status) = update.status {
            sets.push(("status", text(status.as_str())));
        }
        if let Some(priority) = update.priority {
            sets.push(("priority", opt_int(priority)));
        }
        if let Some(energy) = update.energy {
            sets.push(("energy", opt_text(energy.map(|e| e.as_str()))));
        }
        if let Some(minutes) = update.time_estimate_min {
            sets.push(("timeEstimateMin", opt_int(minutes)));
        }
        if let Some(remind_at) = &update.remind_at {
            sets.push(("remindAt", opt_text(remind_at.as_ref().map(clock::to_db))));
        }
        if let Some(source) = update.source {
            sets.push(("source", text(source.as_str())));
        }
        sets.push(("updatedAt", Value::Text(clock::to_db(&clock::now()))));

        self.update_row("items", id, sets)
    }

    /// Substring search over title and body
    pub fn search_items(&self, query: &str) -> Result<Vec<Item>> {
        self.search_items_with_filters(&ItemFilter::new().query(query))
    }

    /// Items matching every given filter, newest first
    pub fn search_items_with_filters(&self, filter: &ItemFilter) -> Result<Vec<Item>> {
        let mut conditions: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(query) = filter.query.as_deref().filter(|q| !q.is_empty()) {
            conditions.push(r"(title LIKE ? ESCAPE '\' OR body LIKE ? ESCAPE '\')");
            let pattern = like_pattern(query);
            values.push(Value::Text(pattern.clone()));
            values.push(Value::Text(pattern));
        }
        if let Some(item_type) = filter.item_type {
            conditions.push("type = ?");
            values.push(text(item_type.as_str()));
        }
        if let Some(status) = filter.status {
            conditions.push("status = ?");
            values.push(text(status.as_str()));
        }
        if let Some(energy) = filter.energy {
            conditions.push("energy = ?");
            values.push(text(energy.as_str()));
        }
        if let Some(tag) = filter.tag.as_deref().filter(|t| !t.is_empty()) {
            conditions.push("EXISTS (SELECT 1 FROM json_each(items.tags) WHERE json_each.value = ?)");
            values.push(text(tag));
        }
        match &filter.project_id {
            Some(Some(project_id)) => {
                conditions.push("projectId = ?");
                values.push(Value::Text(project_id.clone()));
            }
            Some(None) => conditions.push("projectId IS NULL"),
            None => {}
        }
        match &filter.parent_id {
            Some(Some(parent_id)) => {
                conditions.push("parentId = ?");
                values.push(Value::Text(parent_id.clone()));
            }
            Some(None) => conditions.push("parentId IS NULL"),
            None => {}
        }

        let mut sql = format!("SELECT {} FROM items", ITEM_COLUMNS);
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push(' ');
        sql.push_str(NEWEST_FIRST);

        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(params_from_iter(values), row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    /// Delete an item. Missing ids are not an error.
    pub fn delete_item(&self, id: &str) -> Result<()> {
        self.conn.execute("DELETE FROM items WHERE id = ?1", [id])?;
        Ok(())
    }

    /// Delete an item and its direct children (notes under an idea)
    pub fn delete_item_with_children(&mut self, id: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM items WHERE parentId = ?1", [id])?;
        tx.execute("DELETE FROM items WHERE id = ?1", [id])?;
        tx.commit()?;
        Ok(())
    }

    /// Reassign an item to a project, or to the inbox with `None`
    pub fn move_item_to_project(&self, item_id: &str, project_id: Option<&str>) -> Result<()> {
        self.conn.execute(
            "UPDATE items SET projectId = ?1, updatedAt = ?2 WHERE id = ?3",
            params![project_id, clock::to_db(&clock::now()), item_id],
        )?;
        Ok(())
    }

    pub fn mark_item_done(&self, item_id: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE items SET status = ?1, updatedAt = ?2 WHERE id = ?3",
            params![Status::Done.as_str(), clock::to_db(&clock::now()), item_id],
        )?;
        Ok(())
    }

    /// Pin an item. Pins are not exclusive.
    pub fn pin_item(&self, item_id: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE items SET priority = ?1, updatedAt = ?2 WHERE id = ?3",
            params![PINNED_PRIORITY, clock::to_db(&clock::now()), item_id],
        )?;
        Ok(())
    }

    /// Pinned items, newest first
    pub fn get_pinned_items(&self) -> Result<Vec<Item>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM items WHERE priority = ?1 {}",
            ITEM_COLUMNS, NEWEST_FIRST
        ))?;
        let items = stmt
            .query_map([PINNED_PRIORITY], row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    pub fn get_tasks(&self) -> Result<Vec<Item>> {
        self.search_items_with_filters(&ItemFilter::new().item_type(ItemType::Task))
    }

    /// Tasks not yet done, as shown on the agenda
    pub fn get_open_tasks(&self) -> Result<Vec<Item>> {
        let mut tasks = self.get_tasks()?;
        tasks.retain(|t| t.status != Status::Done);
        Ok(tasks)
    }

    /// Notes nested under `parent_id`
    pub fn get_child_notes(&self, parent_id: &str) -> Result<Vec<Item>> {
        self.search_items_with_filters(
            &ItemFilter::new()
                .parent(Some(parent_id.to_string()))
                .item_type(ItemType::Note),
        )
    }

    /// Count all items
    pub fn count_items(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn update_row(&self, table: &str, id: &str, sets: Vec<(&'static str, Value)>) -> Result<()> {
        let clause = sets
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");
        let values = sets
            .into_iter()
            .map(|(_, value)| value)
            .chain(std::iter::once(Value::Text(id.to_string())));

        self.conn.execute(
            &format!("UPDATE {} SET {} WHERE id = ?", table, clause),
            params_from_iter(values),
        )?;
        Ok(())
    }

    // ========== Video Favorite Operations ==========

    /// Save a video. Saving it again refreshes its metadata only.
    pub fn add_youtube_favorite(&self, video: &VideoSummary) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO youtube_favorites (id, title, channelTitle, thumbnail, publishedAt, addedAt)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                channelTitle = excluded.channelTitle,
                thumbnail = excluded.thumbnail,
                publishedAt = excluded.publishedAt
            "#,
            params![
                video.id,
                video.title,
                video.channel_title,
                video.thumbnail,
                video.published_at,
                clock::to_db(&clock::now()),
            ],
        )?;
        Ok(())
    }

    pub fn remove_youtube_favorite(&self, video_id: &str) -> Result<()> {
        self.conn.execute("DELETE FROM youtube_favorites WHERE id = ?1", [video_id])?;
        Ok(())
    }

    pub fn is_youtube_favorite(&self, video_id: &str) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM youtube_favorites WHERE id = ?1", [video_id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    /// Saved videos, most recently saved first
    pub fn list_youtube_favorites(&self) -> Result<Vec<VideoSummary>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM youtube_favorites ORDER BY addedAt DESC, rowid DESC",
            VIDEO_COLUMNS
        ))?;
        let videos = stmt
            .query_map([], |row| {
                Ok(VideoSummary {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    channel_title: row.get(2)?,
                    thumbnail: row.get(3)?,
                    published_at: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(videos)
    }

    /// Save or unsave a video. Returns whether it is saved afterwards.
    pub fn toggle_youtube_favorite(&self, video: &VideoSummary) -> Result<bool> {
        if self.is_youtube_favorite(&video.id)? {
            self.remove_youtube_favorite(&video.id)?;
            Ok(false)
        } else {
            self.add_youtube_favorite(video)?;
            Ok(true)
        }
    }

    /// Annotate search hits with their saved state
    pub fn mark_favorites(&self, videos: Vec<VideoSummary>) -> Result<Vec<SearchResult>> {
        let mut stmt = self.conn.prepare("SELECT id FROM youtube_favorites")?;
        let saved = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<HashSet<_>>>()?;

        Ok(videos
            .into_iter()
            .map(|video| {
                let favorited = saved.contains(&video.id);
                SearchResult { video, favorited }
            })
            .collect())
    }

    /// Count saved videos
    pub fn count_favorites(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM youtube_favorites", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        let count_where = |sql: &str, params: &[&dyn rusqlite::ToSql]| -> Result<usize> {
            let count: i64 = self.conn.query_row(sql, params, |row| row.get(0))?;
            Ok(count as usize)
        };
        Ok(DbStats {
            projects: self.count_projects()?,
            items: self.count_items()?,
            inbox: count_where("SELECT COUNT(*) FROM items WHERE projectId IS NULL", &[])?,
            done: count_where("SELECT COUNT(*) FROM items WHERE status = ?1", &[&Status::Done.as_str()])?,
            pinned: count_where("SELECT COUNT(*) FROM items WHERE priority = ?1", &[&PINNED_PRIORITY])?,
            favorites: self.count_favorites()?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub projects: usize,
    pub items: usize,
    pub inbox: usize,
    pub done: usize,
    pub pinned: usize,
    pub favorites: usize,
}

pub(crate) fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::Validation("item title must not be empty".into()));
    }
    Ok(())
}

// ========== Row Mapping ==========

fn row_to_project(row: &Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        description: row.get(3)?,
        created_at: timestamp(row, 4)?,
    })
}

fn row_to_item(row: &Row) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        item_type: parse_column(row, 1)?,
        project_id: row.get(2)?,
        parent_id: row.get(3)?,
        title: row.get(4)?,
        body: row.get(5)?,
        tags: json_column(row, 6)?,
        links: json_column(row, 7)?,
        status: parse_column(row, 8)?,
        priority: row.get(9)?,
        energy: optional_parse_column(row, 10)?,
        time_estimate_min: row.get(11)?,
        remind_at: optional_timestamp(row, 12)?,
        source: parse_column(row, 13)?,
        created_at: timestamp(row, 14)?,
        updated_at: timestamp(row, 15)?,
    })
}

fn conversion_failure<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn parse_column<T: std::str::FromStr<Err = Error>>(row: &Row, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|e| conversion_failure(idx, e))
}

fn optional_parse_column<T: std::str::FromStr<Err = Error>>(row: &Row, idx: usize) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(idx)?;
    raw.filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|e| conversion_failure(idx, e)))
        .transpose()
}

fn timestamp(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    clock::from_db(&raw).map_err(|e| conversion_failure(idx, e))
}

fn optional_timestamp(row: &Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.filter(|s| !s.is_empty())
        .map(|s| clock::from_db(&s).map_err(|e| conversion_failure(idx, e)))
        .transpose()
}

/// Decode a JSON collection column. NULL, blank and `null` read as empty.
fn json_column<T: DeserializeOwned + Default>(row: &Row, idx: usize) -> rusqlite::Result<T> {
    let raw: Option<String> = row.get(idx)?;
    match raw.filter(|s| !s.trim().is_empty()) {
        None => Ok(T::default()),
        Some(s) => serde_json::from_str::<Option<T>>(&s)
            .map(Option::unwrap_or_default)
            .map_err(|e| conversion_failure(idx, e)),
    }
}

// ========== Parameter Helpers ==========

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn opt_text<S: Into<String>>(value: Option<S>) -> Value {
    value.map_or(Value::Null, |s| Value::Text(s.into()))
}

fn opt_int(value: Option<i64>) -> Value {
    value.map_or(Value::Null, Value::Integer)
}

fn json_text<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(Value::Text(serde_json::to_string(value)?))
}

/// `%query%` with LIKE wildcards in the query escaped
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::tests::{Offline, StaticTitle};
    use crate::item::{Energy, Link, LinkKind};

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap().with_fetcher(Arc::new(Offline))
    }

    fn task(title: &str) -> NewItem {
        NewItem::new(ItemType::Task, title)
    }

    #[test]
    fn test_project_crud() {
        let store = store();
        let created = store
            .create_project(NewProject::new("Test").color("#111111"))
            .unwrap();

        assert!(created.id.starts_with("project-"));
        assert!(created.description.is_none());

        let fetched = store.get_project(&created.id).unwrap().unwrap();
        assert_eq!(fetched, created);

        store
            .update_project(&created.id, &ProjectUpdate::default().name("Renamed"))
            .unwrap();
        let renamed = store.get_project(&created.id).unwrap().unwrap();
        assert_eq!(renamed.name, "Renamed");
        assert_eq!(renamed.color.as_deref(), Some("#111111"));
    }

    #[test]
    fn test_missing_project_is_none() {
        assert!(store().get_project("project-404").unwrap().is_none());
    }

    #[test]
    fn test_project_update_nulls_and_noops() {
        let store = store();
        let p = store
            .create_project(NewProject::new("Garden").color("#00FF00").description("Beds"))
            .unwrap();

        store.update_project(&p.id, &ProjectUpdate::default()).unwrap();
        assert_eq!(store.get_project(&p.id).unwrap().unwrap(), p);

        store
            .update_project(&p.id, &ProjectUpdate::default().description(None))
            .unwrap();
        let updated = store.get_project(&p.id).unwrap().unwrap();
        assert!(updated.description.is_none());
        assert_eq!(updated.color.as_deref(), Some("#00FF00"));
    }

    #[test]
    fn test_blank_names_rejected() {
        let store = store();
        assert!(matches!(store.create_project(NewProject::new("  ")), Err(Error::Validation(_))));
        assert!(matches!(store.create_item(task("")), Err(Error::Validation(_))));
    }

    #[test]
    fn test_projects_newest_first() {
        let store = store();
        let a = store.create_project(NewProject::new("A")).unwrap();
        let b = store.create_project(NewProject::new("B")).unwrap();
        let ids: Vec<_> = store.get_projects().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn test_tags_and_links_round_trip() {
        let store = store();
        let links = vec![
            Link::new("https://example.com/b", LinkKind::Web).with_title("B"),
            Link::new("/tmp/a.pdf", LinkKind::File),
        ];
        let mut new = task("Read").tags(["zeta", "alpha", "mid"]);
        new.links = links.clone();
        let created = store.create_item(new).unwrap();

        let fetched = store.get_item(&created.id).unwrap().unwrap();
        assert_eq!(fetched.tags, vec!["zeta", "alpha", "mid"]);
        assert_eq!(fetched.links, links);

        let listed = store.get_items(None, None).unwrap();
        assert_eq!(listed[0].tags, fetched.tags);
        assert_eq!(listed[0].links, links);
        assert_eq!(listed[0], created);
    }

    #[test]
    fn test_empty_collections_persist_as_arrays() {
        let store = store();
        let item = store.create_item(task("Bare")).unwrap();
        let (tags, links): (String, String) = store
            .conn
            .query_row("SELECT tags, links FROM items WHERE id = ?1", [&item.id], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(tags, "[]");
        assert_eq!(links, "[]");
    }

    #[test]
    fn test_null_collections_read_as_empty() {
        let store = store();
        let item = store.create_item(task("Legacy")).unwrap();
        store
            .conn
            .execute("UPDATE items SET tags = NULL, links = 'null' WHERE id = ?1", [&item.id])
            .unwrap();
        let fetched = store.get_item(&item.id).unwrap().unwrap();
        assert!(fetched.tags.is_empty());
        assert!(fetched.links.is_empty());
    }

    #[test]
    fn test_get_items_filters() {
        let store = store();
        let p = store.create_project(NewProject::new("Work")).unwrap();
        store.create_item(task("a").project(&p.id)).unwrap();
        store.create_item(task("b").project(&p.id).status(Status::Done)).unwrap();
        store.create_item(task("c").status(Status::Done)).unwrap();

        assert_eq!(store.get_items(None, None).unwrap().len(), 3);
        assert_eq!(store.get_items(Some(Status::Done), None).unwrap().len(), 2);
        assert_eq!(store.get_items(None, Some(&p.id)).unwrap().len(), 2);
        let both = store.get_items(Some(Status::Done), Some(&p.id)).unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].title, "b");
    }

    #[test]
    fn test_update_item_refreshes_updated_at() {
        let store = store();
        let item = store.create_item(task("Draft")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));

        store
            .update_item(
                &item.id,
                &ItemUpdate::default()
                    .title("Final")
                    .tags(["x", "y"])
                    .energy(Some(Energy::High))
                    .body(Some("text".into())),
            )
            .unwrap();
        let updated = store.get_item(&item.id).unwrap().unwrap();
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.tags, vec!["x", "y"]);
        assert_eq!(updated.energy, Some(Energy::High));
        assert_eq!(updated.body.as_deref(), Some("text"));
        assert_eq!(updated.created_at, item.created_at);
        assert!(updated.updated_at > item.updated_at);

        std::thread::sleep(std::time::Duration::from_millis(5));
        store.update_item(&item.id, &ItemUpdate::default()).unwrap();
        let touched = store.get_item(&item.id).unwrap().unwrap();
        assert!(touched.updated_at > updated.updated_at);
        assert_eq!(touched.title, "Final");
    }

    #[test]
    fn test_update_item_clears_nullable_fields() {
        let store = store();
        let item = store
            .create_item(task("Due").priority(2).time_estimate(30).remind_at(clock::now()))
            .unwrap();
        let mut update = ItemUpdate::default().priority(None).remind_at(None);
        update.time_estimate_min = Some(None);
        store.update_item(&item.id, &update).unwrap();

        let fetched = store.get_item(&item.id).unwrap().unwrap();
        assert!(fetched.priority.is_none());
        assert!(fetched.remind_at.is_none());
        assert!(fetched.time_estimate_min.is_none());
    }

    #[test]
    fn test_delete_project_detaches_items() {
        let mut store = store();
        let p = store.create_project(NewProject::new("Old")).unwrap();
        let a = store.create_item(task("a").project(&p.id)).unwrap();
        let b = store.create_item(task("b").project(&p.id)).unwrap();

        store.delete_project(&p.id, DeleteProjectOptions::detach_items()).unwrap();

        assert!(store.get_project(&p.id).unwrap().is_none());
        let items = store.get_items(None, None).unwrap();
        assert_eq!(items.len(), 2);
        for id in [&a.id, &b.id] {
            let item = items.iter().find(|i| &i.id == id).unwrap();
            assert!(item.project_id.is_none());
        }
    }

    #[test]
    fn test_delete_project_cascades_items() {
        let mut store = store();
        let p = store.create_project(NewProject::new("Old")).unwrap();
        store.create_item(task("a").project(&p.id)).unwrap();
        let keep = store.create_item(task("keep")).unwrap();

        store.delete_project(&p.id, DeleteProjectOptions::default()).unwrap();

        let items = store.get_items(None, None).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, keep.id);
    }

    #[test]
    fn test_mark_done_is_idempotent() {
        let store = store();
        let item = store.create_item(task("Ship")).unwrap();
        store.mark_item_done(&item.id).unwrap();
        store.mark_item_done(&item.id).unwrap();
        assert_eq!(store.get_item(&item.id).unwrap().unwrap().status, Status::Done);
    }

    #[test]
    fn test_missing_ids_are_silent() {
        let store = store();
        store.delete_item("item-404").unwrap();
        store.mark_item_done("item-404").unwrap();
        store.pin_item("item-404").unwrap();
        store.move_item_to_project("item-404", None).unwrap();
        assert!(store.get_item("item-404").unwrap().is_none());
    }

    #[test]
    fn test_pins_are_not_exclusive() {
        let store = store();
        let a = store.create_item(task("a")).unwrap();
        let b = store.create_item(task("b")).unwrap();
        store.pin_item(&a.id).unwrap();
        store.pin_item(&b.id).unwrap();

        let pinned = store.get_pinned_items().unwrap();
        assert_eq!(pinned.len(), 2);
        assert!(pinned.iter().all(Item::is_pinned));
        assert_eq!(pinned[0].id, b.id);
    }

    #[test]
    fn test_move_item_between_project_and_inbox() {
        let store = store();
        let p = store.create_project(NewProject::new("P")).unwrap();
        let item = store.create_item(task("wander")).unwrap();

        store.move_item_to_project(&item.id, Some(&p.id)).unwrap();
        assert_eq!(store.get_item(&item.id).unwrap().unwrap().project_id, Some(p.id.clone()));

        store.move_item_to_project(&item.id, None).unwrap();
        let moved = store.get_item(&item.id).unwrap().unwrap();
        assert!(moved.in_inbox());
        assert!(moved.updated_at >= moved.created_at);
    }

    #[test]
    fn test_filter_null_vs_absent() {
        let store = store();
        let p = store.create_project(NewProject::new("P")).unwrap();
        let inbox = store.create_item(task("inbox")).unwrap();
        store.create_item(task("owned").project(&p.id)).unwrap();

        let only_inbox = store.search_items_with_filters(&ItemFilter::new().inbox()).unwrap();
        assert_eq!(only_inbox.len(), 1);
        assert_eq!(only_inbox[0].id, inbox.id);

        let all = store.search_items_with_filters(&ItemFilter::new()).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].created_at >= all[1].created_at);
        assert_eq!(all[0].title, "owned");
    }

    #[test]
    fn test_filter_combinations() {
        let store = store();
        let idea = store
            .create_item(NewItem::new(ItemType::Idea, "Solar oven").body("cardboard build").energy(Energy::High))
            .unwrap();
        store
            .create_item(NewItem::new(ItemType::Note, "Reflector angle").parent(&idea.id))
            .unwrap();
        store.create_item(task("Buy foil").energy(Energy::Low)).unwrap();

        let hits = store
            .search_items_with_filters(&ItemFilter::new().query("CARDBOARD"))
            .unwrap();
        assert_eq!(hits.len(), 1);

        let hits = store
            .search_items_with_filters(&ItemFilter::new().item_type(ItemType::Task).energy(Energy::Low))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Buy foil");

        let roots = store
            .search_items_with_filters(&ItemFilter::new().parent(None))
            .unwrap();
        assert_eq!(roots.len(), 2);

        let notes = store.get_child_notes(&idea.id).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Reflector angle");
    }

    #[test]
    fn test_query_escapes_wildcards() {
        let store = store();
        store.create_item(task("100% done")).unwrap();
        store.create_item(task("1000 things")).unwrap();
        let hits = store.search_items("0%").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "100% done");
    }

    #[test]
    fn test_tag_filter_is_exact() {
        let store = store();
        store.create_item(task("a").tags(["xabx"])).unwrap();
        store.create_item(task("b").tags(["ab", "other"])).unwrap();

        let hits = store.search_items_with_filters(&ItemFilter::new().tag("ab")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "b");
    }

    #[test]
    fn test_delete_item_with_children() {
        let mut store = store();
        let idea = store.create_item(NewItem::new(ItemType::Idea, "Idea")).unwrap();
        store.create_item(NewItem::new(ItemType::Note, "n1").parent(&idea.id)).unwrap();
        store.create_item(NewItem::new(ItemType::Note, "n2").parent(&idea.id)).unwrap();
        let other = store.create_item(task("unrelated")).unwrap();

        store.delete_item_with_children(&idea.id).unwrap();
        let left = store.get_items(None, None).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, other.id);
    }

    #[test]
    fn test_create_item_survives_enrichment_failure() {
        let store = store();
        let item = store
            .create_item(NewItem::new(ItemType::Link, "Link").body("https://youtu.be/abc123"))
            .unwrap();
        assert_eq!(item.title, "Link");
        assert!(item.links.is_empty());

        let fetched = store.get_item(&item.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Link");
        assert!(fetched.links.is_empty());
    }

    #[test]
    fn test_create_item_enriches_youtube_link() {
        let store = SqliteStore::open_in_memory()
            .unwrap()
            .with_fetcher(Arc::new(StaticTitle("Lofi beats")));
        let item = store
            .create_item(NewItem::new(ItemType::Link, "Link").body("https://www.youtube.com/watch?v=xyz"))
            .unwrap();

        let fetched = store.get_item(&item.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Lofi beats");
        assert_eq!(fetched.links, vec![
            Link::new("https://www.youtube.com/watch?v=xyz", LinkKind::Youtube).with_title("Lofi beats")
        ]);
    }

    #[test]
    fn test_youtube_favorites() {
        let store = store();
        let video = VideoSummary {
            id: "abc123".into(),
            title: "Rust".into(),
            channel_title: "Chan".into(),
            thumbnail: None,
            published_at: "2021-01-01T00:00:00Z".into(),
        };
        let other = VideoSummary { id: "zzz".into(), ..video.clone() };

        assert!(!store.is_youtube_favorite("abc123").unwrap());
        store.add_youtube_favorite(&video).unwrap();
        store.add_youtube_favorite(&video).unwrap();
        assert!(store.is_youtube_favorite("abc123").unwrap());
        assert_eq!(store.list_youtube_favorites().unwrap(), vec![video.clone()]);

        let marked = store.mark_favorites(vec![video.clone(), other.clone()]).unwrap();
        assert!(marked[0].favorited);
        assert!(!marked[1].favorited);

        assert!(store.toggle_youtube_favorite(&other).unwrap());
        assert!(!store.toggle_youtube_favorite(&video).unwrap());
        assert_eq!(store.list_youtube_favorites().unwrap(), vec![other]);
    }

    #[test]
    fn test_stats() {
        let store = store();
        let p = store.create_project(NewProject::new("P")).unwrap();
        let a = store.create_item(task("a").project(&p.id)).unwrap();
        store.create_item(task("b")).unwrap();
        store.mark_item_done(&a.id).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.projects, 1);
        assert_eq!(stats.items, 2);
        assert_eq!(stats.inbox, 1);
        assert_eq!(stats.done, 1);
        assert_eq!(stats.favorites, 0);
    }

    #[test]
    fn test_agenda_leaves_out_done_tasks() {
        let store = store();
        let due = crate::agenda::parse_due_date("2024-01-01", &Utc).unwrap();
        let old = store.create_item(task("old").remind_at(due)).unwrap();
        store.create_item(task("open")).unwrap();
        store.create_item(NewItem::new(ItemType::Idea, "not a task")).unwrap();
        store.mark_item_done(&old.id).unwrap();

        let today = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let agenda = crate::agenda::build(store.get_open_tasks().unwrap(), today, &Utc);
        assert!(agenda.overdue.is_empty());
        assert_eq!(agenda.no_date.len(), 1);
        assert_eq!(store.get_tasks().unwrap().len(), 2);

        // Reopening puts the task back on the agenda
        store
            .update_item(&old.id, &ItemUpdate::default().status(Status::Inbox))
            .unwrap();
        let agenda = crate::agenda::build(store.get_open_tasks().unwrap(), today, &Utc);
        assert_eq!(agenda.overdue.len(), 1);
        assert_eq!(agenda.overdue[0].id, old.id);
        assert_eq!(agenda.overdue[0].status, Status::Inbox);
    }

    #[test]
    fn test_insert_new_item_skips_enrichment() {
        let store = SqliteStore::open_in_memory()
            .unwrap()
            .with_fetcher(Arc::new(StaticTitle("Fetched")));
        let item = store
            .insert_new_item(NewItem::new(ItemType::Link, "Link").body("https://youtu.be/abc123"))
            .unwrap();
        assert_eq!(item.title, "Link");
        assert!(item.links.is_empty());
        assert!(matches!(store.insert_new_item(task(" ")), Err(Error::Validation(_))));
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("a_b"), r"%a\_b%");
        assert_eq!(like_pattern(r"c:\x"), r"%c:\\x%");
    }
}
