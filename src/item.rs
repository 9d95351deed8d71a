//! Item types
//!
//! An item is one captured unit: an idea, task, note, link, or a
//! project-tagged entry. The `Project` item type is only a tag and is not
//! related to the [`crate::Project`] entity.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Kind of captured item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Project,
    Idea,
    Task,
    Link,
    Note,
}

impl ItemType {
    /// Get the string representation stored in the `type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Project => "Project",
            ItemType::Idea => "Idea",
            ItemType::Task => "Task",
            ItemType::Link => "Link",
            ItemType::Note => "Note",
        }
    }

    pub fn all() -> &'static [ItemType] {
        &[
            ItemType::Project,
            ItemType::Idea,
            ItemType::Task,
            ItemType::Link,
            ItemType::Note,
        ]
    }
}

impl FromStr for ItemType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "project" => Ok(ItemType::Project),
            "idea" => Ok(ItemType::Idea),
            "task" | "todo" => Ok(ItemType::Task),
            "link" => Ok(ItemType::Link),
            "note" => Ok(ItemType::Note),
            _ => Err(Error::InvalidValue(format!("Unknown item type: {}", s))),
        }
    }
}

/// Workflow state of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Inbox,
    Active,
    Done,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Inbox => "inbox",
            Status::Active => "active",
            Status::Done => "done",
        }
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "inbox" => Ok(Status::Inbox),
            "active" => Ok(Status::Active),
            "done" => Ok(Status::Done),
            _ => Err(Error::InvalidValue(format!("Unknown status: {}", s))),
        }
    }
}

/// How much energy a task needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Energy {
    Low,
    Med,
    High,
}

impl Energy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Energy::Low => "low",
            Energy::Med => "med",
            Energy::High => "high",
        }
    }
}

impl FromStr for Energy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Energy::Low),
            "med" | "medium" => Ok(Energy::Med),
            "high" => Ok(Energy::High),
            _ => Err(Error::InvalidValue(format!("Unknown energy: {}", s))),
        }
    }
}

/// How the item was captured. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Voice,
    #[default]
    Text,
    Paste,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Voice => "voice",
            Source::Text => "text",
            Source::Paste => "paste",
        }
    }
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "voice" => Ok(Source::Voice),
            "text" => Ok(Source::Text),
            "paste" => Ok(Source::Paste),
            _ => Err(Error::InvalidValue(format!("Unknown source: {}", s))),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.as_str())
                }
            }
        )*
    };
}

display_as_str!(ItemType, Status, Energy, Source);

/// Kind of link attached to an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Youtube,
    Web,
    File,
}

/// A structured link attached to an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub kind: LinkKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    pub fn new(url: impl Into<String>, kind: LinkKind) -> Self {
        Self {
            url: url.into(),
            kind,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A captured item as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// `None` means the item is in the inbox
    pub project_id: Option<String>,
    /// Parent item, used to nest notes under an idea
    pub parent_id: Option<String>,
    pub title: String,
    pub body: Option<String>,
    pub tags: Vec<String>,
    pub links: Vec<Link>,
    pub status: Status,
    /// `1` means pinned
    pub priority: Option<i64>,
    pub energy: Option<Energy>,
    pub time_estimate_min: Option<i64>,
    /// Due date, compared at day granularity
    pub remind_at: Option<DateTime<Utc>>,
    pub source: Source,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn is_pinned(&self) -> bool {
        self.priority == Some(crate::storage::PINNED_PRIORITY)
    }

    pub fn in_inbox(&self) -> bool {
        self.project_id.is_none()
    }
}

/// Fields supplied by the caller when creating an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default = "default_status")]
    pub status: Status,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub energy: Option<Energy>,
    #[serde(default)]
    pub time_estimate_min: Option<i64>,
    #[serde(default)]
    pub remind_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: Source,
}

fn default_status() -> Status {
    Status::Inbox
}

impl NewItem {
    pub fn new(item_type: ItemType, title: impl Into<String>) -> Self {
        Self {
            item_type,
            project_id: None,
            parent_id: None,
            title: title.into(),
            body: None,
            tags: Vec::new(),
            links: Vec::new(),
            status: Status::Inbox,
            priority: None,
            energy: None,
            time_estimate_min: None,
            remind_at: None,
            source: Source::Text,
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn energy(mut self, energy: Energy) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn time_estimate(mut self, minutes: i64) -> Self {
        self.time_estimate_min = Some(minutes);
        self
    }

    pub fn remind_at(mut self, at: DateTime<Utc>) -> Self {
        self.remind_at = Some(at);
        self
    }
}

/// Partial update of an item.
///
/// Each field maps to exactly one column. Nullable columns use
/// `Option<Option<T>>`: `None` leaves the column alone, `Some(None)` writes NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ItemUpdate {
    #[serde(default, rename = "type")]
    pub item_type: Option<ItemType>,
    #[serde(default, deserialize_with = "nullable")]
    pub project_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub parent_id: Option<Option<String>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub body: Option<Option<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub links: Option<Vec<Link>>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "nullable")]
    pub priority: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub energy: Option<Option<Energy>>,
    #[serde(default, deserialize_with = "nullable")]
    pub time_estimate_min: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub remind_at: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub source: Option<Source>,
}

impl ItemUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: Option<String>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: Option<i64>) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn energy(mut self, energy: Option<Energy>) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn remind_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.remind_at = Some(at);
        self
    }
}

/// Search filters, all AND-combined.
///
/// `project_id` and `parent_id` distinguish "no filter" (`None`) from
/// "must be NULL" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Substring of title or body
    pub query: Option<String>,
    pub project_id: Option<Option<String>>,
    pub item_type: Option<ItemType>,
    pub status: Option<Status>,
    pub energy: Option<Energy>,
    /// Exact tag match
    pub tag: Option<String>,
    pub parent_id: Option<Option<String>>,
}

impl ItemFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn project(mut self, project_id: Option<String>) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Only items without a project
    pub fn inbox(self) -> Self {
        self.project(None)
    }

    pub fn item_type(mut self, item_type: ItemType) -> Self {
        self.item_type = Some(item_type);
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn energy(mut self, energy: Energy) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn parent(mut self, parent_id: Option<String>) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Deserialize a present field (including an explicit `null`) as `Some(..)`.
/// Combined with `#[serde(default)]` an absent field stays `None`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
