//! Project types
//!
//! A project is a named grouping container. Items reference it through
//! `projectId`; an item without one sits in the inbox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named grouping container for items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Generated at creation, never reused
    pub id: String,
    pub name: String,
    /// Hex color such as `#3B82F6`
    pub color: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when creating a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of a project.
///
/// Only `name`, `color` and `description` can change. For the nullable
/// columns the outer `Option` selects the column and the inner one is the
/// new value (`Some(None)` writes NULL).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::item::nullable")]
    pub color: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::item::nullable")]
    pub description: Option<Option<String>>,
}

impl ProjectUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn color(mut self, color: Option<String>) -> Self {
        self.color = Some(color);
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.description.is_none()
    }
}

/// What happens to a project's items when the project is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteProjectOptions {
    /// `true` deletes owned items, `false` moves them to the inbox
    pub delete_items: bool,
}

impl Default for DeleteProjectOptions {
    fn default() -> Self {
        Self { delete_items: true }
    }
}

impl DeleteProjectOptions {
    pub fn detach_items() -> Self {
        Self { delete_items: false }
    }
}
