//! First-run demo data
//!
//! A brand-new store gets two projects and one item of every type so the
//! first screen is not empty. Seeding is gated on the `projects` row count:
//! once any project exists it never runs again.

use crate::item::{Energy, Item, ItemType, Link, LinkKind, Source, Status};
use crate::project::Project;
use crate::{clock, Result};
use super::SqliteStore;

fn demo_projects() -> Vec<Project> {
    let now = clock::now();
    vec![
        Project {
            id: "project-1".into(),
            name: "Personal Website".into(),
            color: Some("#3B82F6".into()),
            description: None,
            created_at: now,
        },
        Project {
            id: "project-2".into(),
            name: "Mobile App Idea".into(),
            color: Some("#10B981".into()),
            description: None,
            created_at: now,
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn demo_item(
    id: &str,
    item_type: ItemType,
    project_id: Option<&str>,
    title: &str,
    body: &str,
    tags: [&str; 2],
    status: Status,
    source: Source,
) -> Item {
    let now = clock::now();
    Item {
        id: id.into(),
        item_type,
        project_id: project_id.map(Into::into),
        parent_id: None,
        title: title.into(),
        body: Some(body.into()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        links: Vec::new(),
        status,
        priority: None,
        energy: None,
        time_estimate_min: None,
        remind_at: None,
        source,
        created_at: now,
        updated_at: now,
    }
}

fn demo_items() -> Vec<Item> {
    let mut website = demo_item(
        "item-1",
        ItemType::Task,
        Some("project-1"),
        "Design homepage layout",
        "Create wireframes and mockups for the main landing page",
        ["design", "frontend"],
        Status::Inbox,
        Source::Text,
    );
    website.priority = Some(2);
    website.energy = Some(Energy::Med);
    website.time_estimate_min = Some(120);

    let mut idea = demo_item(
        "item-2",
        ItemType::Idea,
        None,
        "AI-powered note organization",
        "Use machine learning to automatically categorize and tag notes",
        ["ai", "productivity"],
        Status::Inbox,
        Source::Voice,
    );
    idea.energy = Some(Energy::High);

    let mut link = demo_item(
        "item-3",
        ItemType::Link,
        Some("project-2"),
        "React Native best practices",
        "Comprehensive guide for mobile development",
        ["development", "mobile"],
        Status::Active,
        Source::Paste,
    );
    link.links = vec![
        Link::new("https://reactnative.dev/docs/getting-started", LinkKind::Web)
            .with_title("React Native Documentation"),
    ];
    link.priority = Some(super::PINNED_PRIORITY);
    link.energy = Some(Energy::Low);
    link.time_estimate_min = Some(30);

    let note = demo_item(
        "item-4",
        ItemType::Note,
        None,
        "Meeting notes - Q1 planning",
        "Key takeaways from quarterly planning session. Focus on user experience improvements.",
        ["meeting", "planning"],
        Status::Done,
        Source::Text,
    );

    let mut learning = demo_item(
        "item-5",
        ItemType::Project,
        None,
        "Learn TypeScript",
        "Complete TypeScript fundamentals course and build a sample project",
        ["learning", "typescript"],
        Status::Inbox,
        Source::Text,
    );
    learning.priority = Some(3);
    learning.energy = Some(Energy::High);
    learning.time_estimate_min = Some(480);

    vec![website, idea, link, note, learning]
}

/// Insert the demo data if the store has no projects. Returns whether it ran.
pub fn seed_demo_data(store: &SqliteStore) -> Result<bool> {
    if store.count_projects()? > 0 {
        return Ok(false);
    }

    let projects = demo_projects();
    let items = demo_items();
    for project in &projects {
        store.insert_project(project)?;
    }
    for item in &items {
        store.insert_item(item)?;
    }

    tracing::info!("Seeded {} demo projects and {} demo items", projects.len(), items.len());
    Ok(true)
}
