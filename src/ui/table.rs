use tabled::{settings::Style, Table, Tabled};

use crate::storage::DbStats;
use crate::ui::Icons;
use crate::youtube::SearchResult;
use crate::{Item, Project};

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "")]
    icon: &'static str,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Project")]
    project: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Description")]
    description: String,
}

#[derive(Tabled)]
struct VideoRow {
    #[tabled(rename = "")]
    saved: &'static str,
    #[tabled(rename = "Video ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Published")]
    published: String,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: usize,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn items_table(items: &[Item]) -> String {
    render(
        items
            .iter()
            .map(|item| ItemRow {
                id: item.id.clone(),
                icon: if item.is_pinned() { Icons::PIN } else { Icons::for_item(item.item_type) },
                title: item.title.clone(),
                status: item.status.to_string(),
                project: item.project_id.clone().unwrap_or_else(|| "inbox".to_string()),
                tags: item.tags.join(", "),
            })
            .collect(),
    )
}

pub fn projects_table(projects: &[Project]) -> String {
    render(
        projects
            .iter()
            .map(|p| ProjectRow {
                id: p.id.clone(),
                name: p.name.clone(),
                color: p.color.clone().unwrap_or_default(),
                description: p.description.clone().unwrap_or_default(),
            })
            .collect(),
    )
}

pub fn videos_table(results: &[SearchResult]) -> String {
    render(
        results
            .iter()
            .map(|r| VideoRow {
                saved: if r.favorited { Icons::HEART } else { Icons::EMPTY_HEART },
                id: r.video.id.clone(),
                title: r.video.title.clone(),
                channel: r.video.channel_title.clone(),
                published: r.video.published_at.chars().take(10).collect(),
            })
            .collect(),
    )
}

pub fn stats_table(stats: &DbStats) -> String {
    render(vec![
        StatRow { metric: "Projects", value: stats.projects },
        StatRow { metric: "Items", value: stats.items },
        StatRow { metric: "Inbox", value: stats.inbox },
        StatRow { metric: "Done", value: stats.done },
        StatRow { metric: "Pinned", value: stats.pinned },
        StatRow { metric: "Saved videos", value: stats.favorites },
    ])
}
