use clap::Subcommand;
use owo_colors::OwoColorize;
use std::path::Path;

use crate::{emit_json, OutputMode};
use brainpocket::agenda;
use brainpocket::config::BrainpocketConfig;
use brainpocket::enrich::{is_youtube_url, PLACEHOLDER_TITLE};
use brainpocket::ui::{self, section, success, Icons};
use brainpocket::youtube::VideoSummary;
use brainpocket::{
    DeleteProjectOptions, Energy, Item, ItemFilter, ItemType, ItemUpdate, Link, LinkKind,
    NewItem, NewProject, ProjectUpdate, Status, Storage,
};
use chrono::Local;

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// List all projects
    List,

    /// Create a project
    Add {
        name: String,

        /// Hex color such as #3B82F6
        #[arg(long)]
        color: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Show a project and its items
    Show { id: String },

    /// Rename a project
    Rename { id: String, name: String },

    /// Set or clear a project's description
    Describe {
        id: String,
        /// New description (omit to clear)
        description: Option<String>,
    },

    /// Delete a project
    Delete {
        id: String,

        /// Move the project's items to the inbox instead of deleting them
        #[arg(long)]
        keep_items: bool,
    },
}

#[derive(Subcommand)]
pub enum ItemCommand {
    /// List items, newest first
    List {
        #[arg(long)]
        status: Option<Status>,

        #[arg(short, long)]
        project: Option<String>,
    },

    /// Capture a new item
    Add {
        /// Title (defaults to the video title for YouTube links)
        title: Option<String>,

        /// Item type (defaults to link with --link, idea otherwise)
        #[arg(short = 't', long = "type")]
        item_type: Option<ItemType>,

        #[arg(short, long)]
        body: Option<String>,

        #[arg(short, long)]
        project: Option<String>,

        /// Parent item (for notes under an idea)
        #[arg(long)]
        parent: Option<String>,

        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Attach a URL
        #[arg(long)]
        link: Option<String>,

        #[arg(long)]
        energy: Option<Energy>,

        #[arg(long)]
        priority: Option<i64>,

        /// Time estimate in minutes
        #[arg(long)]
        minutes: Option<i64>,

        /// Due date (YYYY-MM-DD, local time)
        #[arg(long, conflicts_with = "in_days")]
        due: Option<String>,

        /// Due this many days from today
        #[arg(long)]
        in_days: Option<u64>,
    },

    /// Show an item with its notes
    Show { id: String },

    /// Search items with filters
    Search {
        /// Text matched against title and body
        query: Option<String>,

        #[arg(short = 't', long = "type")]
        item_type: Option<ItemType>,

        #[arg(long)]
        status: Option<Status>,

        #[arg(long)]
        energy: Option<Energy>,

        #[arg(long)]
        tag: Option<String>,

        #[arg(short, long, conflicts_with = "inbox")]
        project: Option<String>,

        /// Only items without a project
        #[arg(long)]
        inbox: bool,

        #[arg(long, conflicts_with = "root")]
        parent: Option<String>,

        /// Only top-level items (no parent)
        #[arg(long)]
        root: bool,
    },

    /// Mark an item done
    Done { id: String },

    /// Move a done item back to the inbox
    Reopen { id: String },

    /// Pin an item
    Pin { id: String },

    /// Move an item to a project (omit the project for the inbox)
    Move { id: String, project: Option<String> },

    /// Delete an item
    Delete {
        id: String,

        /// Also delete its direct children
        #[arg(long)]
        with_children: bool,
    },

    /// Replace an item's tags (no tags clears them)
    Tag { id: String, tags: Vec<String> },
}

#[derive(Subcommand)]
pub enum VideoCommand {
    /// Search YouTube
    Search { query: String },

    /// List saved videos
    Favorites,

    /// Save a video
    Fav {
        /// Video ID
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        channel: Option<String>,

        #[arg(long)]
        thumbnail: Option<String>,
    },

    /// Remove a saved video
    Unfav { id: String },
}

fn print_items(items: &[Item]) {
    if items.is_empty() {
        println!("{}", ui::dim("No items."));
    } else {
        println!("{}", ui::items_table(items));
    }
}

/// `--type` wins; a captured URL defaults to a link
fn capture_type(explicit: Option<ItemType>, has_link: bool) -> ItemType {
    match explicit {
        Some(item_type) => item_type,
        None if has_link => ItemType::Link,
        None => ItemType::Idea,
    }
}

/// A value filters by equality, the bare flag filters for NULL
fn nullable_filter(value: Option<String>, only_null: bool) -> Option<Option<String>> {
    if only_null { Some(None) } else { value.map(Some) }
}

fn require<T>(value: Option<T>, what: &str, id: &str) -> anyhow::Result<T> {
    value.ok_or_else(|| anyhow::anyhow!("{} not found: {}", what, id))
}

pub fn run_init(
    output: OutputMode,
    path: &Path,
    config: &BrainpocketConfig,
    storage: &Storage,
) -> anyhow::Result<()> {
    let stats = storage.with(|s| s.stats())?;
    if output.is_human() {
        success(&format!("Wrote {}", path.display()));
        ui::field("Database", &config.database.display().to_string());
        println!("{}", ui::stats_table(&stats));
    } else {
        emit_json(&serde_json::json!({
            "config": path,
            "database": config.database,
            "stats": stats,
        }))?;
    }
    Ok(())
}

pub fn run_projects(output: OutputMode, storage: &Storage, action: ProjectCommand) -> anyhow::Result<()> {
    match action {
        ProjectCommand::List => {
            let projects = storage.with(|s| s.get_projects())?;
            if !output.is_human() {
                return emit_json(&projects);
            }
            if projects.is_empty() {
                println!("{}", ui::dim("No projects."));
            } else {
                println!("{}", ui::projects_table(&projects));
            }
        }

        ProjectCommand::Add { name, color, description } => {
            let mut new = NewProject::new(name);
            new.color = color;
            new.description = description;
            let project = storage.with(|s| s.create_project(new))?;
            if output.is_human() {
                success(&format!("Created project {} ({})", project.name, project.id));
            } else {
                emit_json(&project)?;
            }
        }

        ProjectCommand::Show { id } => {
            let (project, items) = storage.with(|s| {
                let project = s.get_project(&id)?;
                let items = s.get_items(None, Some(&id))?;
                Ok((project, items))
            })?;
            let project = require(project, "project", &id)?;
            if !output.is_human() {
                return emit_json(&serde_json::json!({ "project": project, "items": items }));
            }
            ui::header(&format!("{} {}", Icons::FOLDER, project.name));
            if let Some(description) = &project.description {
                println!("{}", description);
            }
            ui::field("Created", &project.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string());
            section("Items");
            print_items(&items);
        }

        ProjectCommand::Rename { id, name } => {
            let update = ProjectUpdate::default().name(name);
            let project = storage.with(|s| {
                s.update_project(&id, &update)?;
                s.get_project(&id)
            })?;
            let project = require(project, "project", &id)?;
            if output.is_human() {
                success(&format!("Renamed {} to {}", project.id, project.name));
            } else {
                emit_json(&project)?;
            }
        }

        ProjectCommand::Describe { id, description } => {
            let update = ProjectUpdate::default().description(description);
            let project = storage.with(|s| {
                s.update_project(&id, &update)?;
                s.get_project(&id)
            })?;
            let project = require(project, "project", &id)?;
            if output.is_human() {
                success(&format!("Updated description of {}", project.name));
            } else {
                emit_json(&project)?;
            }
        }

        ProjectCommand::Delete { id, keep_items } => {
            let options = if keep_items {
                DeleteProjectOptions::detach_items()
            } else {
                DeleteProjectOptions::default()
            };
            storage.with(|s| s.delete_project(&id, options))?;
            if output.is_human() {
                success(&format!("{} Deleted project {}", Icons::DEL, id));
            } else {
                emit_json(&serde_json::json!({ "deleted": id, "itemsDeleted": !keep_items }))?;
            }
        }
    }
    Ok(())
}

pub fn run_items(output: OutputMode, storage: &Storage, action: ItemCommand) -> anyhow::Result<()> {
    match action {
        ItemCommand::List { status, project } => {
            let items = storage.with(|s| s.get_items(status, project.as_deref()))?;
            if output.is_human() {
                print_items(&items);
            } else {
                emit_json(&items)?;
            }
        }

        ItemCommand::Add {
            title,
            item_type,
            body,
            project,
            parent,
            tags,
            link,
            energy,
            priority,
            minutes,
            due,
            in_days,
        } => {
            let youtube = link.as_deref().is_some_and(is_youtube_url);
            let item_type = capture_type(item_type, link.is_some());
            let title = match (title, &link) {
                (Some(title), _) => title,
                (None, Some(_)) => PLACEHOLDER_TITLE.to_string(),
                (None, None) => anyhow::bail!("a title is required unless --link is given"),
            };

            let today = Local::now().date_naive();
            let remind_at = match (due, in_days) {
                (Some(due), _) => Some(
                    agenda::parse_due_date(&due, &Local)
                        .ok_or_else(|| anyhow::anyhow!("invalid due date: {} (expected YYYY-MM-DD)", due))?,
                ),
                (None, Some(days)) => agenda::due_in_days(days, today, &Local),
                (None, None) => None,
            };

            let mut new = NewItem::new(item_type, title).tags(tags);
            new.project_id = project;
            new.parent_id = parent;
            new.energy = energy;
            new.priority = priority;
            new.time_estimate_min = minutes;
            new.remind_at = remind_at;
            new.body = body;
            match link {
                // Enrichment reads the URL from the body
                Some(url) if youtube && new.body.is_none() => new.body = Some(url),
                Some(url) if youtube => new = new.link(Link::new(url, LinkKind::Youtube)),
                Some(url) => new = new.link(Link::new(url, LinkKind::Web)),
                None => {}
            }

            let item = storage.create_item(new)?;
            if output.is_human() {
                success(&format!("{} Captured {} ({})", Icons::for_item(item.item_type), item.title, item.id));
            } else {
                emit_json(&item)?;
            }
        }

        ItemCommand::Show { id } => {
            let (item, notes) = storage.with(|s| {
                let item = s.get_item(&id)?;
                let notes = s.get_child_notes(&id)?;
                Ok((item, notes))
            })?;
            let item = require(item, "item", &id)?;
            if !output.is_human() {
                return emit_json(&serde_json::json!({ "item": item, "notes": notes }));
            }
            print_item(&item);
            if !notes.is_empty() {
                section("Notes");
                print_items(&notes);
            }
        }

        ItemCommand::Search {
            query,
            item_type,
            status,
            energy,
            tag,
            project,
            inbox,
            parent,
            root,
        } => {
            let filter = ItemFilter {
                query,
                project_id: nullable_filter(project, inbox),
                item_type,
                status,
                energy,
                tag,
                parent_id: nullable_filter(parent, root),
            };
            let items = storage.with(|s| s.search_items_with_filters(&filter))?;
            if output.is_human() {
                println!("{} {} match(es)", Icons::SEARCH, items.len());
                print_items(&items);
            } else {
                emit_json(&items)?;
            }
        }

        ItemCommand::Done { id } => {
            storage.with(|s| s.mark_item_done(&id))?;
            report(output, &format!("Marked {} done", id), &id)?;
        }

        ItemCommand::Reopen { id } => {
            let update = ItemUpdate::default().status(Status::Inbox);
            storage.with(|s| s.update_item(&id, &update))?;
            report(output, &format!("Reopened {}", id), &id)?;
        }

        ItemCommand::Pin { id } => {
            storage.with(|s| s.pin_item(&id))?;
            report(output, &format!("{} Pinned {}", Icons::PIN, id), &id)?;
        }

        ItemCommand::Move { id, project } => {
            storage.with(|s| s.move_item_to_project(&id, project.as_deref()))?;
            let target = project.as_deref().unwrap_or("inbox");
            report(output, &format!("Moved {} to {}", id, target), &id)?;
        }

        ItemCommand::Delete { id, with_children } => {
            if with_children {
                storage.with(|s| s.delete_item_with_children(&id))?;
            } else {
                storage.with(|s| s.delete_item(&id))?;
            }
            report(output, &format!("{} Deleted {}", Icons::DEL, id), &id)?;
        }

        ItemCommand::Tag { id, tags } => {
            let update = ItemUpdate::default().tags(tags);
            let item = storage.with(|s| {
                s.update_item(&id, &update)?;
                s.get_item(&id)
            })?;
            let item = require(item, "item", &id)?;
            if output.is_human() {
                success(&format!("Tags of {}: {}", item.id, item.tags.join(", ")));
            } else {
                emit_json(&item)?;
            }
        }
    }
    Ok(())
}

fn report(output: OutputMode, message: &str, id: &str) -> anyhow::Result<()> {
    if output.is_human() {
        success(message);
        Ok(())
    } else {
        emit_json(&serde_json::json!({ "ok": true, "id": id }))
    }
}

fn print_item(item: &Item) {
    let pin = if item.is_pinned() { Icons::PIN } else { "" };
    ui::header(&format!("{} {} {}", Icons::for_item(item.item_type), item.title, pin));
    ui::field("ID", &item.id);
    ui::field("Type", item.item_type.as_str());
    ui::field("Status", &item.status.as_str().style(ui::theme().for_status(item.status)).to_string());
    ui::field("Project", item.project_id.as_deref().unwrap_or("inbox"));
    if let Some(parent) = &item.parent_id {
        ui::field("Parent", parent);
    }
    if !item.tags.is_empty() {
        ui::field("Tags", &item.tags.join(", "));
    }
    if let Some(energy) = item.energy {
        ui::field("Energy", energy.as_str());
    }
    if let Some(minutes) = item.time_estimate_min {
        ui::field("Estimate", &format!("{} min", minutes));
    }
    if let Some(at) = item.remind_at {
        ui::field("Due", &at.with_timezone(&Local).format("%Y-%m-%d").to_string());
    }
    for link in &item.links {
        let label = link.title.as_deref().unwrap_or(&link.url);
        println!("{} {} {}", Icons::LINK, label, ui::muted(&link.url));
    }
    if let Some(body) = &item.body {
        println!();
        println!("{}", body);
    }
}

pub fn run_todo(output: OutputMode, storage: &Storage) -> anyhow::Result<()> {
    let tasks = storage.with(|s| s.get_open_tasks())?;
    let agenda = agenda::build(tasks, Local::now().date_naive(), &Local);
    if !output.is_human() {
        return emit_json(&agenda);
    }

    ui::header(&format!("{} To-Do ({} tasks)", Icons::CALENDAR, agenda.len()));
    let theme = ui::theme();
    let buckets = [
        ("Overdue", theme.overdue.clone(), &agenda.overdue),
        ("Today", theme.today.clone(), &agenda.today),
        ("Upcoming", theme.header.clone(), &agenda.upcoming),
        ("No date", theme.muted.clone(), &agenda.no_date),
    ];
    for (title, style, tasks) in buckets {
        if tasks.is_empty() {
            continue;
        }
        println!();
        println!("{} ({})", title.style(style), tasks.len());
        println!("{}", ui::items_table(tasks));
    }
    Ok(())
}

pub fn run_videos(
    output: OutputMode,
    storage: &Storage,
    config: &BrainpocketConfig,
    action: VideoCommand,
) -> anyhow::Result<()> {
    match action {
        VideoCommand::Search { query } => {
            let client = config.youtube.search_client();
            let spinner = ui::Spinner::new(&format!("Searching YouTube for '{}'...", query));
            let videos = client.search(&query);
            spinner.finish_and_clear();

            let results = storage.with(|s| s.mark_favorites(videos?))?;
            if !output.is_human() {
                return emit_json(&results);
            }
            if results.is_empty() {
                println!("{}", ui::dim("No videos found."));
            } else {
                println!("{} {} result(s)", Icons::VIDEO, results.len());
                println!("{}", ui::videos_table(&results));
            }
        }

        VideoCommand::Favorites => {
            let videos = storage.with(|s| s.mark_favorites(s.list_youtube_favorites()?))?;
            if !output.is_human() {
                let saved: Vec<_> = videos.into_iter().map(|r| r.video).collect();
                return emit_json(&saved);
            }
            if videos.is_empty() {
                println!("{}", ui::dim("No saved videos."));
            } else {
                println!("{}", ui::videos_table(&videos));
            }
        }

        VideoCommand::Fav { id, title, channel, thumbnail } => {
            let video = VideoSummary {
                title: title.unwrap_or_else(|| id.clone()),
                id,
                channel_title: channel.unwrap_or_default(),
                thumbnail,
                published_at: String::new(),
            };
            storage.with(|s| s.add_youtube_favorite(&video))?;
            if output.is_human() {
                success(&format!("{} Saved {}", Icons::HEART, video.title));
            } else {
                emit_json(&video)?;
            }
        }

        VideoCommand::Unfav { id } => {
            storage.with(|s| s.remove_youtube_favorite(&id))?;
            report(output, &format!("Removed {} from saved videos", id), &id)?;
        }
    }
    Ok(())
}

pub fn run_stats(output: OutputMode, storage: &Storage, config: &BrainpocketConfig) -> anyhow::Result<()> {
    let stats = storage.with(|s| s.stats())?;
    if output.is_human() {
        ui::header(&format!("{} BrainPocket Statistics", Icons::STATS));
        ui::field("Database", &format!("{} {}", Icons::DATABASE, config.database.display()));
        println!("{}", ui::stats_table(&stats));
    } else {
        emit_json(&stats)?;
    }
    Ok(())
}
