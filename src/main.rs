//! BrainPocket CLI - capture ideas, tasks, notes and links from the terminal

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use brainpocket::config::{self, BrainpocketConfig};
use brainpocket::{ui, Storage, StorageLocation};

mod commands;

#[derive(Parser)]
#[command(name = "brainpocket")]
#[command(version)]
#[command(about = "Personal capture store for ideas, tasks, notes and links")]
#[command(long_about = r#"
BrainPocket keeps everything you capture in one local SQLite file:
  • Inbox of ideas, tasks, notes and links, optionally grouped into projects
  • Filtered search by text, type, status, energy and tag
  • Task agenda by due date
  • YouTube search with saved favorites

Example usage:
  brainpocket items add "Call the plumber" --type task --due 2026-01-05
  brainpocket items search --tag urgent
  brainpocket todo
  brainpocket serve --port 3000
"#)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides the config)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,

        /// Start with an empty database instead of demo data
        #[arg(long)]
        no_demo: bool,
    },

    /// Manage projects
    Projects {
        #[command(subcommand)]
        action: commands::ProjectCommand,
    },

    /// Capture and manage items
    Items {
        #[command(subcommand)]
        action: commands::ItemCommand,
    },

    /// Show tasks grouped by due date
    Todo,

    /// Search YouTube and manage saved videos
    Videos {
        #[command(subcommand)]
        action: commands::VideoCommand,
    },

    /// Serve the JSON API
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Show database statistics
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Human
    }
}

/// Print `data` as JSON. Only used in JSON mode.
pub fn emit_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

fn open_storage(config: &BrainpocketConfig) -> anyhow::Result<Storage> {
    let storage = Storage::new(StorageLocation::File(config.database.clone()))
        .with_seed_demo(config.seed_demo)
        .with_fetcher(Arc::new(config.youtube.oembed_client()));
    storage.initialize()?;
    Ok(storage)
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output = if cli.json { OutputMode::Json } else { OutputMode::Human };
    if let Err(e) = run(cli, output) {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli, output: OutputMode) -> anyhow::Result<()> {
    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(database) = cli.database {
        config.database = database;
    }
    tracing::debug!("Using database {:?}", config.database);

    match cli.command {
        Commands::Init { force, no_demo } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            config.seed_demo = !no_demo;
            config::write_config(&path, &config, force)?;
            let storage = open_storage(&config)?;
            commands::run_init(output, &path, &config, &storage)?;
        }

        Commands::Projects { action } => {
            let storage = open_storage(&config)?;
            commands::run_projects(output, &storage, action)?;
        }

        Commands::Items { action } => {
            let storage = open_storage(&config)?;
            commands::run_items(output, &storage, action)?;
        }

        Commands::Todo => {
            let storage = open_storage(&config)?;
            commands::run_todo(output, &storage)?;
        }

        Commands::Videos { action } => {
            let storage = open_storage(&config)?;
            commands::run_videos(output, &storage, &config, action)?;
        }

        Commands::Serve { port } => {
            let storage = Arc::new(
                Storage::new(StorageLocation::File(config.database.clone()))
                    .with_seed_demo(config.seed_demo)
                    .with_fetcher(Arc::new(config.youtube.oembed_client())),
            );
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(brainpocket::server::start_server(port, storage))?;
        }

        Commands::Stats => {
            let storage = open_storage(&config)?;
            commands::run_stats(output, &storage, &config)?;
        }
    }

    Ok(())
}
