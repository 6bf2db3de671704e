//! Command-line interface for devboard
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::api::HttpClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputOptions;

mod activity;
mod board;
mod init;
mod task;

/// devboard - task board and activity heatmap client
///
/// Drives the developer network's task board (drag reordering with
/// backend reconciliation) and renders activity heatmaps.
#[derive(Parser, Debug)]
#[command(name = "devboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to ./.devboard.toml)
    #[arg(long, global = true, env = "DEVBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overrides api.base_url
    #[arg(long, global = true, env = "DEVBOARD_API")]
    pub api: Option<String>,

    /// Bearer token for the backend
    #[arg(long, global = true, env = "DEVBOARD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default .devboard.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Task board views and drag moves
    #[command(subcommand)]
    Board(BoardCommands),

    /// Create and delete tasks
    #[command(subcommand)]
    Task(TaskCommands),

    /// Render an activity heatmap
    Activity {
        /// User handle to fetch activity for
        user: Option<String>,

        /// Read records from a JSON file instead of the backend
        #[arg(long)]
        input: Option<PathBuf>,

        /// Last day of the window (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Use the compact rolling window
        #[arg(long, conflicts_with = "width")]
        compact: bool,

        /// Viewport width in pixels; picks the window like the web client
        #[arg(long)]
        width: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// Show every column and its tasks
    Show,

    /// Drag a task onto a task or column and sync the result
    Move {
        /// Task being dragged
        active: String,

        /// Task or column it is dropped on
        over: String,

        /// Drop below the target task instead of above it
        #[arg(long)]
        below: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task at the end of a column
    New {
        /// Task title
        title: String,

        /// Column id (defaults to the first column)
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: String,
    },
}

/// Everything a command needs once flags and config are merged.
pub(crate) struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    pub output: OutputOptions,
    token: Option<String>,
}

impl Context {
    pub fn client(&self) -> Result<HttpClient> {
        HttpClient::new(&self.config.api, self.token.clone())
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let context = self.context()?;
        match self.command {
            Commands::Init { force } => init::run(&context, force),
            Commands::Board(BoardCommands::Show) => block_on(board::run_show(&context)),
            Commands::Board(BoardCommands::Move { active, over, below }) => {
                block_on(board::run_move(&context, board::MoveOptions { active, over, below }))
            }
            Commands::Task(TaskCommands::New { title, status }) => {
                block_on(task::run_new(&context, &title, status.as_deref()))
            }
            Commands::Task(TaskCommands::Rm { id }) => block_on(task::run_rm(&context, &id)),
            Commands::Activity {
                user,
                input,
                date,
                compact,
                width,
            } => block_on(activity::run(
                &context,
                activity::ActivityOptions {
                    user,
                    input,
                    date,
                    compact,
                    width,
                },
            )),
        }
    }

    fn context(&self) -> Result<Context> {
        let config_path = match &self.config {
            Some(path) => path.clone(),
            None => Config::default_path(&std::env::current_dir()?),
        };
        let mut config = if config_path.exists() {
            Config::load(&config_path)?
        } else if self.config.is_some() {
            return Err(Error::InvalidArgument(format!(
                "config file not found: {}",
                config_path.display()
            )));
        } else {
            Config::default()
        };

        if let Some(api) = &self.api {
            config.api.base_url = api.trim().to_string();
            config.validate()?;
        }

        Ok(Context {
            config,
            config_path,
            output: OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
            token: self.token.clone(),
        })
    }
}

/// Board work is single-threaded, so a current-thread runtime is enough.
fn block_on<F>(future: F) -> Result<()>
where
    F: std::future::Future<Output = Result<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(future)
}
