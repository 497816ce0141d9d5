mod commands;
mod config;
mod script;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fnt", about = "Render, lint and replay floating note tree snapshots")]
struct Cli {
    /// JSON file with editor, render and layout settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a snapshot as a text outline
    Render {
        snapshot: PathBuf,
        /// Mark this node as selected
        #[arg(long)]
        select: Option<String>,
        /// Print card rectangles instead of the text outline
        #[arg(long)]
        geometry: bool,
    },
    /// Report data-integrity issues in a snapshot
    Lint {
        snapshot: PathBuf,
        /// Exit with an error when any warning is found
        #[arg(long)]
        strict: bool,
    },
    /// Name the node under a canvas point
    Hit { snapshot: PathBuf, x: f64, y: f64 },
    /// Run a scripted event session against an in-memory backend
    Replay {
        snapshot: PathBuf,
        script: PathBuf,
        /// Write the resulting snapshot here
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Render {
            snapshot,
            select,
            geometry,
        } => commands::render::run(&snapshot, select.as_deref(), geometry, &config),
        Command::Lint { snapshot, strict } => commands::lint::run(&snapshot, strict),
        Command::Hit { snapshot, x, y } => commands::render::run_hit(&snapshot, x, y, &config),
        Command::Replay {
            snapshot,
            script,
            out,
        } => commands::replay::run(&snapshot, &script, out.as_deref(), &config).await,
    }
}
