//! CLI frontend for the magic-rpg engine.

mod commands;
mod render;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "magic",
    about = "magic-rpg: a small text-adventure engine",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play in the terminal, one command per line
    Play {
        /// Snapshot to start from (default: the built-in starter world)
        #[arg(short, long)]
        world: Option<PathBuf>,

        /// Write a snapshot here when the session ends
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Entity to play as
        #[arg(long = "as", default_value = "hero")]
        player: String,

        /// Engine configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Simulated seconds per tick
        #[arg(long)]
        tick_seconds: Option<f64>,

        /// Only dispatch skills the player actually has
        #[arg(long)]
        strict: bool,

        /// Ticks to run after each command
        #[arg(long, default_value_t = 1)]
        ticks_per_command: u64,
    },

    /// Write the starter world to a snapshot file
    New {
        /// Where to write the snapshot
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Summarize the contents of a snapshot file
    Inspect {
        /// Snapshot file
        path: PathBuf,

        /// Show the full state of one entity
        #[arg(short, long)]
        entity: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            world,
            save,
            player,
            config,
            tick_seconds,
            strict,
            ticks_per_command,
        } => commands::play::run(commands::play::PlayOptions {
            world,
            save,
            player,
            config,
            tick_seconds,
            strict,
            ticks_per_command,
        }),
        Commands::New { path, force } => commands::new::run(&path, force),
        Commands::Inspect { path, entity } => commands::inspect::run(&path, entity.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
