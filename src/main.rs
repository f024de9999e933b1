//! Buildboard CLI - replay harness for dashboard payload logs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::warn;

use buildboard::{
    FileStatsSource, FixSuggestion, IpcMessage, LogNotifier, RelayError, SharedData, UiPlugin,
};

#[derive(Parser)]
#[command(name = "buildboard")]
#[command(about = "Buildboard - dashboard event relay for build-tool UI integration")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a log of newline-delimited JSON IPC messages through the relay
    Replay {
        /// Path to the message log
        file: PathBuf,

        /// Project root containing node_modules (default: current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// List the built-in task descriptors
    Tasks,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay { file, root } => replay(&file, root).await,
        Commands::Tasks => list_tasks(),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("{} {}", "Hint:".yellow().bold(), suggestion);
        }
        std::process::exit(1);
    }
}

fn new_plugin(root: Option<PathBuf>) -> Result<UiPlugin, RelayError> {
    let stats = match root {
        Some(root) => FileStatsSource::new(root),
        None => FileStatsSource::from_cwd()?,
    };
    UiPlugin::new(SharedData::new(), Arc::new(stats), Arc::new(LogNotifier))
}

async fn replay(file: &Path, root: Option<PathBuf>) -> Result<(), RelayError> {
    let plugin = new_plugin(root)?;
    plugin.on_project_open();
    plugin.relay().attach();

    let log = tokio::fs::read_to_string(file).await?;
    let mut applied = 0usize;
    for line in log.lines().filter(|l| !l.trim().is_empty()) {
        let message: IpcMessage = serde_json::from_str(line)?;
        match plugin.handle_ipc(&message).await {
            Ok(()) => applied += 1,
            // Keep replaying; a missing stats file only aborts that message.
            Err(e) => warn!(error = %e, "message skipped"),
        }
    }

    println!(
        "{} {} message(s) applied",
        "Replayed".green().bold(),
        applied
    );
    for (key, value) in plugin.store().snapshot() {
        println!("  {} = {}", key.cyan(), value);
    }
    Ok(())
}

fn list_tasks() -> Result<(), RelayError> {
    let plugin = new_plugin(Some(PathBuf::from(".")))?;
    for task in plugin.tasks() {
        println!("{}", task.description.bold());
        println!("  match: {}", task.pattern().cyan());
        for prompt in &task.prompts {
            println!(
                "  prompt: {} ({:?}, default {})",
                prompt.name,
                prompt.kind,
                prompt.default
            );
        }
    }
    Ok(())
}
