//! Command-line interface for the notes service.
//!
//! Commands:
//! - list: List notes, newest first
//! - show: Print one note
//! - create: Create a note
//! - edit: Change a note's title and/or body
//! - delete: Delete a note
//! - write: Stream stdin into a note with debounced auto-save
//!
//! Configuration via environment:
//! - NOTES_API_URL: Server root (default: http://localhost:5000)
//! - NOTES_API_TIMEOUT_SECS: Request timeout in seconds (default: 10)
//! - NOTES_LOG: Log filter for stderr diagnostics (default: warn)

mod commands;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    ConsoleNotifier, create::CreateArgs, delete::DeleteArgs, edit::EditArgs, list::ListArgs,
    show::ShowArgs, write::WriteArgs,
};
use notes_client::{ClientConfig, NotesApi};

/// Notes CLI
///
/// Manage notes from the command line. JSON output by default,
/// --human for formatted output.
#[derive(Parser)]
#[command(name = "notes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output human-readable formatted text instead of JSON
    #[arg(long, global = true)]
    human: bool,

    /// Notes server URL
    #[arg(long, env = "NOTES_API_URL", global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List notes, newest first
    List(ListArgs),

    /// Show one note
    Show(ShowArgs),

    /// Create a new note
    Create(CreateArgs),

    /// Edit a note's title and/or body
    Edit(EditArgs),

    /// Delete a note
    Delete(DeleteArgs),

    /// Write stdin into a note's body, auto-saving as it goes
    Write(WriteArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    let notifier = Arc::new(ConsoleNotifier::new(cli.human));
    let api = match build_api(cli.url, Arc::clone(&notifier)) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::List(args) => commands::list::execute(&api, cli.human, args).await,
        Commands::Show(args) => commands::show::execute(&api, cli.human, args).await,
        Commands::Create(args) => commands::create::execute(&api, cli.human, args).await,
        Commands::Edit(args) => commands::edit::execute(api, cli.human, args).await,
        Commands::Delete(args) => commands::delete::execute(&api, cli.human, args).await,
        Commands::Write(args) => commands::write::execute(api, cli.human, args).await,
    };

    if let Err(e) = result {
        if !notifier.has_reported() {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn build_api(url: Option<String>, notifier: Arc<ConsoleNotifier>) -> anyhow::Result<NotesApi> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = url {
        config.base_url = url;
    }
    tracing::debug!(base_url = %config.base_url, "Client configured");

    Ok(NotesApi::new(config)?.with_notifier(notifier))
}

/// Diagnostics go to stderr so stdout stays parseable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("NOTES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
