//! LIST command - List all notes, newest first.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use notes_client::{NotesApi, NotesRemote};
use notes_core::Note;

use super::{HumanReadable, format_timestamp, output, truncate};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Show at most this many notes
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct NoteList(pub Vec<Note>);

impl HumanReadable for NoteList {
    fn print_human(&self) {
        println!("{}", "Notes".green().bold());
        println!("{}", "=".repeat(80));
        println!();

        if self.0.is_empty() {
            println!("  {}", "(No notes yet)".dimmed());
            return;
        }

        for note in &self.0 {
            println!("  {}", note.title.bold());
            println!("    {} {}", "ID:".cyan(), note.id);
            println!("    {} {}", "Created:".cyan(), format_timestamp(&note.created_at));
            let preview = note.body.lines().next().unwrap_or_default();
            println!("    {}", truncate(preview, 70).dimmed());
            println!();
        }

        println!("  {} {}", "Total:".cyan(), self.0.len());
    }
}

/// Execute the list command.
pub async fn execute(api: &NotesApi, human: bool, args: ListArgs) -> Result<()> {
    let mut notes = api.list_notes().await?;
    if let Some(limit) = args.limit {
        notes.truncate(limit);
    }

    output(&NoteList(notes), human)
}
