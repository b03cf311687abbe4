//! CREATE command - Create a new note.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use notes_client::{NotesApi, NotesRemote};
use notes_core::{NewNote, validate_note};

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Title, unique across all notes (at most 100 characters)
    pub title: String,

    /// Body text
    pub body: String,
}

/// Execute the create command.
pub async fn execute(api: &NotesApi, human: bool, args: CreateArgs) -> Result<()> {
    validate_note(&args.title, &args.body)?;

    let note = api.create_note(&NewNote::new(args.title, args.body)).await?;

    if human {
        println!("{}", "Note created successfully!".green().bold());
        println!();
    }
    super::output(&note, human)
}
