//! SHOW command - Print one note.

use anyhow::Result;
use clap::Args;

use notes_client::{NotesApi, NotesRemote};
use notes_core::NoteId;

use super::output;

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Note ID
    pub id: String,
}

/// Execute the show command.
pub async fn execute(api: &NotesApi, human: bool, args: ShowArgs) -> Result<()> {
    let note = api.get_note(&NoteId::from(args.id)).await?;
    output(&note, human)
}
