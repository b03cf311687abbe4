//! EDIT command - Update a note's title and/or body.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use notes_client::{NoteStore, NotesApi};
use notes_core::{Note, NoteId, NoteUpdate, has_note_changed};

use super::{HumanReadable, output, print_note};

/// Arguments for the edit command.
#[derive(Args)]
pub struct EditArgs {
    /// Note ID to edit
    pub id: String,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New body
    #[arg(long, short = 'b')]
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EditNoteResponse {
    pub changed: bool,
    pub note: Note,
}

impl HumanReadable for EditNoteResponse {
    fn print_human(&self) {
        if self.changed {
            println!("{}", "Note updated successfully!".green().bold());
        } else {
            println!("{}", "Nothing to change.".yellow());
        }
        println!();
        print_note(&self.note);
    }
}

/// Execute the edit command.
///
/// Goes through the note store so the local duplicate-title check and
/// no-op detection apply before anything is sent.
pub async fn execute(api: NotesApi, human: bool, args: EditArgs) -> Result<()> {
    let update = NoteUpdate {
        title: args.title,
        body: args.body,
    };
    if update.is_empty() {
        bail!("Pass --title and/or --body");
    }
    update.validate()?;

    let store = NoteStore::new(api);
    store.load().await;
    if let Some(error) = store.last_error() {
        bail!(error);
    }

    let id = NoteId::from(args.id);
    let before = store.find(&id);
    let note = store.edit(&id, update).await?;
    let changed = before.is_none_or(|b| has_note_changed(&b, &note));

    output(&EditNoteResponse { changed, note }, human)
}
