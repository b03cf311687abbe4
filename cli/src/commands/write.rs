//! WRITE command - Stream stdin into a note's body with auto-save.
//!
//! Every line read updates the body; saves trail behind by `--delay`
//! milliseconds. End of input flushes the last pending save.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use notes_client::{AutoSave, NotesApi, NotesRemote};
use notes_core::{NoteId, NoteUpdate};

use super::output;

/// Arguments for the write command.
#[derive(Args)]
pub struct WriteArgs {
    /// Note ID to write into
    pub id: String,

    /// Quiet period before a save, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub delay: u64,

    /// Append to the existing body instead of replacing it
    #[arg(long, short = 'a')]
    pub append: bool,
}

/// Execute the write command.
pub async fn execute(api: NotesApi, human: bool, args: WriteArgs) -> Result<()> {
    let api = Arc::new(api);
    let id = NoteId::from(args.id);
    let note = api.get_note(&id).await?;

    let auto = AutoSave::new(note.body.clone(), Duration::from_millis(args.delay), {
        let api = Arc::clone(&api);
        let id = id.clone();
        move |body| {
            let api = Arc::clone(&api);
            let id = id.clone();
            async move { api.update_note(&id, &NoteUpdate::body(body)).await.map(|_| ()) }
        }
    });

    let mut body = if args.append { note.body } else { String::new() };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(&line);

        // An empty body would be rejected; wait for real content.
        if !body.trim().is_empty() {
            auto.set_value(body.clone());
        }
    }

    auto.flush().await;
    if let Some(err) = auto.error() {
        bail!(err);
    }
    tracing::debug!(note_id = %id, "Write finished");

    let saved = api.get_note(&id).await?;
    if human {
        println!("{}", "Note saved.".green().bold());
        println!();
    }
    output(&saved, human)
}
