//! Command implementations for the notes CLI.
//!
//! Each command module provides:
//! - Args struct for clap argument parsing
//! - execute() function that performs the command
//! - Human-readable and JSON output formatting

pub mod create;
pub mod delete;
pub mod edit;
pub mod list;
pub mod show;
pub mod write;

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;

use notes_client::Notifier;
use notes_core::Note;

/// Print output in JSON or human-readable format.
pub fn output<T: Serialize + HumanReadable>(value: &T, human: bool) -> Result<()> {
    if human {
        value.print_human();
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

/// Trait for types that can be printed in human-readable format.
pub trait HumanReadable {
    fn print_human(&self);
}

impl HumanReadable for Note {
    fn print_human(&self) {
        print_note(self);
    }
}

/// Print one note with all of its fields.
pub fn print_note(note: &Note) {
    println!("  {} {}", "Title:".cyan(), note.title.bold());
    println!("  {} {}", "ID:".cyan(), note.id);
    println!("  {} {}", "Created:".cyan(), format_timestamp(&note.created_at));
    if note.updated_at != note.created_at {
        println!("  {} {}", "Updated:".cyan(), format_timestamp(&note.updated_at));
    }
    println!();
    for line in note.body.lines() {
        println!("    {}", line);
    }
}

/// Format a timestamp for human display, e.g. `Jan 5, 2024, 03:07 PM`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Truncate a string for display, adding ellipsis if needed.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Notifier that prints to stderr, coloured in human mode and plain
/// otherwise, so stdout stays parseable.
///
/// Remembers whether an error was shown so `main` does not repeat it.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    human: bool,
    reported: AtomicBool,
}

impl ConsoleNotifier {
    pub fn new(human: bool) -> Self {
        Self {
            human,
            reported: AtomicBool::new(false),
        }
    }

    /// Whether an error has already been printed.
    pub fn has_reported(&self) -> bool {
        self.reported.load(Ordering::Relaxed)
    }

    fn success_line(&self, message: &str) -> String {
        if self.human {
            message.green().to_string()
        } else {
            message.to_string()
        }
    }

    fn error_line(&self, message: &str) -> String {
        if self.human {
            format!("{} {}", "Error:".red().bold(), message)
        } else {
            format!("Error: {}", message)
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        eprintln!("{}", self.success_line(message));
    }

    fn error(&self, message: &str) {
        eprintln!("{}", self.error_line(message));
        self.reported.store(true, Ordering::Relaxed);
    }
}
