//! Validation rules for note fields.

use thiserror::Error;

use crate::types::NoteUpdate;

/// Maximum title length, in characters.
pub const MAX_TITLE_LENGTH: usize = 100;

/// A note field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title required")]
    TitleRequired,

    #[error("body required")]
    BodyRequired,

    #[error("title too long")]
    TitleTooLong,
}

/// Check a candidate title/body pair.
///
/// Blank means empty or whitespace-only. Checks run in a fixed order: blank
/// title, blank body, then title length.
pub fn validate_note(title: &str, body: &str) -> Result<(), ValidationError> {
    check_title_present(title)?;
    check_body(body)?;
    check_title_length(title)
}

fn check_title_present(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    Ok(())
}

fn check_title_length(title: &str) -> Result<(), ValidationError> {
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

fn check_body(body: &str) -> Result<(), ValidationError> {
    if body.trim().is_empty() {
        return Err(ValidationError::BodyRequired);
    }
    Ok(())
}

impl NoteUpdate {
    /// Apply the same rules as [`validate_note`] to the fields that are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            check_title_present(title)?;
        }
        if let Some(body) = &self.body {
            check_body(body)?;
        }
        match &self.title {
            Some(title) => check_title_length(title),
            None => Ok(()),
        }
    }
}
