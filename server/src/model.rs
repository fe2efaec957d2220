//! Todo rows and request payloads.
//!
//! # Design
//! `Todo` is the row shape and the response shape at once: the JSON the API
//! returns is exactly what the `todos` table holds. Payloads are kept loose
//! (`Option` everywhere) so that a missing field reaches validation instead of
//! failing deserialization; `validate_text` and `TodoChanges::from_payload`
//! are the only ways to turn a payload into something the store accepts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type TodoId = i64;

/// Upper bound on `text`, matching the `VARCHAR(500)` column.
pub const MAX_TEXT_CHARS: usize = 500;

/// A single persisted todo item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateTodo {
    pub text: Option<String>,
}

/// Update payload. An explicit `null` is treated the same as an omitted key.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodo {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Todo text is required")]
    TextRequired,
    #[error("Todo text must be at most 500 characters")]
    TextTooLong,
    #[error("No fields to update")]
    NothingToUpdate,
}

/// Trim `raw` and check it is a storable todo text. A byte order mark counts
/// as surrounding whitespace.
pub fn validate_text(raw: &str) -> Result<String, ValidationError> {
    let text = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if text.is_empty() {
        return Err(ValidationError::TextRequired);
    }
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(ValidationError::TextTooLong);
    }
    Ok(text.to_string())
}

/// The set of columns an update writes. At least one field is always set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoChanges {
    text: Option<String>,
    completed: Option<bool>,
}

impl TodoChanges {
    pub fn from_payload(payload: UpdateTodo) -> Result<Self, ValidationError> {
        if payload.text.is_none() && payload.completed.is_none() {
            return Err(ValidationError::NothingToUpdate);
        }
        let text = payload.text.as_deref().map(validate_text).transpose()?;
        Ok(Self {
            text,
            completed: payload.completed,
        })
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn completed(&self) -> Option<bool> {
        self.completed
    }

    /// Apply the changes to `todo`, returning whether any value differs.
    pub fn apply(&self, todo: &mut Todo) -> bool {
        let mut changed = false;
        if let Some(text) = &self.text {
            if todo.text != *text {
                todo.text = text.clone();
                changed = true;
            }
        }
        if let Some(completed) = self.completed {
            if todo.completed != completed {
                todo.completed = completed;
                changed = true;
            }
        }
        changed
    }
}
