//! Error type for rehab-common
//!
//! Repository lookups by id fail with [`Error::NotFound`] and writes that
//! point at a missing exercise fail with [`Error::UnknownExercise`], so the
//! HTTP layer maps errors to statuses without inspecting `Option`s.

use thiserror::Error;
use uuid::Uuid;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bootstrap TOML could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// No row with this id
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    /// A session refers to an exercise that does not exist
    #[error("Exercise {0} does not exist")]
    UnknownExercise(Uuid),

    /// Field value outside its allowed range or vocabulary
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A stored column holds a value that no longer decodes
    #[error("Corrupt value in {column}: '{value}' ({reason})")]
    CorruptValue {
        column: String,
        value: String,
        reason: String,
    },
}

impl Error {
    pub fn exercise_not_found(id: Uuid) -> Self {
        Error::NotFound {
            kind: "Exercise",
            id,
        }
    }

    pub fn session_not_found(id: Uuid) -> Self {
        Error::NotFound {
            kind: "Session",
            id,
        }
    }

    pub fn corrupt(column: &str, value: &str, reason: impl std::fmt::Display) -> Self {
        Error::CorruptValue {
            column: column.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
