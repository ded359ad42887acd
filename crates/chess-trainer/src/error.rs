//! Trainer error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    /// The adapter could not parse a position string. Fatal for the call,
    /// harmless for the session.
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    /// No tactical position was found within the retry budget. Callers
    /// should fall back to a previously cached puzzle.
    #[error("Puzzle generation exhausted after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    /// Submission referenced a puzzle that is no longer cached
    #[error("Unknown puzzle: {0}")]
    UnknownPuzzle(String),

    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Persistence error: {0}")]
    Persistence(#[from] anyhow::Error),
}
