//! Typed errors for the listing optimizer.
//!
//! Library code returns these; the binary wraps them with `anyhow`.

use std::path::PathBuf;

use thiserror::Error;

/// Run-level failures. Any of these aborts the whole batch.
#[derive(Debug, Error)]
pub enum OptimizerError {
    /// Input file missing, unreadable, or not a JSON array of listings
    #[error("failed to load listings from {path}: {source}")]
    InputLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Output could not be serialized or written
    #[error("failed to write listings to {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Per-record failures. The batch records these and keeps going.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Every identifier candidate collided with one already issued
    #[error("could not issue a unique job id after {attempts} attempts")]
    IdentifierExhausted { attempts: u32 },
}

/// Result type alias for run-level operations.
pub type Result<T> = std::result::Result<T, OptimizerError>;
