//! Error types for CONSO Core
//!
//! Findings about the tables themselves are not errors; they are recorded as
//! [`Diagnostic`](crate::diagnostics::Diagnostic)s. This type covers the
//! conditions that stop a run: unreadable files, undecodable rows, bad
//! configuration, and a fail-fast halt.

use std::path::PathBuf;

use thiserror::Error;

use crate::diagnostics::Diagnostic;

/// Result type alias using CONSO's Error
pub type Result<T> = std::result::Result<T, Error>;

/// CONSO error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode table: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid identifier pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Validation halted: {0}")]
    Halted(Box<Diagnostic>),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
