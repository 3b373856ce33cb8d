//! Error types for the Rebound CLI.

use std::io;

use thiserror::Error;

use rebound::{InfiniteLoop, ParserError};

use crate::config::ConfigError;

/// The main error type for CLI runs.
///
/// # Parse errors
///
/// The `Parse` variant carries the structured [`ParserError`] together with
/// its rendering, produced with the configured layout and line context.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{report}")]
    Parse { err: ParserError, report: String },

    #[error("Internal parser error: {0}")]
    InfiniteLoop(#[from] InfiniteLoop),
}

impl CliError {
    /// Create a new `Parse` error with its rendered report.
    pub fn new_parse_error(err: ParserError, report: impl Into<String>) -> Self {
        Self::Parse {
            err,
            report: report.into(),
        }
    }
}
