//! Error adapter for converting CliError to miette diagnostics.
//!
//! This module provides the bridge between the CLI's error type and miette's
//! rich diagnostic formatting. Parse errors are not routed through miette:
//! they already carry their own rendering with source line and caret.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use crate::error::CliError;

/// Adapter for reporting a [`CliError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CliError::Io(_) => "rebound::io",
            CliError::Config(_) => "rebound::config",
            CliError::Parse { .. } => "rebound::parse",
            CliError::InfiniteLoop(_) => "rebound::infinite_loop",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self.0 {
            CliError::Config(_) => Some(Box::new(
                "check the file passed with --config or rebound/config.toml",
            )),
            CliError::InfiniteLoop(_) => Some(Box::new(
                "a repeated parser accepted empty input; this is a bug in the grammar",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
