//! Rendering configuration.
//!
//! [`RenderConfig`] holds the layout settings for rendered errors. It
//! implements [`serde::Deserialize`] so applications can load it from their
//! own configuration files; every field has a default.
//!
//! # Example
//!
//! ```
//! # use rebound::config::RenderConfig;
//! let config = RenderConfig::default();
//! assert_eq!(config.column_width(), 79);
//! assert!(config.show_line_context());
//! ```

use serde::Deserialize;

use crate::render::{DEFAULT_COLUMN_WIDTH, DEFAULT_INDENT_INCREMENT};

/// Layout settings for rendering [`ParserError`](crate::ParserError)s.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum width of rendered lines, indentation included.
    column_width: usize,

    /// Indentation of the outermost error.
    initial_indent: String,

    /// Indentation added for each nested error.
    indent_increment: String,

    /// Whether the source line is shown under the position header.
    show_line_context: bool,
}

impl RenderConfig {
    /// Creates a [`RenderConfig`] that shows line context.
    ///
    /// # Arguments
    ///
    /// * `column_width` - Maximum width of rendered lines.
    /// * `initial_indent` - Indentation of the outermost error.
    /// * `indent_increment` - Indentation added per nesting level.
    pub fn new(
        column_width: usize,
        initial_indent: impl Into<String>,
        indent_increment: impl Into<String>,
    ) -> Self {
        Self {
            column_width,
            initial_indent: initial_indent.into(),
            indent_increment: indent_increment.into(),
            show_line_context: true,
        }
    }

    pub fn column_width(&self) -> usize {
        self.column_width
    }

    pub fn initial_indent(&self) -> &str {
        &self.initial_indent
    }

    pub fn indent_increment(&self) -> &str {
        &self.indent_increment
    }

    pub fn show_line_context(&self) -> bool {
        self.show_line_context
    }

    /// Returns a copy with a different column width.
    pub fn with_column_width(mut self, column_width: usize) -> Self {
        self.column_width = column_width;
        self
    }

    /// Returns a copy with line context switched on or off.
    pub fn with_line_context(mut self, show: bool) -> Self {
        self.show_line_context = show;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMN_WIDTH, "", DEFAULT_INDENT_INCREMENT)
    }
}
