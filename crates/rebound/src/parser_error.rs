//! The final error of a failed parse.
//!
//! A [`ParserError`] pairs the position where parsing gave up with the
//! accumulated [`ErrorMessageList`]. It is built once and only rendered
//! afterwards.

use std::{fmt, io};

use log::debug;

use crate::{
    message_list::ErrorMessageList,
    position::Position,
    render::{self, RenderOptions},
    stream::SourceStream,
};

/// An immutable parse failure, ready for rendering.
///
/// `Display` renders without source line context; use
/// [`ParserError::to_string_with_stream`] or [`ParserError::write_to`] with a
/// stream to include it.
///
/// # Example
///
/// ```
/// # use rebound::{CharStream, ParserError, expected, merge};
/// let stream = CharStream::new("[1, x]");
/// let errors = merge(&expected("digit"), &expected("letter"));
/// let error = ParserError::new(stream.position_at(4), errors);
///
/// assert_eq!(
///     error.to_string(),
///     "Error in Ln: 1 Col: 5\nExpecting: digit or letter\n"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParserError {
    position: Position,
    errors: ErrorMessageList,
}

impl ParserError {
    pub fn new(position: Position, errors: ErrorMessageList) -> Self {
        debug!(position:%, entries = errors.len(); "Parser error created");
        Self { position, errors }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn errors(&self) -> &ErrorMessageList {
        &self.errors
    }

    pub fn into_parts(self) -> (Position, ErrorMessageList) {
        (self.position, self.errors)
    }

    /// Renders the error with the source line taken from `stream`.
    pub fn to_string_with_stream(&self, stream: &dyn SourceStream) -> String {
        let mut out = String::new();
        self.write_fmt_to(&mut out, &RenderOptions::new().stream(stream))
            .expect("Writing to String buffer is infallible");
        out
    }

    /// Renders into a [`fmt::Write`] sink.
    pub fn write_fmt_to(
        &self,
        out: &mut dyn fmt::Write,
        options: &RenderOptions<'_>,
    ) -> fmt::Result {
        render::write_error(out, &self.position, &self.errors, options)
    }

    /// Streams the rendered error into `out` without building a string first.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error reported by `out`.
    pub fn write_to<W: io::Write>(&self, out: W, options: &RenderOptions<'_>) -> io::Result<()> {
        let mut adapter = IoAdapter {
            inner: out,
            error: None,
        };
        match self.write_fmt_to(&mut adapter, options) {
            Ok(()) => Ok(()),
            Err(fmt::Error) => Err(adapter
                .error
                .unwrap_or_else(|| io::Error::other("formatter error"))),
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_fmt_to(f, &RenderOptions::new())
    }
}

impl std::error::Error for ParserError {}

/// Forwards formatted text to an [`io::Write`], keeping the I/O error.
struct IoAdapter<W> {
    inner: W,
    error: Option<io::Error>,
}

impl<W: io::Write> fmt::Write for IoAdapter<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.inner.write_all(s.as_bytes()).map_err(|err| {
            self.error = Some(err);
            fmt::Error
        })
    }
}
