//! Human-readable rendering of parser errors.
//!
//! Rendering goes through [`RenderOptions`], which controls:
//! - the position header (a caller-supplied printer or `Error in <position>`)
//! - the column width used for wrapping and line context
//! - the initial indentation and the increment applied per nesting level
//! - the source stream used for the line context of the outer error
//! - an optional printer for application-defined `OtherError` payloads
//!
//! Messages are grouped by kind. `Expected` and `Unexpected` labels are joined
//! into one clause each (`a, b or c`), in canonical order. Compound and
//! backtrack entries are rendered recursively one indentation level deeper.

pub(crate) mod line_context;
pub(crate) mod line_wrapper;

use std::fmt;

use crate::{
    config::RenderConfig,
    message::{ErrorMessage, OtherValue},
    message_list::ErrorMessageList,
    position::Position,
    stream::SourceStream,
};

use line_wrapper::{write_clause, write_wrapped};

/// Writes a position header: `(out, position, indentation, column_width)`.
pub type PositionPrinter<'a> =
    dyn Fn(&mut dyn fmt::Write, &Position, &str, usize) -> fmt::Result + 'a;

/// Writes an `OtherError` payload: `(out, value, indentation, column_width)`.
pub type OtherPrinter<'a> =
    dyn Fn(&mut dyn fmt::Write, &OtherValue, &str, usize) -> fmt::Result + 'a;

/// Default width of rendered output.
pub const DEFAULT_COLUMN_WIDTH: usize = 79;

/// Default indentation added per nesting level.
pub const DEFAULT_INDENT_INCREMENT: &str = "  ";

/// Options controlling how a [`ParserError`](crate::ParserError) is rendered.
pub struct RenderOptions<'a> {
    position_printer: Option<Box<PositionPrinter<'a>>>,
    other_printer: Option<Box<OtherPrinter<'a>>>,
    column_width: usize,
    initial_indent: String,
    indent_increment: String,
    stream: Option<&'a dyn SourceStream>,
}

impl<'a> RenderOptions<'a> {
    pub fn new() -> Self {
        Self {
            position_printer: None,
            other_printer: None,
            column_width: DEFAULT_COLUMN_WIDTH,
            initial_indent: String::new(),
            indent_increment: DEFAULT_INDENT_INCREMENT.to_string(),
            stream: None,
        }
    }

    /// Options taking width and indentation from `config`.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new()
            .column_width(config.column_width())
            .initial_indent(config.initial_indent())
            .indent_increment(config.indent_increment())
    }

    /// Replaces the default `Error in <position>` header.
    pub fn position_printer(
        mut self,
        printer: impl Fn(&mut dyn fmt::Write, &Position, &str, usize) -> fmt::Result + 'a,
    ) -> Self {
        self.position_printer = Some(Box::new(printer));
        self
    }

    /// Enables rendering of `OtherError` payloads.
    pub fn other_printer(
        mut self,
        printer: impl Fn(&mut dyn fmt::Write, &OtherValue, &str, usize) -> fmt::Result + 'a,
    ) -> Self {
        self.other_printer = Some(Box::new(printer));
        self
    }

    pub fn column_width(mut self, column_width: usize) -> Self {
        self.column_width = column_width;
        self
    }

    pub fn initial_indent(mut self, indent: impl Into<String>) -> Self {
        self.initial_indent = indent.into();
        self
    }

    pub fn indent_increment(mut self, increment: impl Into<String>) -> Self {
        self.indent_increment = increment.into();
        self
    }

    /// Renders the source line of the outer error from `stream`.
    pub fn stream(mut self, stream: &'a dyn SourceStream) -> Self {
        self.stream = Some(stream);
        self
    }
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RenderOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("position_printer", &self.position_printer.is_some())
            .field("other_printer", &self.other_printer.is_some())
            .field("column_width", &self.column_width)
            .field("initial_indent", &self.initial_indent)
            .field("indent_increment", &self.indent_increment)
            .field("stream", &self.stream.is_some())
            .finish()
    }
}

/// Writes the full report for an error at `position`.
pub(crate) fn write_error(
    out: &mut dyn fmt::Write,
    position: &Position,
    errors: &ErrorMessageList,
    options: &RenderOptions<'_>,
) -> fmt::Result {
    let indent = options.initial_indent.as_str();
    write_position(out, position, indent, options)?;
    if let Some(stream) = options.stream {
        let index = position.index();
        line_context::print_error_line(stream, index, out, indent, options.column_width)?;
    }
    write_messages(out, errors, indent, options)
}

fn write_position(
    out: &mut dyn fmt::Write,
    position: &Position,
    indent: &str,
    options: &RenderOptions<'_>,
) -> fmt::Result {
    match &options.position_printer {
        Some(printer) => printer(out, position, indent, options.column_width),
        None => {
            let continuation = format!("{indent}{}", options.indent_increment);
            let header = format!("Error in {position}");
            write_wrapped(out, indent, &continuation, &header, options.column_width)
        }
    }
}

/// Entries of an error list, grouped by how they are rendered.
///
/// Everything except `others` comes from the canonical set. `others` also
/// keeps incomparable payloads, which the set leaves out, once per value.
#[derive(Default)]
struct Groups<'m> {
    expected: Vec<&'m str>,
    unexpected: Vec<&'m str>,
    messages: Vec<&'m str>,
    nested: Vec<&'m ErrorMessage>,
    others: Vec<&'m OtherValue>,
}

impl<'m> Groups<'m> {
    fn partition(set: &'m [ErrorMessage], errors: &'m ErrorMessageList) -> Self {
        let mut groups = Self::default();
        for message in set {
            match message {
                ErrorMessage::Expected(label) => groups.expected.push(label),
                ErrorMessage::Unexpected(label) => groups.unexpected.push(label),
                ErrorMessage::Message(text) => groups.messages.push(text),
                ErrorMessage::CompoundError { .. } | ErrorMessage::BacktrackPoint { .. } => {
                    groups.nested.push(message)
                }
                ErrorMessage::OtherError(value) => groups.others.push(value),
            }
        }
        for message in errors {
            if let ErrorMessage::OtherError(value) = message {
                if !value.is_comparable() && !groups.others.contains(&value) {
                    groups.others.push(value);
                }
            }
        }
        groups
    }
}

fn write_messages(
    out: &mut dyn fmt::Write,
    errors: &ErrorMessageList,
    indent: &str,
    options: &RenderOptions<'_>,
) -> fmt::Result {
    let set = errors.to_set();
    let groups = Groups::partition(set.as_slice(), errors);
    let width = options.column_width;
    let nested_indent = format!("{indent}{}", options.indent_increment);
    let mut wrote_any = false;

    if !groups.expected.is_empty() {
        write_clause(out, indent, &nested_indent, "Expecting:", &groups.expected, width)?;
        wrote_any = true;
    }
    if !groups.unexpected.is_empty() {
        write_clause(out, indent, &nested_indent, "Unexpected:", &groups.unexpected, width)?;
        wrote_any = true;
    }
    if !groups.messages.is_empty() {
        let message_indent = if wrote_any {
            write_wrapped(out, indent, &nested_indent, "Other error messages:", width)?;
            nested_indent.clone()
        } else {
            indent.to_string()
        };
        let continuation = format!("{message_indent}{}", options.indent_increment);
        for text in &groups.messages {
            write_wrapped(out, &message_indent, &continuation, text, width)?;
        }
        wrote_any = true;
    }
    if let Some(printer) = &options.other_printer {
        for value in &groups.others {
            printer(&mut *out, value, indent, width)?;
            wrote_any = true;
        }
    }
    for message in &groups.nested {
        let (origin, inner) = match message {
            ErrorMessage::CompoundError {
                label,
                origin,
                inner,
            } => {
                let heading = format!("{label} could not be parsed because:");
                write_wrapped(out, indent, &nested_indent, &heading, width)?;
                (origin, inner)
            }
            ErrorMessage::BacktrackPoint { origin, inner } => {
                let heading = "The parser backtracked after:";
                write_wrapped(out, indent, &nested_indent, heading, width)?;
                (origin, inner)
            }
            _ => continue,
        };
        write_position(out, origin, &nested_indent, options)?;
        write_messages(out, inner, &nested_indent, options)?;
        wrote_any = true;
    }

    if !wrote_any {
        write_wrapped(out, indent, &nested_indent, "Unknown error(s)", width)?;
    }
    Ok(())
}
