//! Rendering the source line around an error with a caret under the column.
//!
//! Every Unicode scalar value takes one display column. Tabs and other control
//! characters are shown as a single space so the caret line stays aligned.
//! Lines wider than the available width are cut to a window with `…` marking
//! the elided side(s); the window always contains the caret column.

use std::fmt;

use log::debug;

use crate::{
    render::line_wrapper::{display_width, write_wrapped},
    stream::SourceStream,
};

const ELLIPSIS: char = '…';

/// Writes the line of `stream` containing `index`, then a caret line.
///
/// Both lines start with `indentation`. `column_width` bounds the total width
/// including the indentation. A note is added when the error sits at the end
/// of the input, at the end of a line, or on an empty line.
///
/// # Example
///
/// ```
/// # use rebound::{CharStream, print_error_line};
/// let stream = CharStream::new("let x = ;\n");
/// let mut out = String::new();
/// print_error_line(&stream, 8, &mut out, "", 79).unwrap();
/// assert_eq!(out, "let x = ;\n        ^\n");
/// ```
pub fn print_error_line(
    stream: &dyn SourceStream,
    index: usize,
    out: &mut dyn fmt::Write,
    indentation: &str,
    column_width: usize,
) -> fmt::Result {
    let index = index.min(stream.len());
    let bounds = stream.line_bounds(index);
    let line = stream.slice(bounds.clone());

    let chars: Vec<char> = line
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let caret = line
        .char_indices()
        .take_while(|(offset, _)| bounds.start + offset < index)
        .count();

    debug!(index, line_start = bounds.start, caret; "Rendering line context");

    let available = column_width.saturating_sub(display_width(indentation));
    let window = Window::fit(chars.len(), caret, available);

    out.write_str(indentation)?;
    for column in window.start..window.end {
        let c = if window.elide_left && column == window.start {
            ELLIPSIS
        } else if window.elide_right && column + 1 == window.end {
            ELLIPSIS
        } else {
            chars[column]
        };
        out.write_char(c)?;
    }
    out.write_char('\n')?;

    out.write_str(indentation)?;
    for _ in window.start..caret {
        out.write_char(' ')?;
    }
    out.write_str("^\n")?;

    let note = if index == stream.len() {
        Some("Note: The error occurred at the end of the input stream.")
    } else if chars.is_empty() {
        Some("Note: The error occurred on an empty line.")
    } else if caret == chars.len() {
        Some("Note: The error occurred at the end of the line.")
    } else {
        None
    };
    if let Some(note) = note {
        write_wrapped(out, indentation, indentation, note, column_width)?;
    }
    Ok(())
}

/// The visible slice of a line, in display columns.
#[derive(Debug, PartialEq, Eq)]
struct Window {
    start: usize,
    end: usize,
    elide_left: bool,
    elide_right: bool,
}

impl Window {
    /// Picks the columns to show for a line of `len` columns with the caret
    /// at `caret` (which may equal `len`), given `available` columns.
    fn fit(len: usize, caret: usize, available: usize) -> Self {
        let available = available.max(1);
        let needed = len.max(caret + 1);

        if needed <= available {
            return Self {
                start: 0,
                end: len,
                elide_left: false,
                elide_right: false,
            };
        }

        // Too narrow to spend columns on ellipses.
        if available < 3 {
            let start = if caret < available { 0 } else { caret + 1 - available };
            return Self {
                start,
                end: len.min(start + available),
                elide_left: false,
                elide_right: false,
            };
        }

        // Keep the start of the line while the caret fits before the right
        // ellipsis; otherwise the caret goes in the last-but-one column, or
        // the last one when nothing follows it.
        let start = if caret + 1 < available {
            0
        } else {
            (caret + 2 - available).min(needed - available)
        };
        let end = len.min(start + available);
        Self {
            start,
            end,
            elide_left: start > 0,
            elide_right: len > start + available,
        }
    }
}
