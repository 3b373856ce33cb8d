//! Random access to the text an error was reported against.
//!
//! Rendering only needs to find the line around a failure offset and read it
//! back, which is what [`SourceStream`] provides. [`CharStream`] implements it
//! for in-memory text.

use std::{ops::Range, rc::Rc};

use crate::position::Position;

/// Text source that can be queried around a byte offset.
pub trait SourceStream {
    /// Length of the input in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte range of the line containing `index`, without its line terminator.
    ///
    /// An `index` past the end is clamped to the end of the input. An `index`
    /// pointing at a line terminator belongs to the line it terminates.
    fn line_bounds(&self, index: usize) -> Range<usize>;

    /// Text in `range`. The range must lie on character boundaries.
    fn slice(&self, range: Range<usize>) -> &str;
}

/// A [`SourceStream`] over a borrowed string.
#[derive(Debug, Clone)]
pub struct CharStream<'src> {
    text: &'src str,
    name: Option<Rc<str>>,
}

impl<'src> CharStream<'src> {
    pub fn new(text: &'src str) -> Self {
        Self { text, name: None }
    }

    /// Creates a stream whose positions carry `name`.
    pub fn with_name(text: &'src str, name: impl Into<Rc<str>>) -> Self {
        Self {
            text,
            name: Some(name.into()),
        }
    }

    pub fn text(&self) -> &'src str {
        self.text
    }

    /// Computes the [`Position`] of the byte offset `index`.
    ///
    /// Lines are separated by `\n`; columns count Unicode scalar values, so a
    /// multi-byte character advances the column by one.
    pub fn position_at(&self, index: usize) -> Position {
        let index = floor_char_boundary(self.text, index);
        let before = &self.text[..index];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;

        let position = Position::new(index, line, column);
        match &self.name {
            Some(name) => position.with_stream_name(Rc::clone(name)),
            None => position,
        }
    }
}

impl SourceStream for CharStream<'_> {
    fn len(&self) -> usize {
        self.text.len()
    }

    fn line_bounds(&self, index: usize) -> Range<usize> {
        let index = floor_char_boundary(self.text, index);
        let start = self.text[..index].rfind('\n').map_or(0, |i| i + 1);
        let mut end = self.text[index..]
            .find('\n')
            .map_or(self.text.len(), |i| index + i);
        if end > start && self.text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        start..end
    }

    fn slice(&self, range: Range<usize>) -> &str {
        &self.text[range]
    }
}

/// Largest character boundary not greater than `index`, clamped to the text.
fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
