//! Source positions and the parser state seen by the merge algebra.
//!
//! A [`Position`] identifies a point in the input by byte offset, 1-based
//! line and 1-based column, optionally tagged with the name of the source it
//! belongs to. The merge rules only ever look at the position carried by a
//! state, which is what the [`ParserState`] trait exposes.

use std::{cmp::Ordering, fmt, rc::Rc};

/// A location in a source stream.
///
/// Positions are totally ordered by `(stream_name, index, line, column)`.
/// Cloning is cheap: the stream name is reference counted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    stream_name: Option<Rc<str>>,
    index: usize,
    line: usize,
    column: usize,
}

impl Position {
    /// Creates a position without a stream name.
    ///
    /// # Arguments
    ///
    /// * `index` - Byte offset from the start of the input.
    /// * `line` - 1-based line number.
    /// * `column` - 1-based column, counted in Unicode scalar values.
    pub fn new(index: usize, line: usize, column: usize) -> Self {
        Self {
            stream_name: None,
            index,
            line,
            column,
        }
    }

    /// The position of the first character of an unnamed input.
    pub fn start() -> Self {
        Self::new(0, 1, 1)
    }

    /// Returns a copy of this position tagged with `name`.
    pub fn with_stream_name(mut self, name: impl Into<Rc<str>>) -> Self {
        self.stream_name = Some(name.into());
        self
    }

    pub fn stream_name(&self) -> Option<&str> {
        self.stream_name.as_deref()
    }

    /// Byte offset from the start of the input.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// The position just after `c`, assuming `c` starts at this position.
    ///
    /// A `\n` moves to the first column of the next line.
    pub fn advance(&self, c: char) -> Self {
        let (line, column) = if c == '\n' {
            (self.line + 1, 1)
        } else {
            (self.line, self.column + 1)
        };
        Self {
            stream_name: self.stream_name.clone(),
            index: self.index + c.len_utf8(),
            line,
            column,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.stream_name
            .cmp(&other.stream_name)
            .then(self.index.cmp(&other.index))
            .then(self.line.cmp(&other.line))
            .then(self.column.cmp(&other.column))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.stream_name {
            write!(f, "{name}: ")?;
        }
        write!(f, "Ln: {} Col: {}", self.line, self.column)
    }
}

/// Anything that carries the current parse [`Position`].
///
/// The merge algebra compares states only through this trait, so a
/// combinator library is free to carry user state alongside the position.
pub trait ParserState {
    fn position(&self) -> &Position;
}

impl ParserState for Position {
    fn position(&self) -> &Position {
        self
    }
}

impl<S: ParserState + ?Sized> ParserState for &S {
    fn position(&self) -> &Position {
        (**self).position()
    }
}

/// A minimal parser state: a position plus a caller-defined payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State<U = ()> {
    position: Position,
    user: U,
}

impl State<()> {
    /// Creates a state at `position` with no user payload.
    pub fn new(position: Position) -> Self {
        Self { position, user: () }
    }
}

impl<U> State<U> {
    pub fn with_user_state(position: Position, user: U) -> Self {
        Self { position, user }
    }

    pub fn user_state(&self) -> &U {
        &self.user
    }

    /// Returns this state moved to `position`, keeping the user payload.
    pub fn advance_to(self, position: Position) -> Self {
        Self {
            position,
            user: self.user,
        }
    }
}

impl<U> ParserState for State<U> {
    fn position(&self) -> &Position {
        &self.position
    }
}
