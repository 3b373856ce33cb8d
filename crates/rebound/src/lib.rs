//! Error reporting core for backtracking parser combinators.
//!
//! This crate provides the pieces a combinator library needs to represent,
//! combine and render parse failures:
//!
//! - **Messages**: individual failure facts ([`ErrorMessage`])
//! - **Lists**: persistent, set-semantic collections of messages ([`ErrorMessageList`])
//! - **Merge algebra**: position-aware combination of lists ([`merge`](mod@merge) module)
//! - **Errors**: the final [`ParserError`] and its rendering ([`RenderOptions`])
//! - **Line context**: the source line with a caret ([`print_error_line`])
//! - **Loop guard**: the fatal abort for zero-progress repetition ([`loop_guard`] module)
//!
//! Failures are ordinary values. Only the loop guard aborts a parse.
//!
//! # Example
//!
//! ```
//! use rebound::{CharStream, ParserError, State, expected, merge_if_needed};
//!
//! let stream = CharStream::new("[1, ?]");
//! let here = State::new(stream.position_at(4));
//!
//! // Two alternatives failed at the same place: both are reported.
//! let errors = merge_if_needed(&here, &expected("integer"), &here, &expected("list"));
//! let error = ParserError::new(stream.position_at(4), errors);
//!
//! assert_eq!(
//!     error.to_string_with_stream(&stream),
//!     "Error in Ln: 1 Col: 5\n[1, ?]\n    ^\nExpecting: integer or list\n"
//! );
//! ```

pub mod config;
pub mod loop_guard;
pub mod merge;

mod message;
mod message_list;
mod parser_error;
mod position;
mod render;
mod stream;

pub use config::RenderConfig;
pub use loop_guard::{InfiniteLoop, check_progress, raise_infinite_loop};
pub use merge::{
    backtrack_wrap, compound_wrap, concat, merge, merge_if_needed, merge_if_needed3,
};
pub use message::{Comparable, ErrorMessage, Opaque, OtherValue, Payload};
pub use message_list::{
    ErrorMessageList, Iter, MessageSet, expected, message, other, other_opaque, unexpected,
};
pub use parser_error::ParserError;
pub use position::{ParserState, Position, State};
pub use render::{
    DEFAULT_COLUMN_WIDTH, DEFAULT_INDENT_INCREMENT, OtherPrinter, PositionPrinter,
    RenderOptions, line_context::print_error_line,
};
pub use stream::{CharStream, SourceStream};
