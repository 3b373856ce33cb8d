//! Grammar of the bracketed-list notation checked by the CLI.
//!
//! ```text
//! document := ws list ws EOF
//! list     := '[' ws (item ws (',' ws item ws)*)? ']'
//! item     := integer | string | nil | true | false | list
//! ```
//!
//! Keywords must not be followed by a letter or digit, integers must fit in
//! an `i64`, and lists nest at most [`MAX_NESTING`] levels deep.

use std::fmt;

use rebound::{ParserState, message};

use crate::combinator::{
    Parser, Reply, between, choice, eof, lazy, literal, many, not_followed_by, optional,
    satisfy, sep_by, whitespace,
};

/// Deepest list nesting accepted by [`document`].
pub const MAX_NESTING: usize = 64;

/// A parsed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Str(String),
    Bool(bool),
    Nil,
    List(Vec<Value>),
}

impl Value {
    /// Number of items in this value, nested lists included.
    pub fn count_items(&self) -> usize {
        match self {
            Value::List(items) => items.iter().map(|item| 1 + item.count_items()).sum(),
            _ => 0,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "\"{s}\""),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Nil => write!(f, "nil"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// The whole input: one list surrounded by optional whitespace.
pub fn document() -> Parser<Value> {
    whitespace()
        .skip_left(list(1))
        .skip(whitespace())
        .skip(eof())
}

/// A list at nesting level `depth`, counting the outermost list as 1.
fn list(depth: usize) -> Parser<Value> {
    if depth > MAX_NESTING {
        return too_deep();
    }
    let open = literal("[").skip(whitespace());
    let separator = literal(",").skip(whitespace());
    let items = sep_by(lazy(move || item(depth + 1)).skip(whitespace()), separator);
    between(open, items, literal("]"))
        .map(Value::List)
        .label("list")
}

/// Fails fatally at a list opened past [`MAX_NESTING`].
fn too_deep() -> Parser<Value> {
    let open = literal("[").label("list");
    Parser::new(move |stream, state| {
        let reply = open.parse(stream, state)?;
        if let Err(failure) = reply.result {
            return Ok(Reply {
                result: Err(failure),
                state: reply.state,
                error: reply.error,
            });
        }
        Ok(Reply::fatal(
            state.clone(),
            message(format!("Lists may not be nested more than {MAX_NESTING} levels deep.")),
        ))
    })
}

/// Any item. Lists come first so that a nesting failure is reported alone.
fn item(depth: usize) -> Parser<Value> {
    choice([
        list(depth),
        integer(),
        string(),
        keyword("nil", Value::Nil),
        keyword("true", Value::Bool(true)),
        keyword("false", Value::Bool(false)),
    ])
}

fn digit() -> Parser<char> {
    satisfy("digit", |c| c.is_ascii_digit())
}

/// An optionally signed decimal integer.
///
/// A literal that does not fit in an `i64` fails fatally at its start.
fn integer() -> Parser<Value> {
    let digits = optional(literal("-"))
        .then(digit())
        .then(many(digit()))
        .label("integer");

    Parser::new(move |stream, state| {
        let reply = digits.parse(stream, state)?;
        if let Err(failure) = reply.result {
            return Ok(Reply {
                result: Err(failure),
                state: reply.state,
                error: reply.error,
            });
        }
        let start = state.position().index();
        let end = reply.state.position().index();
        let text = &stream.text()[start..end];
        Ok(match text.parse::<i64>() {
            Ok(n) => reply.map(|_| Value::Integer(n)),
            Err(_) => Reply::fatal(
                state.clone(),
                message(format!("The integer literal {text} does not fit in 64 bits.")),
            ),
        })
    })
}

fn string() -> Parser<Value> {
    let quote = literal("\"");
    let body = many(satisfy("string character", |c| c != '"' && c != '\n'));
    between(quote.clone(), body, quote)
        .map(|chars| Value::Str(chars.into_iter().collect()))
        .label("string")
}

/// `name` as a whole word.
///
/// If `name` matches but runs into a letter or digit, the failure is kept as
/// a compound error pointing at the offending character.
fn keyword(name: &'static str, value: Value) -> Parser<Value> {
    let word_char = satisfy("letter or digit", char::is_alphanumeric);
    literal(name)
        .skip(not_followed_by(word_char, "letter or digit"))
        .attempt()
        .compound(name)
        .map(move |_| value.clone())
}

#[cfg(test)]
mod tests {
    use rebound::{CharStream, ErrorMessage, State};

    use super::*;
    use crate::combinator::Failure;

    fn parse(text: &str) -> Reply<Value> {
        let stream = CharStream::new(text);
        document()
            .parse(&stream, &State::new(stream.position_at(0)))
            .expect("no infinite loop")
    }

    #[test]
    fn test_parses_nested_lists() {
        let value = parse(" [1, -2, \"a b\", [nil, true], [], false]\n")
            .result
            .expect("well-formed input");

        assert_eq!(value.to_string(), "[1, -2, \"a b\", [nil, true], [], false]");
        assert_eq!(value.count_items(), 8);
    }

    #[test]
    fn test_empty_list() {
        let value = parse("[ ]").result.expect("well-formed input");
        assert_eq!(value, Value::List(Vec::new()));
    }

    #[test]
    fn test_missing_item_lists_every_alternative() {
        let reply = parse("[1, ?]");

        assert_eq!(reply.result.unwrap_err(), Failure::Error);
        assert_eq!(reply.state.position().column(), 5);

        let set = reply.error.to_set();
        for label in ["false", "integer", "list", "nil", "string", "true"] {
            assert!(set.contains(&ErrorMessage::Expected(label.into())), "missing {label}");
        }
    }

    #[test]
    fn test_keyword_prefix_reports_compound_error() {
        let reply = parse("[nilx]");

        assert_eq!(reply.state.position().column(), 2);
        let compound = reply
            .error
            .iter()
            .find_map(|message| match message {
                ErrorMessage::CompoundError { label, origin, .. } => {
                    Some((label.clone(), origin.clone()))
                }
                _ => None,
            })
            .expect("compound error for the keyword");

        assert_eq!(&*compound.0, "nil");
        assert_eq!(compound.1.column(), 5);
    }

    #[test]
    fn test_integer_overflow_is_fatal() {
        let reply = parse("[99999999999999999999]");

        assert_eq!(reply.result.unwrap_err(), Failure::Fatal);
        assert_eq!(reply.state.position().column(), 2);
        assert!(matches!(reply.error.single(), Some(ErrorMessage::Message(_))));
    }

    #[test]
    fn test_trailing_input_is_rejected() {
        let reply = parse("[1] 2");

        assert_eq!(reply.state.position().column(), 5);
        let set = reply.error.to_set();
        assert!(set.contains(&ErrorMessage::Expected("end of input".into())));
    }

    #[test]
    fn test_nesting_up_to_the_limit_is_accepted() {
        let text = format!("{}{}", "[".repeat(MAX_NESTING), "]".repeat(MAX_NESTING));
        let value = parse(&text).result.expect("nesting within the limit");

        assert_eq!(value.count_items(), MAX_NESTING - 1);
    }

    #[test]
    fn test_nesting_past_the_limit_is_fatal() {
        let depth = MAX_NESTING + 1;
        let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let reply = parse(&text);

        assert_eq!(reply.result.unwrap_err(), Failure::Fatal);
        assert_eq!(reply.state.position().column(), depth);
        assert_eq!(
            reply.error.single(),
            Some(&ErrorMessage::Message(
                "Lists may not be nested more than 64 levels deep.".into()
            ))
        );
    }

    #[test]
    fn test_unterminated_string() {
        let reply = parse("[\"abc");

        assert_eq!(reply.state.position().column(), 6);
        let set = reply.error.to_set();
        assert!(set.contains(&ErrorMessage::Expected("'\"'".into())));
        assert!(set.contains(&ErrorMessage::Unexpected("end of input".into())));
    }
}
