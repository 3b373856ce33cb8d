//! A small backtracking combinator kernel over [`CharStream`].
//!
//! Parsers map a stream and a [`State`] to a [`Reply`]. Ordinary failures
//! travel inside the reply as an [`ErrorMessageList`] and are combined with
//! the `rebound` merge rules; only the loop guard aborts a parse, through the
//! outer [`Result`] of [`PResult`].
//!
//! A failure is recoverable by alternation only when it is a
//! [`Failure::Error`] reported at the state the alternation started from.

use std::rc::Rc;

use rebound::{
    CharStream, ErrorMessage, ErrorMessageList, InfiniteLoop, ParserState, State,
    backtrack_wrap, check_progress, compound_wrap, expected, merge, merge_if_needed,
    merge_if_needed3, unexpected,
};

/// How a parser failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Alternatives may still be tried if no input was consumed.
    Error,
    /// No alternative may be tried.
    Fatal,
}

/// Outcome of applying a parser.
///
/// `error` is meaningful on success too: it records what else could have
/// been accepted at `state`, and is reported if the next parser fails there.
#[derive(Debug)]
pub struct Reply<T> {
    pub result: Result<T, Failure>,
    pub state: State,
    pub error: ErrorMessageList,
}

impl<T> Reply<T> {
    pub fn ok(value: T, state: State, error: ErrorMessageList) -> Self {
        Self {
            result: Ok(value),
            state,
            error,
        }
    }

    pub fn error(state: State, error: ErrorMessageList) -> Self {
        Self {
            result: Err(Failure::Error),
            state,
            error,
        }
    }

    pub fn fatal(state: State, error: ErrorMessageList) -> Self {
        Self {
            result: Err(Failure::Fatal),
            state,
            error,
        }
    }

    /// Whether this is a recoverable failure that consumed nothing since `start`.
    pub fn is_recoverable_at(&self, start: &State) -> bool {
        matches!(self.result, Err(Failure::Error)) && self.state.position() == start.position()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        Reply {
            result: self.result.map(f),
            state: self.state,
            error: self.error,
        }
    }

    /// Replaces the error list with `f(state, error)`.
    pub fn map_error(
        mut self,
        f: impl FnOnce(&State, &ErrorMessageList) -> ErrorMessageList,
    ) -> Self {
        self.error = f(&self.state, &self.error);
        self
    }
}

/// Result of running a parser: a reply, or an aborted parse.
pub type PResult<T> = Result<Reply<T>, InfiniteLoop>;

type ParserFn<T> = Rc<dyn Fn(&CharStream<'_>, &State) -> PResult<T>>;

/// A type-erased, cheaply clonable parser.
pub struct Parser<T> {
    run: ParserFn<T>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self {
            run: Rc::clone(&self.run),
        }
    }
}

impl<T: 'static> Parser<T> {
    pub fn new(run: impl Fn(&CharStream<'_>, &State) -> PResult<T> + 'static) -> Self {
        Self { run: Rc::new(run) }
    }

    /// Applies the parser at `state`.
    ///
    /// # Errors
    ///
    /// Returns [`InfiniteLoop`] if a repetition inside the parser stopped
    /// making progress.
    pub fn parse(&self, stream: &CharStream<'_>, state: &State) -> PResult<T> {
        (self.run)(stream, state)
    }

    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Parser<U> {
        Parser::new(move |stream, state| Ok(self.parse(stream, state)?.map(&f)))
    }

    /// Sequence: `self` then `next`, keeping both values.
    pub fn then<U: 'static>(self, next: Parser<U>) -> Parser<(T, U)> {
        Parser::new(move |stream, state| {
            let Reply {
                result,
                state: after,
                error,
            } = self.parse(stream, state)?;
            let first = match result {
                Ok(value) => value,
                Err(failure) => {
                    return Ok(Reply {
                        result: Err(failure),
                        state: after,
                        error,
                    });
                }
            };
            Ok(next
                .parse(stream, &after)?
                .map(|second| (first, second))
                .map_error(|at, next_error| merge_if_needed(&after, &error, at, next_error)))
        })
    }

    /// Sequence keeping the left value.
    pub fn skip<U: 'static>(self, next: Parser<U>) -> Parser<T> {
        self.then(next).map(|(value, _)| value)
    }

    /// Sequence keeping the right value.
    pub fn skip_left<U: 'static>(self, next: Parser<U>) -> Parser<U> {
        self.then(next).map(|(_, value)| value)
    }

    /// Backtracks to the starting state when `self` fails after consuming
    /// input, recording where the failure happened.
    pub fn attempt(self) -> Parser<T> {
        Parser::new(move |stream, state| {
            let reply = self.parse(stream, state)?;
            Ok(match reply.result {
                Ok(_) => reply,
                Err(_) if reply.state.position() != state.position() => {
                    Reply::error(state.clone(), backtrack_wrap(&reply.state, &reply.error))
                }
                Err(_) => Reply::error(reply.state, reply.error),
            })
        })
    }

    /// Reports `label` as the expectation when `self` does not consume input.
    pub fn label(self, label: &'static str) -> Parser<T> {
        Parser::new(move |stream, state| {
            Ok(self.parse(stream, state)?.map_error(|at, error| {
                if at.position() == state.position() {
                    expected(label)
                } else {
                    error.clone()
                }
            }))
        })
    }

    /// Like [`label`](Self::label), but a failure after consuming input is
    /// reported as a compound error at the starting state and becomes fatal.
    pub fn compound(self, label: &'static str) -> Parser<T> {
        Parser::new(move |stream, state| {
            let reply = self.parse(stream, state)?;
            if reply.state.position() == state.position() {
                return Ok(reply.map_error(|at, error| match error.single() {
                    Some(ErrorMessage::BacktrackPoint { .. }) => compound_wrap(label, at, error),
                    _ => expected(label),
                }));
            }
            Ok(match reply.result {
                Err(Failure::Error) => {
                    Reply::fatal(state.clone(), compound_wrap(label, &reply.state, &reply.error))
                }
                _ => reply,
            })
        })
    }
}

/// Defers construction of a parser until it runs, for recursive grammars.
pub fn lazy<T: 'static>(build: impl Fn() -> Parser<T> + 'static) -> Parser<T> {
    Parser::new(move |stream, state| build().parse(stream, state))
}

fn peek(stream: &CharStream<'_>, state: &State) -> Option<char> {
    remaining(stream, state).chars().next()
}

fn remaining<'src>(stream: &CharStream<'src>, state: &State) -> &'src str {
    stream.text().get(state.position().index()..).unwrap_or("")
}

fn advance(state: &State, text: &str) -> State {
    let position = text
        .chars()
        .fold(state.position().clone(), |position, c| position.advance(c));
    state.clone().advance_to(position)
}

fn describe(found: Option<char>) -> ErrorMessageList {
    match found {
        Some(c) => unexpected(format!("{c:?}")),
        None => unexpected("end of input"),
    }
}

/// Accepts one character matching `predicate`.
pub fn satisfy(label: &'static str, predicate: impl Fn(char) -> bool + 'static) -> Parser<char> {
    Parser::new(move |stream, state| {
        Ok(match peek(stream, state) {
            Some(c) if predicate(c) => {
                let next = state.clone().advance_to(state.position().advance(c));
                Reply::ok(c, next, ErrorMessageList::new())
            }
            found => Reply::error(state.clone(), merge(&expected(label), &describe(found))),
        })
    })
}

/// Accepts `text` exactly. Fails without consuming input on a mismatch.
pub fn literal(text: &'static str) -> Parser<&'static str> {
    let label: Rc<str> = format!("'{text}'").into();
    Parser::new(move |stream, state| {
        let rest = remaining(stream, state);
        Ok(if rest.starts_with(text) {
            Reply::ok(text, advance(state, text), ErrorMessageList::new())
        } else {
            let error = merge(&expected(Rc::clone(&label)), &describe(rest.chars().next()));
            Reply::error(state.clone(), error)
        })
    })
}

/// Skips whitespace. Never fails and reports no expectations.
pub fn whitespace() -> Parser<()> {
    Parser::new(|stream, state| {
        let rest = remaining(stream, state);
        let skipped = &rest[..rest.len() - rest.trim_start().len()];
        Ok(Reply::ok((), advance(state, skipped), ErrorMessageList::new()))
    })
}

/// Succeeds only at the end of the input.
pub fn eof() -> Parser<()> {
    Parser::new(|stream, state| {
        Ok(match peek(stream, state) {
            None => Reply::ok((), state.clone(), ErrorMessageList::new()),
            found => Reply::error(
                state.clone(),
                merge(&expected("end of input"), &describe(found)),
            ),
        })
    })
}

/// Succeeds without consuming input if `parser` fails at this state.
pub fn not_followed_by<T: 'static>(parser: Parser<T>, label: &'static str) -> Parser<()> {
    Parser::new(move |stream, state| {
        Ok(match parser.parse(stream, state)?.result {
            Ok(_) => Reply::error(state.clone(), unexpected(label)),
            Err(_) => Reply::ok((), state.clone(), ErrorMessageList::new()),
        })
    })
}

/// `Some(value)` if `parser` succeeds, `None` if it fails without consuming input.
pub fn optional<T: 'static>(parser: Parser<T>) -> Parser<Option<T>> {
    Parser::new(move |stream, state| {
        let reply = parser.parse(stream, state)?;
        if reply.is_recoverable_at(state) {
            return Ok(Reply::ok(None, reply.state, reply.error));
        }
        Ok(reply.map(Some))
    })
}

/// Tries each parser in order until one consumes input or succeeds.
///
/// Errors of alternatives that failed at the starting state are merged. An
/// empty list fails with no messages.
pub fn choice<T: 'static>(parsers: impl IntoIterator<Item = Parser<T>>) -> Parser<T> {
    let parsers: Vec<Parser<T>> = parsers.into_iter().collect();
    Parser::new(move |stream, state| {
        let mut error = ErrorMessageList::new();
        for parser in &parsers {
            let reply = parser.parse(stream, state)?;
            if !reply.is_recoverable_at(state) {
                return Ok(reply.map_error(|at, last| merge_if_needed(state, &error, at, last)));
            }
            error = merge(&error, &reply.error);
        }
        Ok(Reply::error(state.clone(), error))
    })
}

/// `open`, then `inner`, then `close`, keeping the value of `inner`.
pub fn between<O: 'static, T: 'static, C: 'static>(
    open: Parser<O>,
    inner: Parser<T>,
    close: Parser<C>,
) -> Parser<T> {
    Parser::new(move |stream, state| {
        let Reply {
            result,
            state: s1,
            error: e1,
        } = open.parse(stream, state)?;
        if let Err(failure) = result {
            return Ok(Reply {
                result: Err(failure),
                state: s1,
                error: e1,
            });
        }

        let Reply {
            result,
            state: s2,
            error: e2,
        } = inner.parse(stream, &s1)?;
        let value = match result {
            Ok(value) => value,
            Err(failure) => {
                return Ok(Reply {
                    result: Err(failure),
                    error: merge_if_needed(&s1, &e1, &s2, &e2),
                    state: s2,
                });
            }
        };

        Ok(close
            .parse(stream, &s2)?
            .map(|_| value)
            .map_error(|s3, e3| merge_if_needed3(&s1, &e1, &s2, &e2, s3, e3)))
    })
}

/// Zero or more repetitions of `item`.
///
/// # Errors
///
/// Aborts with [`InfiniteLoop`] when `item` succeeds without consuming input
/// after the first iteration.
pub fn many<T: 'static>(item: Parser<T>) -> Parser<Vec<T>> {
    Parser::new(move |stream, state| {
        let mut current = state.clone();
        let mut error = ErrorMessageList::new();
        let mut values = Vec::new();
        loop {
            let reply = item.parse(stream, &current)?;
            if reply.is_recoverable_at(&current) {
                let error = merge(&error, &reply.error);
                return Ok(Reply::ok(values, current, error));
            }
            let Reply {
                result,
                state: next,
                error: next_error,
            } = reply;
            match result {
                Ok(value) => {
                    if !values.is_empty() {
                        check_progress("many", &current, &next)?;
                    }
                    values.push(value);
                    current = next;
                    error = next_error;
                }
                Err(failure) => {
                    return Ok(Reply {
                        result: Err(failure),
                        error: merge_if_needed(&current, &error, &next, &next_error),
                        state: next,
                    });
                }
            }
        }
    })
}

/// Zero or more `item`s separated by `separator`.
///
/// A separator must be followed by an item. Aborts with [`InfiniteLoop`] when
/// a separator and item together consume no input.
pub fn sep_by<T: 'static, S: 'static>(item: Parser<T>, separator: Parser<S>) -> Parser<Vec<T>> {
    Parser::new(move |stream, state| {
        let first = item.parse(stream, state)?;
        if first.is_recoverable_at(state) {
            return Ok(Reply::ok(Vec::new(), first.state, first.error));
        }
        let Reply {
            result,
            state: mut current,
            mut error,
        } = first;
        let mut values = match result {
            Ok(value) => vec![value],
            Err(failure) => {
                return Ok(Reply {
                    result: Err(failure),
                    state: current,
                    error,
                });
            }
        };

        loop {
            let separated = separator.parse(stream, &current)?;
            if separated.is_recoverable_at(&current) {
                let error = merge(&error, &separated.error);
                return Ok(Reply::ok(values, current, error));
            }
            let Reply {
                result,
                state: after_separator,
                error: separator_error,
            } = separated;
            if let Err(failure) = result {
                return Ok(Reply {
                    result: Err(failure),
                    error: merge_if_needed(&current, &error, &after_separator, &separator_error),
                    state: after_separator,
                });
            }

            let Reply {
                result,
                state: after_item,
                error: item_error,
            } = item.parse(stream, &after_separator)?;
            let merged = merge_if_needed3(
                &current,
                &error,
                &after_separator,
                &separator_error,
                &after_item,
                &item_error,
            );
            match result {
                Ok(value) => {
                    check_progress("sep_by", &current, &after_item)?;
                    values.push(value);
                    current = after_item;
                    error = merged;
                }
                Err(failure) => {
                    return Ok(Reply {
                        result: Err(failure),
                        state: after_item,
                        error: merged,
                    });
                }
            }
        }
    })
}
