//! Fatal abort for repetition combinators that stop making progress.
//!
//! A repetition whose inner parser succeeds without moving the position would
//! loop forever. That is a bug in how the combinators are put together, not a
//! property of the input, so it is reported through [`InfiniteLoop`] rather
//! than as an [`ErrorMessageList`](crate::ErrorMessageList) entry. Combinators
//! propagate it with `?` on a channel separate from ordinary failures, which
//! keeps it out of every merge and backtracking decision.

use log::error;
use thiserror::Error;

use crate::position::{ParserState, Position};

/// A repetition combinator applied a parser that succeeded without progress.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "the combinator `{combinator}` was applied to a parser that succeeded without \
     consuming input at {position}; repeating it would never terminate"
)]
pub struct InfiniteLoop {
    combinator: String,
    position: Position,
}

impl InfiniteLoop {
    /// Name of the combinator that detected the loop.
    pub fn combinator(&self) -> &str {
        &self.combinator
    }

    pub fn position(&self) -> &Position {
        &self.position
    }
}

/// Aborts the parse: always returns `Err(InfiniteLoop)`.
///
/// `combinator` names the repetition combinator, `state` is where the inner
/// parser stopped making progress.
pub fn raise_infinite_loop<T, S>(combinator: &str, state: &S) -> Result<T, InfiniteLoop>
where
    S: ParserState + ?Sized,
{
    let position = state.position().clone();
    error!(combinator, position:%; "Infinite loop detected");
    Err(InfiniteLoop {
        combinator: combinator.to_string(),
        position,
    })
}

/// Aborts the parse if `after` is at the same position as `before`.
///
/// Repetition combinators call this after every successful iteration but the
/// first.
pub fn check_progress<S0, S1>(combinator: &str, before: &S0, after: &S1) -> Result<(), InfiniteLoop>
where
    S0: ParserState + ?Sized,
    S1: ParserState + ?Sized,
{
    if before.position() == after.position() {
        return raise_infinite_loop(combinator, after);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::position::State;

    /// A repetition driver in the shape combinators use: the first iteration
    /// may succeed without progress, later ones may not.
    fn repeat<F>(start: State, mut step: F) -> Result<(usize, State), InfiniteLoop>
    where
        F: FnMut(&State) -> Option<State>,
    {
        let Some(mut state) = step(&start) else {
            return Ok((0, start));
        };
        let mut count = 1;
        while let Some(next) = step(&state) {
            check_progress("many", &state, &next)?;
            state = next;
            count += 1;
        }
        Ok((count, state))
    }

    #[test]
    fn test_zero_progress_aborts_on_second_iteration() {
        let calls = Cell::new(0);
        let result = repeat(State::new(Position::start()), |state| {
            calls.set(calls.get() + 1);
            Some(state.clone())
        });

        let err = result.expect_err("must abort");
        assert_eq!(calls.get(), 2);
        assert_eq!(err.combinator(), "many");
        assert_eq!(err.position(), &Position::start());
    }

    #[test]
    fn test_progressing_parser_terminates_normally() {
        let result = repeat(State::new(Position::start()), |state| {
            let index = state.position().index();
            (index < 3).then(|| state.clone().advance_to(Position::new(index + 1, 1, index + 2)))
        });

        let (count, state) = result.expect("terminates");
        assert_eq!(count, 3);
        assert_eq!(state.position().index(), 3);
    }

    #[test]
    fn test_raise_infinite_loop_message() {
        let err = raise_infinite_loop::<(), _>("sep_by", &Position::new(4, 2, 1))
            .expect_err("always fails");

        assert_eq!(
            err.to_string(),
            "the combinator `sep_by` was applied to a parser that succeeded without \
             consuming input at Ln: 2 Col: 1; repeating it would never terminate"
        );
    }

    #[test]
    fn test_check_progress_accepts_movement() {
        let before = Position::new(0, 1, 1);
        let after = Position::new(1, 1, 2);

        assert!(check_progress("many", &before, &after).is_ok());
    }
}
