//! End-to-end behaviour of the public API
//!
//! These tests drive the merge algebra the way a combinator library would
//! and check what ends up in front of the user.

use std::cell::Cell;

use rebound::{
    CharStream, ErrorMessage, ErrorMessageList, InfiniteLoop, ParserError, ParserState,
    Position, RenderConfig, RenderOptions, State, backtrack_wrap, check_progress,
    compound_wrap, expected, merge, merge_if_needed, message,
};

/// Result of a parser in these tests: a new state or an error at a state.
type Step = Result<State, (State, ErrorMessageList)>;

/// Ordered choice between two parsers starting at `state`.
fn choice(
    state: &State,
    first: impl Fn(&State) -> Step,
    second: impl Fn(&State) -> Step,
) -> Step {
    match first(state) {
        Ok(next) => Ok(next),
        Err((failed_at, error)) if failed_at.position() != state.position() => {
            Err((failed_at, error))
        }
        Err((_, first_error)) => match second(state) {
            Ok(next) => Ok(next),
            Err((failed_at, second_error)) => {
                let error = merge_if_needed(state, &first_error, &failed_at, &second_error);
                Err((failed_at, error))
            }
        },
    }
}

fn fail_with(label: &'static str) -> impl Fn(&State) -> Step {
    move |state: &State| Err((state.clone(), expected(label)))
}

#[test]
fn test_alternation_at_same_position_reports_both() {
    let stream = CharStream::new("?");
    let start = State::new(stream.position_at(0));

    let (at, errors) = choice(&start, fail_with("digit"), fail_with("letter"))
        .expect_err("both alternatives fail");

    let set = errors.to_set();
    assert_eq!(set.len(), 2);
    assert!(set.contains(&ErrorMessage::Expected("digit".into())));
    assert!(set.contains(&ErrorMessage::Expected("letter".into())));

    let error = ParserError::new(at.position().clone(), errors);
    assert_eq!(
        error.to_string(),
        "Error in Ln: 1 Col: 1\nExpecting: digit or letter\n"
    );
}

#[test]
fn test_alternation_with_progress_discards_stale_error() {
    let stream = CharStream::new("[1 2");
    let start = State::new(stream.position_at(0));

    // The first alternative fails without consuming; the second consumes
    // "[1 " before failing.
    let consuming = |_: &State| -> Step {
        Err((
            State::new(stream.position_at(3)),
            expected("closing bracket"),
        ))
    };
    let (at, errors) =
        choice(&start, fail_with("integer"), consuming).expect_err("both alternatives fail");

    assert_eq!(errors, expected("closing bracket"));
    assert!(!errors.to_set().contains(&ErrorMessage::Expected("integer".into())));
    assert_eq!(at.position().column(), 4);
}

#[test]
fn test_line_context_on_second_line() {
    let stream = CharStream::new("alpha\nbeta\ngamma");
    let position = stream.position_at("alpha\n".len());
    let error = ParserError::new(position, message("bad token"));

    let rendered = error.to_string_with_stream(&stream);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "Error in Ln: 2 Col: 1");
    assert_eq!(lines[1], "beta");
    assert_eq!(lines[2], "^");
    assert_eq!(lines[3], "bad token");
}

#[test]
fn test_zero_progress_repetition_aborts() {
    fn many(
        state: &State,
        parser: impl Fn(&State) -> Step,
        iterations: &Cell<usize>,
    ) -> Result<State, InfiniteLoop> {
        let run = |state: &State| {
            iterations.set(iterations.get() + 1);
            parser(state)
        };
        let Ok(mut current) = run(state) else {
            return Ok(state.clone());
        };
        while let Ok(next) = run(&current) {
            check_progress("many", &current, &next)?;
            current = next;
        }
        Ok(current)
    }

    let iterations = Cell::new(0);
    let start = State::new(Position::start());
    let always_empty = |state: &State| -> Step { Ok(state.clone()) };

    let err = many(&start, always_empty, &iterations).expect_err("loop guard fires");

    assert_eq!(iterations.get(), 2);
    assert_eq!(err.combinator(), "many");
}

#[test]
fn test_compound_after_backtracking_points_to_origin() {
    let stream = CharStream::new("[1, nil2");
    let origin = State::new(stream.position_at(4));
    let resumed = State::new(stream.position_at(0));

    let backtracked = backtrack_wrap(&origin, &expected("end of keyword"));
    let compound = compound_wrap("keyword", &resumed, &backtracked);

    match compound.single() {
        Some(ErrorMessage::CompoundError { origin: at, .. }) => {
            assert_eq!(at, origin.position());
        }
        other => panic!("expected a compound error, got {other:?}"),
    }

    // Repeated backtracking over the same failure does not nest.
    assert_eq!(backtrack_wrap(&resumed, &backtracked), backtracked);
}

#[test]
fn test_render_options_from_config() {
    let stream = CharStream::with_name("", "input.lst");
    let config = RenderConfig::new(79, "  ", "    ");
    let error = ParserError::new(
        stream.position_at(0),
        merge(&expected("list"), &message("empty input")),
    );

    let mut out = Vec::new();
    error
        .write_to(&mut out, &RenderOptions::from_config(&config))
        .expect("Vec writes succeed");

    assert_eq!(
        String::from_utf8(out).expect("rendered text is UTF-8"),
        "  Error in input.lst: Ln: 1 Col: 1\n  \
         Expecting: list\n  \
         Other error messages:\n      \
         empty input\n"
    );
}
