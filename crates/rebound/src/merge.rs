//! Combining error lists across alternatives and sequences.
//!
//! Combinators use these functions to decide what to report when several
//! attempts failed. The rule throughout: an error recorded at a position the
//! parser has since moved past is stale and gets dropped; errors recorded at
//! the same position are all reported.

use std::rc::Rc;

use log::trace;

use crate::{
    message::ErrorMessage,
    message_list::ErrorMessageList,
    position::ParserState,
};

/// Every entry of `a` followed by every entry of `b`.
///
/// O(|a|): the nodes of `a` are rebuilt, `b` is shared.
pub fn concat(a: &ErrorMessageList, b: &ErrorMessageList) -> ErrorMessageList {
    if a.is_empty() {
        return b.clone();
    }
    let front: Vec<ErrorMessage> = a.iter().cloned().collect();
    ErrorMessageList::prepend_all(front, b.clone())
}

/// `b` if `a` is empty, otherwise `concat(a, b)`.
pub fn merge(a: &ErrorMessageList, b: &ErrorMessageList) -> ErrorMessageList {
    if a.is_empty() {
        b.clone()
    } else {
        concat(a, b)
    }
}

/// Combines the error of an earlier attempt with the error of a later one.
///
/// If the later attempt ended at a different position, the earlier error is
/// stale and only `new_error` is kept. Otherwise both describe the same input
/// location and are merged.
pub fn merge_if_needed<S0, S1>(
    old_state: &S0,
    old_error: &ErrorMessageList,
    new_state: &S1,
    new_error: &ErrorMessageList,
) -> ErrorMessageList
where
    S0: ParserState + ?Sized,
    S1: ParserState + ?Sized,
{
    if old_state.position() != new_state.position() {
        if !old_error.is_empty() {
            trace!(
                old_position:% = old_state.position(),
                new_position:% = new_state.position();
                "Discarding stale error"
            );
        }
        new_error.clone()
    } else {
        merge(old_error, new_error)
    }
}

/// [`merge_if_needed`] applied across three consecutive failure points.
pub fn merge_if_needed3<S0, S1, S2>(
    s0: &S0,
    e0: &ErrorMessageList,
    s1: &S1,
    e1: &ErrorMessageList,
    s2: &S2,
    e2: &ErrorMessageList,
) -> ErrorMessageList
where
    S0: ParserState + ?Sized,
    S1: ParserState + ?Sized,
    S2: ParserState + ?Sized,
{
    let merged = merge_if_needed(s0, e0, s1, e1);
    merge_if_needed(s1, &merged, s2, e2)
}

/// Records that the parser backtracked from `state` after failing with `error`.
///
/// An error that already is a single backtrack point is returned unchanged,
/// so repeated backtracking does not nest wrappers.
pub fn backtrack_wrap<S>(state: &S, error: &ErrorMessageList) -> ErrorMessageList
where
    S: ParserState + ?Sized,
{
    if let Some(ErrorMessage::BacktrackPoint { .. }) = error.single() {
        trace!(position:% = state.position(); "Backtrack point already recorded");
        return error.clone();
    }
    ErrorMessageList::singleton(ErrorMessage::BacktrackPoint {
        origin: state.position().clone(),
        inner: error.clone(),
    })
}

/// Attributes `error` to the composite construct named `label`.
///
/// If `error` is a single backtrack point, the compound error takes over its
/// origin and inner list, so the failure is reported where it happened rather
/// than where the caller resumed.
pub fn compound_wrap<S>(
    label: impl Into<Rc<str>>,
    state: &S,
    error: &ErrorMessageList,
) -> ErrorMessageList
where
    S: ParserState + ?Sized,
{
    let label = label.into();
    let message = match error.single() {
        Some(ErrorMessage::BacktrackPoint { origin, inner }) => ErrorMessage::CompoundError {
            label,
            origin: origin.clone(),
            inner: inner.clone(),
        },
        _ => ErrorMessage::CompoundError {
            label,
            origin: state.position().clone(),
            inner: error.clone(),
        },
    };
    ErrorMessageList::singleton(message)
}
