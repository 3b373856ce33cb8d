//! Persistent, prependable lists of [`ErrorMessage`]s.
//!
//! An [`ErrorMessageList`] is a singly-linked list whose tails are shared
//! through [`Rc`]. Prepending never copies the existing list, so every branch
//! of a backtracking parser can build on the same error without cloning it.
//! The empty list is not allocated.
//!
//! Lists have set semantics: equality, hashing and ordering are defined over
//! their canonical [`MessageSet`], which drops entries that carry no
//! information and ignores order and duplicates.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    iter::FusedIterator,
    rc::Rc,
};

use crate::message::{ErrorMessage, OtherValue, Payload};

struct Node {
    head: ErrorMessage,
    tail: ErrorMessageList,
}

/// A persistent list of error messages.
#[derive(Clone, Default)]
pub struct ErrorMessageList(Option<Rc<Node>>);

impl ErrorMessageList {
    /// The empty list.
    pub const fn new() -> Self {
        Self(None)
    }

    /// Returns the list `head :: tail`. O(1); `tail` is shared.
    pub fn cons(head: ErrorMessage, tail: ErrorMessageList) -> Self {
        Self(Some(Rc::new(Node { head, tail })))
    }

    /// A one-entry list.
    pub fn singleton(message: ErrorMessage) -> Self {
        Self::cons(message, Self::new())
    }

    /// Returns a new list with `head` in front of this one.
    pub fn prepend(&self, head: ErrorMessage) -> Self {
        Self::cons(head, self.clone())
    }

    /// Builds a list holding `messages` in enumeration order.
    pub fn of_sequence<I>(messages: I) -> Self
    where
        I: IntoIterator<Item = ErrorMessage>,
    {
        let messages: Vec<ErrorMessage> = messages.into_iter().collect();
        Self::prepend_all(messages, Self::new())
    }

    /// Conses `messages` onto `tail`, keeping their order.
    pub(crate) fn prepend_all(messages: Vec<ErrorMessage>, tail: ErrorMessageList) -> Self {
        messages
            .into_iter()
            .rev()
            .fold(tail, |list, message| Self::cons(message, list))
    }

    /// Returns `true` if the list has no nodes.
    ///
    /// A non-empty list may still be canonically empty; see [`Self::to_set`].
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Number of raw entries, duplicates and empty labels included.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn head(&self) -> Option<&ErrorMessage> {
        self.0.as_deref().map(|node| &node.head)
    }

    /// The list after the first entry, or `None` if the list is empty.
    pub fn tail(&self) -> Option<&ErrorMessageList> {
        self.0.as_deref().map(|node| &node.tail)
    }

    /// The only entry of a one-node list.
    pub fn single(&self) -> Option<&ErrorMessage> {
        self.0
            .as_deref()
            .filter(|node| node.tail.is_empty())
            .map(|node| &node.head)
    }

    /// Iterates the raw entries front to back.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.0.as_deref(),
        }
    }

    /// Returns `true` if both lists are the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// The canonical set of this list.
    ///
    /// Empty `Expected`/`Unexpected`/`Message` entries and incomparable
    /// `OtherError` payloads are dropped; the remaining entries are sorted and
    /// deduplicated.
    pub fn to_set(&self) -> MessageSet {
        let mut messages: Vec<ErrorMessage> = self
            .iter()
            .filter(|message| message.is_meaningful())
            .cloned()
            .collect();
        messages.sort();
        messages.dedup();
        MessageSet(messages)
    }
}

impl Drop for ErrorMessageList {
    // Unlink uniquely owned nodes iteratively so long lists do not overflow
    // the stack when dropped.
    fn drop(&mut self) {
        let mut next = self.0.take();
        while let Some(node) = next {
            match Rc::try_unwrap(node) {
                Ok(mut node) => next = node.tail.0.take(),
                Err(_) => break,
            }
        }
    }
}

impl PartialEq for ErrorMessageList {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.to_set() == other.to_set()
    }
}

impl Eq for ErrorMessageList {}

impl PartialOrd for ErrorMessageList {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ErrorMessageList {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.ptr_eq(other) {
            return Ordering::Equal;
        }
        self.to_set().cmp(&other.to_set())
    }
}

impl Hash for ErrorMessageList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_set().hash(state);
    }
}

impl fmt::Debug for ErrorMessageList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl FromIterator<ErrorMessage> for ErrorMessageList {
    fn from_iter<I: IntoIterator<Item = ErrorMessage>>(iter: I) -> Self {
        Self::of_sequence(iter)
    }
}

impl<'a> IntoIterator for &'a ErrorMessageList {
    type Item = &'a ErrorMessage;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the raw entries of an [`ErrorMessageList`].
pub struct Iter<'a> {
    next: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a ErrorMessage;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.tail.0.as_deref();
        Some(&node.head)
    }
}

impl FusedIterator for Iter<'_> {}

/// The canonical, order-independent view of an [`ErrorMessageList`].
///
/// Entries are sorted by [`ErrorMessage`]'s ordering and unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageSet(Vec<ErrorMessage>);

impl MessageSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, message: &ErrorMessage) -> bool {
        self.0.binary_search(message).is_ok()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ErrorMessage> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ErrorMessage] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ErrorMessage> {
        self.0
    }
}

impl<'a> IntoIterator for &'a MessageSet {
    type Item = &'a ErrorMessage;
    type IntoIter = std::slice::Iter<'a, ErrorMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// `[Expected(label)]`
pub fn expected(label: impl Into<Rc<str>>) -> ErrorMessageList {
    ErrorMessageList::singleton(ErrorMessage::Expected(label.into()))
}

/// `[Unexpected(label)]`
pub fn unexpected(label: impl Into<Rc<str>>) -> ErrorMessageList {
    ErrorMessageList::singleton(ErrorMessage::Unexpected(label.into()))
}

/// `[Message(text)]`
pub fn message(text: impl Into<Rc<str>>) -> ErrorMessageList {
    ErrorMessageList::singleton(ErrorMessage::Message(text.into()))
}

/// `[OtherError(payload)]`
///
/// Wrap plain values in [`Comparable`](crate::Comparable) or
/// [`Opaque`](crate::Opaque), or use [`other_opaque`].
pub fn other(payload: impl Payload) -> ErrorMessageList {
    ErrorMessageList::singleton(ErrorMessage::OtherError(OtherValue::new(payload)))
}

/// `[OtherError(value)]` for a value that never takes part in comparisons.
pub fn other_opaque<T: fmt::Debug + 'static>(value: T) -> ErrorMessageList {
    other(crate::message::Opaque(value))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::message::Comparable;

    fn expected_msg(label: &str) -> ErrorMessage {
        ErrorMessage::Expected(label.into())
    }

    #[test]
    fn test_empty_list_is_not_allocated() {
        let list = ErrorMessageList::new();

        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.head().is_none());
        assert!(list.ptr_eq(&ErrorMessageList::default()));
    }

    #[test]
    fn test_prepend_shares_tail() {
        let tail = expected("digit");
        let a = tail.prepend(expected_msg("letter"));
        let b = tail.prepend(expected_msg("space"));

        assert!(a.tail().expect("non-empty").ptr_eq(&tail));
        assert!(b.tail().expect("non-empty").ptr_eq(&tail));
        assert_eq!(tail.len(), 1);
    }

    #[test]
    fn test_of_sequence_preserves_order() {
        let list = ErrorMessageList::of_sequence([
            expected_msg("a"),
            expected_msg("b"),
            expected_msg("c"),
        ]);

        let labels: Vec<_> = list
            .iter()
            .map(|message| match message {
                ErrorMessage::Expected(label) => label.to_string(),
                other => panic!("unexpected entry {other:?}"),
            })
            .collect();
        assert_eq!(labels, ["a", "b", "c"]);
    }

    #[test]
    fn test_duplicates_collapse_in_set() {
        let list = ErrorMessageList::of_sequence([expected_msg("x"), expected_msg("x")]);

        let set = list.to_set();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&expected_msg("x")));
        assert_eq!(list, expected("x"));
    }

    #[test]
    fn test_empty_message_equals_empty_list() {
        assert_eq!(message(""), ErrorMessageList::new());
        assert_eq!(expected(""), ErrorMessageList::new());
        assert_eq!(unexpected(""), ErrorMessageList::new());
        assert_ne!(message(" "), ErrorMessageList::new());
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = ErrorMessageList::of_sequence([expected_msg("a"), expected_msg("b")]);
        let b = ErrorMessageList::of_sequence([expected_msg("b"), expected_msg("a")]);

        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);

        let mut seen = HashSet::new();
        seen.insert(a);
        assert!(seen.contains(&b));
    }

    #[test]
    fn test_incomparable_payloads_are_excluded() {
        let with_opaque = other_opaque(vec![0.5f64]).prepend(expected_msg("digit"));

        assert_eq!(with_opaque.len(), 2);
        assert_eq!(with_opaque.to_set().len(), 1);
        assert_eq!(with_opaque, expected("digit"));
    }

    #[test]
    fn test_comparable_payloads_participate() {
        assert_eq!(other(Comparable(7u8)), other(Comparable(7u8)));
        assert_ne!(other(Comparable(7u8)), other(Comparable(8u8)));
        assert_ne!(other(Comparable(7u8)), ErrorMessageList::new());
    }

    #[test]
    fn test_single() {
        assert!(expected("a").single().is_some());
        assert!(ErrorMessageList::new().single().is_none());
        assert!(
            expected("a")
                .prepend(expected_msg("b"))
                .single()
                .is_none()
        );
    }

    #[test]
    fn test_long_list_drops_without_overflow() {
        let mut list = ErrorMessageList::new();
        for i in 0..200_000 {
            list = list.prepend(ErrorMessage::Message(i.to_string().into()));
        }
        assert_eq!(list.len(), 200_000);
        drop(list);
    }
}
