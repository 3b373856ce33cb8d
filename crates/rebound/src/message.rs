//! Individual facts about a parse failure.
//!
//! An [`ErrorMessage`] is one entry of an
//! [`ErrorMessageList`](crate::ErrorMessageList). Messages compare by value;
//! nested lists inside [`ErrorMessage::CompoundError`] and
//! [`ErrorMessage::BacktrackPoint`] compare by their canonical sets.
//!
//! Application-defined payloads are carried by [`ErrorMessage::OtherError`]
//! through the [`Payload`] trait. A payload may refuse to be compared, in which
//! case it is left out of every equality, hashing and ordering decision made
//! on the list that holds it.

use std::{
    any::{Any, TypeId},
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
};

use crate::{message_list::ErrorMessageList, position::Position};

/// One reason why a parser failed.
#[derive(Debug, Clone)]
pub enum ErrorMessage {
    /// Something with this description was required but absent.
    Expected(Rc<str>),

    /// Disallowed input was present.
    Unexpected(Rc<str>),

    /// Free-form failure description.
    Message(Rc<str>),

    /// A named composite construct failed because of `inner`.
    ///
    /// `origin` is where `inner` was reported, which is not necessarily where
    /// the composite parser was when it gave up.
    CompoundError {
        label: Rc<str>,
        origin: Position,
        inner: ErrorMessageList,
    },

    /// The parser failed at `origin` with `inner`, then backtracked past it.
    BacktrackPoint {
        origin: Position,
        inner: ErrorMessageList,
    },

    /// Caller-defined payload.
    OtherError(OtherValue),
}

impl ErrorMessage {
    /// Returns `false` for entries that carry no information.
    ///
    /// Empty `Expected`, `Unexpected` and `Message` labels and incomparable
    /// `OtherError` payloads are not part of a list's canonical set.
    pub fn is_meaningful(&self) -> bool {
        match self {
            ErrorMessage::Expected(label)
            | ErrorMessage::Unexpected(label)
            | ErrorMessage::Message(label) => !label.is_empty(),
            ErrorMessage::CompoundError { .. } | ErrorMessage::BacktrackPoint { .. } => true,
            ErrorMessage::OtherError(value) => value.is_comparable(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            ErrorMessage::Expected(_) => 0,
            ErrorMessage::Unexpected(_) => 1,
            ErrorMessage::Message(_) => 2,
            ErrorMessage::CompoundError { .. } => 3,
            ErrorMessage::BacktrackPoint { .. } => 4,
            ErrorMessage::OtherError(_) => 5,
        }
    }
}

impl PartialEq for ErrorMessage {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ErrorMessage {}

impl PartialOrd for ErrorMessage {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ErrorMessage {
    fn cmp(&self, other: &Self) -> Ordering {
        use ErrorMessage::*;

        match (self, other) {
            (Expected(a), Expected(b))
            | (Unexpected(a), Unexpected(b))
            | (Message(a), Message(b)) => a.cmp(b),
            (
                CompoundError {
                    label: la,
                    origin: oa,
                    inner: ia,
                },
                CompoundError {
                    label: lb,
                    origin: ob,
                    inner: ib,
                },
            ) => la.cmp(lb).then_with(|| oa.cmp(ob)).then_with(|| ia.cmp(ib)),
            (
                BacktrackPoint {
                    origin: oa,
                    inner: ia,
                },
                BacktrackPoint {
                    origin: ob,
                    inner: ib,
                },
            ) => oa.cmp(ob).then_with(|| ia.cmp(ib)),
            (OtherError(a), OtherError(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for ErrorMessage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            ErrorMessage::Expected(label)
            | ErrorMessage::Unexpected(label)
            | ErrorMessage::Message(label) => label.hash(state),
            ErrorMessage::CompoundError {
                label,
                origin,
                inner,
            } => {
                label.hash(state);
                origin.hash(state);
                inner.hash(state);
            }
            ErrorMessage::BacktrackPoint { origin, inner } => {
                origin.hash(state);
                inner.hash(state);
            }
            ErrorMessage::OtherError(value) => value.hash(state),
        }
    }
}

/// An application-defined error payload.
///
/// Implementations decide whether their values can be compared. When
/// [`Payload::try_cmp`] returns `Some` for two values of the same type, the
/// results must form a total order consistent with [`Payload::hash_payload`].
/// Payloads that return `None` when compared with themselves are treated as
/// incomparable and never take part in list equality.
///
/// [`Comparable`] and [`Opaque`] cover the common cases.
pub trait Payload: fmt::Debug + 'static {
    fn as_any(&self) -> &dyn Any;

    /// Compares with another payload of the same concrete type.
    fn try_cmp(&self, other: &dyn Payload) -> Option<Ordering>;

    /// Feeds the comparable part of the payload into `state`.
    fn hash_payload(&self, state: &mut dyn Hasher);
}

/// Payload wrapper for values with a total order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Comparable<T>(pub T);

impl<T> Payload for Comparable<T>
where
    T: Ord + Hash + fmt::Debug + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn try_cmp(&self, other: &dyn Payload) -> Option<Ordering> {
        other
            .as_any()
            .downcast_ref::<Comparable<T>>()
            .map(|other| self.0.cmp(&other.0))
    }

    fn hash_payload(&self, mut state: &mut dyn Hasher) {
        self.0.hash(&mut state);
    }
}

/// Payload wrapper for values that cannot be compared.
#[derive(Debug, Clone)]
pub struct Opaque<T>(pub T);

impl<T> Payload for Opaque<T>
where
    T: fmt::Debug + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn try_cmp(&self, _other: &dyn Payload) -> Option<Ordering> {
        None
    }

    fn hash_payload(&self, _state: &mut dyn Hasher) {}
}

/// Shared handle to a [`Payload`].
#[derive(Debug, Clone)]
pub struct OtherValue(Rc<dyn Payload>);

impl OtherValue {
    pub fn new(payload: impl Payload) -> Self {
        Self(Rc::new(payload))
    }

    pub fn payload(&self) -> &dyn Payload {
        self.0.as_ref()
    }

    /// Downcasts the payload to its concrete wrapper type.
    pub fn downcast_ref<P: Payload>(&self) -> Option<&P> {
        self.0.as_any().downcast_ref::<P>()
    }

    /// A payload is comparable if it compares equal to itself.
    pub fn is_comparable(&self) -> bool {
        self.0.try_cmp(self.0.as_ref()) == Some(Ordering::Equal)
    }

    fn type_id(&self) -> TypeId {
        self.0.as_any().type_id()
    }

    fn address(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for OtherValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OtherValue {}

impl PartialOrd for OtherValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OtherValue {
    /// Orders by payload type, then by the payload's own comparison.
    ///
    /// Incomparable payloads, and comparable ones that refuse to compare with
    /// each other, fall back to identity so the order stays total.
    fn cmp(&self, other: &Self) -> Ordering {
        self.type_id().cmp(&other.type_id()).then_with(|| {
            match (self.is_comparable(), other.is_comparable()) {
                (true, true) => self
                    .0
                    .try_cmp(other.0.as_ref())
                    .unwrap_or_else(|| self.address().cmp(&other.address())),
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (false, false) => self.address().cmp(&other.address()),
            }
        })
    }
}

impl Hash for OtherValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id().hash(state);
        if self.is_comparable() {
            self.0.hash_payload(state);
        } else {
            self.address().hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::hash_map::DefaultHasher, hash::Hash};

    use super::*;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_messages_compare_by_value() {
        let a = ErrorMessage::Expected("digit".into());
        let b = ErrorMessage::Expected(Rc::from("digit"));

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, ErrorMessage::Unexpected("digit".into()));
    }

    #[test]
    fn test_variant_order() {
        let expected = ErrorMessage::Expected("z".into());
        let unexpected = ErrorMessage::Unexpected("a".into());
        let message = ErrorMessage::Message("a".into());

        assert!(expected < unexpected);
        assert!(unexpected < message);
    }

    #[test]
    fn test_empty_labels_are_not_meaningful() {
        assert!(!ErrorMessage::Expected("".into()).is_meaningful());
        assert!(!ErrorMessage::Unexpected("".into()).is_meaningful());
        assert!(!ErrorMessage::Message("".into()).is_meaningful());
        assert!(ErrorMessage::Message(" ".into()).is_meaningful());
    }

    #[test]
    fn test_comparable_payloads() {
        let a = OtherValue::new(Comparable(3u32));
        let b = OtherValue::new(Comparable(3u32));
        let c = OtherValue::new(Comparable(4u32));

        assert!(a.is_comparable());
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert!(a < c);
        assert_eq!(a.downcast_ref::<Comparable<u32>>(), Some(&Comparable(3)));
    }

    #[test]
    fn test_payloads_of_different_types_differ() {
        let number = OtherValue::new(Comparable(1u32));
        let text = OtherValue::new(Comparable("1"));

        assert_ne!(number, text);
        assert!(number.downcast_ref::<Comparable<&str>>().is_none());
    }

    #[test]
    fn test_opaque_payloads_are_incomparable() {
        let a = OtherValue::new(Opaque(vec![1.5f64]));
        let b = OtherValue::new(Opaque(vec![1.5f64]));

        assert!(!a.is_comparable());
        assert!(!ErrorMessage::OtherError(a.clone()).is_meaningful());
        // Identity is the only thing left to order them by.
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_refused_comparison_falls_back_to_identity() {
        // Equal to itself, but refuses to compare with any other value.
        #[derive(Debug)]
        struct SelfOnly(u8);

        impl Payload for SelfOnly {
            fn as_any(&self) -> &dyn Any {
                self
            }

            fn try_cmp(&self, other: &dyn Payload) -> Option<Ordering> {
                other
                    .as_any()
                    .downcast_ref::<SelfOnly>()
                    .filter(|other| std::ptr::eq(*other, self))
                    .map(|_| Ordering::Equal)
            }

            fn hash_payload(&self, mut state: &mut dyn Hasher) {
                self.0.hash(&mut state);
            }
        }

        let a = OtherValue::new(SelfOnly(1));
        let b = OtherValue::new(SelfOnly(2));

        assert!(a.is_comparable());
        assert_eq!(a, a.clone());
        assert_eq!(hash_of(&a), hash_of(&a.clone()));
        assert_ne!(a, b);
        assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }
}
