use core::cmp::Ordering;

/// The outcome of comparing two values.
///
/// This is [`Ordering`] extended with a fourth state for values which cannot be ordered
/// relative to each other.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Comparison {
    Less,
    Equal,
    Greater,
    Incomparable,
}

impl Comparison {
    /// Returns the comparison with its operands swapped.
    #[must_use]
    pub const fn reverse(self) -> Comparison {
        match self {
            Comparison::Less => Comparison::Greater,
            Comparison::Greater => Comparison::Less,
            other => other,
        }
    }

    /// Converts the comparison to an [`Ordering`], if the operands were comparable.
    pub const fn ordering(self) -> Option<Ordering> {
        match self {
            Comparison::Less => Some(Ordering::Less),
            Comparison::Equal => Some(Ordering::Equal),
            Comparison::Greater => Some(Ordering::Greater),
            Comparison::Incomparable => None,
        }
    }
}

impl From<Ordering> for Comparison {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Comparison::Less,
            Ordering::Equal => Comparison::Equal,
            Ordering::Greater => Comparison::Greater,
        }
    }
}

impl From<Option<Ordering>> for Comparison {
    fn from(ordering: Option<Ordering>) -> Self {
        ordering.map_or(Comparison::Incomparable, Comparison::from)
    }
}

/// A strategy for ordering the values of an [`OrderedTree`](crate::OrderedTree).
///
/// The strategy is fixed when the tree is constructed. Every comparison point in the tree makes
/// exactly one call to [`compare`](Comparator::compare).
pub trait Comparator<T: ?Sized> {
    /// Compares `a` against `b`.
    fn compare(&self, a: &T, b: &T) -> Comparison;
}

impl<T, F> Comparator<T> for F
where
    T: ?Sized,
    F: Fn(&T, &T) -> Comparison,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Comparison {
        self(a, b)
    }
}

/// Orders values by their [`PartialOrd`] implementation.
///
/// Pairs for which `partial_cmp` returns `None` (e.g. a NaN float) are incomparable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: PartialOrd + ?Sized> Comparator<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Comparison {
        a.partial_cmp(b).into()
    }
}

/// A value with an explicit three-way comparison.
pub trait ThreeWay {
    fn equals(&self, other: &Self) -> bool;

    fn less_than(&self, other: &Self) -> bool;

    fn greater_than(&self, other: &Self) -> bool;
}

/// Orders values by their [`ThreeWay`] implementation.
///
/// The three predicates are collapsed into a single answer. Unless exactly one of them holds, the
/// values are incomparable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Structured;

impl<T: ThreeWay + ?Sized> Comparator<T> for Structured {
    fn compare(&self, a: &T, b: &T) -> Comparison {
        match (a.equals(b), a.less_than(b), a.greater_than(b)) {
            (true, false, false) => Comparison::Equal,
            (false, true, false) => Comparison::Less,
            (false, false, true) => Comparison::Greater,
            _ => Comparison::Incomparable,
        }
    }
}
