//! Edge patterns and pattern sets.
//!
//! Every tile edge carries a [`Pattern`]: a small integer identifying the
//! motif printed on that edge. Two edges match when they carry the same
//! pattern. The reserved value [`Pattern::BORDER`] marks edges that face the
//! outside of the grid; it never appears between two adjacent tiles.
//!
//! [`PatternSet`] is a compact set of patterns used to describe which
//! patterns a slot side still admits.
//!
//! # Examples
//!
//! ```
//! use edgelace_core::{Pattern, PatternSet};
//!
//! let mut allowed = PatternSet::EMPTY;
//! allowed.insert(Pattern::new(3));
//! allowed.insert(Pattern::new(7));
//!
//! assert_eq!(allowed.len(), 2);
//! assert!(allowed.contains(Pattern::new(3)));
//! assert!(!allowed.contains(Pattern::BORDER));
//! ```

use std::fmt;

/// The number of distinct pattern identifiers supported, including the
/// border sentinel.
pub const PATTERN_LIMIT: u8 = 64;

/// An edge-pattern identifier.
///
/// Pattern `0` is the reserved [`border sentinel`](Pattern::BORDER); real
/// motifs use `1..64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pattern(u8);

impl Pattern {
    /// The sentinel pattern marking an outward-facing border edge.
    pub const BORDER: Self = Self(0);

    /// Creates a pattern from its identifier.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not below [`PATTERN_LIMIT`].
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!(id < PATTERN_LIMIT, "pattern id out of range");
        Self(id)
    }

    /// Returns the numeric identifier.
    #[must_use]
    pub const fn id(self) -> u8 {
        self.0
    }

    /// Returns `true` for the border sentinel.
    #[must_use]
    pub const fn is_border(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_border() {
            write!(f, "~")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A set of [`Pattern`] values, stored as a 64-bit mask.
///
/// `PatternSet` is a cheap `Copy` value; equality compares contents.
/// Iteration yields patterns in ascending identifier order.
///
/// # Examples
///
/// ```
/// use edgelace_core::{Pattern, PatternSet};
///
/// let a = PatternSet::from_iter([Pattern::new(1), Pattern::new(2)]);
/// let b = PatternSet::from_iter([Pattern::new(2), Pattern::new(3)]);
///
/// assert_eq!((a & b).len(), 1);
/// assert_eq!((a | b).len(), 3);
/// assert!(a.intersection(b).contains(Pattern::new(2)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternSet(u64);

impl PatternSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// The set containing every representable pattern, border included.
    pub const FULL: Self = Self(u64::MAX);

    /// Creates a set containing only `pattern`.
    #[must_use]
    pub const fn singleton(pattern: Pattern) -> Self {
        Self(1 << pattern.id())
    }

    /// Adds a pattern to the set.
    pub const fn insert(&mut self, pattern: Pattern) {
        self.0 |= 1 << pattern.id();
    }

    /// Removes a pattern from the set.
    pub const fn remove(&mut self, pattern: Pattern) {
        self.0 &= !(1 << pattern.id());
    }

    /// Returns `true` if `pattern` is a member.
    #[must_use]
    pub const fn contains(self, pattern: Pattern) -> bool {
        self.0 & (1 << pattern.id()) != 0
    }

    /// Returns the number of members.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the union of the two sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns the intersection of the two sets.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Returns `true` if every member of `self` is a member of `other`.
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// Iterates over members in ascending identifier order.
    pub fn iter(self) -> impl Iterator<Item = Pattern> {
        (0..PATTERN_LIMIT)
            .filter(move |id| self.0 & (1 << id) != 0)
            .map(Pattern::new)
    }
}

impl std::ops::BitAnd for PatternSet {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl std::ops::BitOr for PatternSet {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for PatternSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAndAssign for PatternSet {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl FromIterator<Pattern> for PatternSet {
    fn from_iter<T: IntoIterator<Item = Pattern>>(iter: T) -> Self {
        let mut set = Self::EMPTY;
        for pattern in iter {
            set.insert(pattern);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_border_sentinel() {
        assert!(Pattern::BORDER.is_border());
        assert!(!Pattern::new(1).is_border());
        assert_eq!(Pattern::BORDER.id(), 0);
    }

    #[test]
    fn test_insert_remove_contains() {
        let mut set = PatternSet::EMPTY;
        set.insert(Pattern::new(5));
        assert!(set.contains(Pattern::new(5)));
        set.remove(Pattern::new(5));
        assert!(!set.contains(Pattern::new(5)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_iteration_order() {
        let set = PatternSet::from_iter([Pattern::new(9), Pattern::new(1), Pattern::new(4)]);
        let ids: Vec<_> = set.iter().map(Pattern::id).collect();
        assert_eq!(ids, vec![1, 4, 9]);
    }

    #[test]
    fn test_subset() {
        let a = PatternSet::from_iter([Pattern::new(1), Pattern::new(2)]);
        let b = PatternSet::from_iter([Pattern::new(1), Pattern::new(2), Pattern::new(3)]);
        assert!(a.is_subset(b));
        assert!(!b.is_subset(a));
        assert!(PatternSet::EMPTY.is_subset(a));
    }

    proptest! {
        #[test]
        fn prop_union_contains_both(xs in prop::collection::vec(0u8..64, 0..10),
                                    ys in prop::collection::vec(0u8..64, 0..10)) {
            let a: PatternSet = xs.iter().copied().map(Pattern::new).collect();
            let b: PatternSet = ys.iter().copied().map(Pattern::new).collect();
            let u = a | b;
            for &x in &xs {
                prop_assert!(u.contains(Pattern::new(x)));
            }
            for &y in &ys {
                prop_assert!(u.contains(Pattern::new(y)));
            }
            prop_assert!(a.is_subset(u) && b.is_subset(u));
        }

        #[test]
        fn prop_intersection_is_subset(xs in prop::collection::vec(0u8..64, 0..10),
                                       ys in prop::collection::vec(0u8..64, 0..10)) {
            let a: PatternSet = xs.iter().copied().map(Pattern::new).collect();
            let b: PatternSet = ys.iter().copied().map(Pattern::new).collect();
            let i = a & b;
            prop_assert!(i.is_subset(a) && i.is_subset(b));
            for p in i.iter() {
                prop_assert!(a.contains(p) && b.contains(p));
            }
        }
    }
}
