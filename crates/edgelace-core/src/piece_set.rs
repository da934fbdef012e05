//! Persistent candidate-piece sets.
//!
//! [`PieceSet`] is the candidate set stored in every slot constraint: the
//! piece indices still assignable to that slot. Propagation copies boards
//! constantly, so the set is persistent: every mutation returns a new value,
//! and unchanged values share storage with their ancestors. The common case
//! after commitment is a single candidate, which is stored inline without
//! any allocation.
//!
//! # Examples
//!
//! ```
//! use edgelace_core::PieceSet;
//!
//! let all = PieceSet::all(36);
//! let without_seven = all.remove(7);
//!
//! assert_eq!(all.len(), 36);
//! assert_eq!(without_seven.len(), 35);
//! assert!(!without_seven.contains(7));
//!
//! // Removing a non-member shares storage with the original.
//! let same = without_seven.remove(7);
//! assert!(same.ptr_eq(&without_seven));
//! ```

use std::sync::Arc;

const WORD_BITS: usize = 64;

/// A persistent set of candidate piece indices.
///
/// Equality compares contents; [`PieceSet::ptr_eq`] additionally exposes the
/// storage-identity shortcut used by propagation to skip no-op updates.
/// Iteration yields indices in ascending order.
#[derive(Debug, Clone)]
pub struct PieceSet {
    repr: Repr,
}

#[derive(Debug, Clone)]
enum Repr {
    Empty,
    Singleton(u16),
    /// Shared word storage; holds two or more members.
    Words(Arc<[u64]>),
}

impl PieceSet {
    /// Creates the empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self { repr: Repr::Empty }
    }

    /// Creates a set containing only `piece`.
    #[must_use]
    pub const fn singleton(piece: u16) -> Self {
        Self {
            repr: Repr::Singleton(piece),
        }
    }

    /// Creates the set of every piece index below `count`.
    #[must_use]
    pub fn all(count: u16) -> Self {
        match count {
            0 => Self::empty(),
            1 => Self::singleton(0),
            _ => {
                let full_words = count as usize / WORD_BITS;
                let rest = count as usize % WORD_BITS;
                let mut words = vec![u64::MAX; full_words];
                if rest > 0 {
                    words.push((1 << rest) - 1);
                }
                Self {
                    repr: Repr::Words(words.into()),
                }
            }
        }
    }

    /// Returns `true` if `piece` is a member.
    #[must_use]
    pub fn contains(&self, piece: u16) -> bool {
        match &self.repr {
            Repr::Empty => false,
            Repr::Singleton(member) => *member == piece,
            Repr::Words(words) => words
                .get(piece as usize / WORD_BITS)
                .is_some_and(|word| word & (1 << (piece as usize % WORD_BITS)) != 0),
        }
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Empty => 0,
            Repr::Singleton(_) => 1,
            Repr::Words(words) => words.iter().map(|word| word.count_ones() as usize).sum(),
        }
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.repr, Repr::Empty)
    }

    /// If the set has exactly one member, returns it.
    #[must_use]
    pub fn as_single(&self) -> Option<u16> {
        match &self.repr {
            Repr::Singleton(member) => Some(*member),
            Repr::Empty | Repr::Words(_) => None,
        }
    }

    /// Returns a set without `piece`.
    ///
    /// Removing a non-member is a no-op that shares storage with `self`, so
    /// callers can detect it cheaply via [`ptr_eq`](Self::ptr_eq).
    #[must_use]
    pub fn remove(&self, piece: u16) -> Self {
        if !self.contains(piece) {
            return self.clone();
        }
        match &self.repr {
            Repr::Empty => self.clone(),
            Repr::Singleton(_) => Self::empty(),
            Repr::Words(words) => {
                let mut copied: Vec<u64> = words.to_vec();
                copied[piece as usize / WORD_BITS] &= !(1 << (piece as usize % WORD_BITS));
                Self::from_words(copied)
            }
        }
    }

    /// Returns `true` when the two sets share storage (or are both inline
    /// values with the same content). Implies content equality.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Empty, Repr::Empty) => true,
            (Repr::Singleton(a), Repr::Singleton(b)) => a == b,
            (Repr::Words(a), Repr::Words(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Iterates over members in ascending index order.
    #[must_use]
    pub fn iter(&self) -> PieceIter {
        PieceIter {
            state: match &self.repr {
                Repr::Empty => IterState::Done,
                Repr::Singleton(member) => IterState::Single(*member),
                Repr::Words(words) => IterState::Words {
                    words: Arc::clone(words),
                    next_word: 0,
                    current: 0,
                },
            },
        }
    }

    fn from_words(words: Vec<u64>) -> Self {
        let len: usize = words.iter().map(|word| word.count_ones() as usize).sum();
        match len {
            0 => Self::empty(),
            1 => {
                let member = words
                    .iter()
                    .enumerate()
                    .find(|(_, word)| **word != 0)
                    .map_or(0, |(i, word)| i * WORD_BITS + word.trailing_zeros() as usize);
                #[expect(clippy::cast_possible_truncation)]
                let member = member as u16;
                Self::singleton(member)
            }
            _ => Self {
                repr: Repr::Words(words.into()),
            },
        }
    }
}

impl PartialEq for PieceSet {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.len() == other.len() && self.iter().eq(other.iter()))
    }
}

impl Eq for PieceSet {}

impl FromIterator<u16> for PieceSet {
    fn from_iter<T: IntoIterator<Item = u16>>(iter: T) -> Self {
        let mut words: Vec<u64> = Vec::new();
        for piece in iter {
            let index = piece as usize / WORD_BITS;
            if words.len() <= index {
                words.resize(index + 1, 0);
            }
            words[index] |= 1 << (piece as usize % WORD_BITS);
        }
        Self::from_words(words)
    }
}

impl<'a> IntoIterator for &'a PieceSet {
    type Item = u16;
    type IntoIter = PieceIter;

    fn into_iter(self) -> PieceIter {
        self.iter()
    }
}

/// Ascending iterator over [`PieceSet`] members.
#[derive(Debug)]
pub struct PieceIter {
    state: IterState,
}

#[derive(Debug)]
enum IterState {
    Done,
    Single(u16),
    Words {
        words: Arc<[u64]>,
        next_word: usize,
        current: u64,
    },
}

impl Iterator for PieceIter {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        match &mut self.state {
            IterState::Done => None,
            IterState::Single(member) => {
                let member = *member;
                self.state = IterState::Done;
                Some(member)
            }
            IterState::Words {
                words,
                next_word,
                current,
            } => loop {
                if *current != 0 {
                    let bit = current.trailing_zeros() as usize;
                    *current &= *current - 1;
                    #[expect(clippy::cast_possible_truncation)]
                    let member = ((*next_word - 1) * WORD_BITS + bit) as u16;
                    return Some(member);
                }
                if *next_word >= words.len() {
                    self.state = IterState::Done;
                    return None;
                }
                *current = words[*next_word];
                *next_word += 1;
            },
        }
    }
}
