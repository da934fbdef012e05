//! Tile rotations and rotation sets.
//!
//! A tile may be placed in any of four clockwise quarter-turn orientations.
//! During solving, a placement keeps the *set* of rotations still consistent
//! with neighbor evidence; ambiguity is preserved until forced, so the set
//! type matters as much as the rotation itself.

use bitflags::bitflags;

/// A clockwise quarter-turn rotation applied to a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// No rotation.
    R0,
    /// 90° clockwise.
    R90,
    /// 180°.
    R180,
    /// 270° clockwise.
    R270,
}

impl Rotation {
    /// All rotations in increasing-angle order.
    pub const ALL: [Self; 4] = [Self::R0, Self::R90, Self::R180, Self::R270];

    /// Returns the number of clockwise quarter turns (0-3).
    #[must_use]
    pub const fn quarter_turns(self) -> usize {
        match self {
            Self::R0 => 0,
            Self::R90 => 1,
            Self::R180 => 2,
            Self::R270 => 3,
        }
    }

    const fn flag(self) -> RotationSet {
        match self {
            Self::R0 => RotationSet::R0,
            Self::R90 => RotationSet::R90,
            Self::R180 => RotationSet::R180,
            Self::R270 => RotationSet::R270,
        }
    }
}

bitflags! {
    /// A set of [`Rotation`] values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RotationSet: u8 {
        /// Contains [`Rotation::R0`].
        const R0 = 1;
        /// Contains [`Rotation::R90`].
        const R90 = 1 << 1;
        /// Contains [`Rotation::R180`].
        const R180 = 1 << 2;
        /// Contains [`Rotation::R270`].
        const R270 = 1 << 3;
    }
}

impl RotationSet {
    /// Creates a set containing only `rotation`.
    #[must_use]
    pub const fn singleton(rotation: Rotation) -> Self {
        rotation.flag()
    }

    /// Returns `true` if `rotation` is a member.
    #[must_use]
    pub const fn has(self, rotation: Rotation) -> bool {
        self.contains(rotation.flag())
    }

    /// Returns the number of members.
    #[must_use]
    pub const fn len(self) -> usize {
        self.bits().count_ones() as usize
    }

    /// If the set has exactly one member, returns it.
    #[must_use]
    pub fn as_single(self) -> Option<Rotation> {
        let mut found = None;
        for rotation in self.rotations() {
            if found.is_some() {
                return None;
            }
            found = Some(rotation);
        }
        found
    }

    /// Iterates over members in increasing-angle order.
    pub fn rotations(self) -> impl Iterator<Item = Rotation> {
        Rotation::ALL.into_iter().filter(move |r| self.has(*r))
    }
}

impl From<Rotation> for RotationSet {
    fn from(rotation: Rotation) -> Self {
        rotation.flag()
    }
}

impl FromIterator<Rotation> for RotationSet {
    fn from_iter<T: IntoIterator<Item = Rotation>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, rotation| set | rotation.flag())
    }
}
