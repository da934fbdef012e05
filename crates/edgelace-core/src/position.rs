//! Grid positions and neighbor geometry.

use std::fmt;

use crate::Side;

/// A grid coordinate, `0 <= x, y < side_len`.
///
/// Positions order row-major: `(0, 0)` is the top-left corner, `x` grows
/// rightward, `y` grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    y: u8,
    x: u8,
}

impl Position {
    /// Creates a position from its coordinates.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { y, x }
    }

    /// Returns the x coordinate.
    #[must_use]
    pub const fn x(self) -> u8 {
        self.x
    }

    /// Returns the y coordinate.
    #[must_use]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Returns the row-major index of this position on a `side_len` grid.
    #[must_use]
    pub const fn index(self, side_len: u8) -> usize {
        self.y as usize * side_len as usize + self.x as usize
    }

    /// Converts a row-major index back into a position.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn from_index(index: usize, side_len: u8) -> Self {
        Self::new(
            (index % side_len as usize) as u8,
            (index / side_len as usize) as u8,
        )
    }

    /// Iterates every position of a `side_len` grid in row-major order.
    pub fn grid(side_len: u8) -> impl Iterator<Item = Self> {
        (0..side_len).flat_map(move |y| (0..side_len).map(move |x| Self::new(x, y)))
    }

    /// Returns the neighboring position across `side`, or `None` when that
    /// side faces the outside of the grid.
    #[must_use]
    pub const fn neighbor(self, side: Side, side_len: u8) -> Option<Self> {
        match side {
            Side::Top => {
                if self.y == 0 {
                    None
                } else {
                    Some(Self::new(self.x, self.y - 1))
                }
            }
            Side::Right => {
                if self.x + 1 >= side_len {
                    None
                } else {
                    Some(Self::new(self.x + 1, self.y))
                }
            }
            Side::Bottom => {
                if self.y + 1 >= side_len {
                    None
                } else {
                    Some(Self::new(self.x, self.y + 1))
                }
            }
            Side::Left => {
                if self.x == 0 {
                    None
                } else {
                    Some(Self::new(self.x - 1, self.y))
                }
            }
        }
    }

    /// Returns `true` when `side` of this position faces the outside of the
    /// grid.
    #[must_use]
    pub const fn is_border_side(self, side: Side, side_len: u8) -> bool {
        self.neighbor(side, side_len).is_none()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
