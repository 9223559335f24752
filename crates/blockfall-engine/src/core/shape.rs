use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Occupancy of a 4×4 bounding box.
///
/// Bit `i` is set when cell `i` of the box is filled, where cell `i` lies at
/// row `i / 4` and column `i % 4` (row 0 at the top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Occupancy(u16);

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    /// Clockwise.
    Right,
    /// Counterclockwise.
    Left,
}

impl RotationDirection {
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            RotationDirection::Right => RotationDirection::Left,
            RotationDirection::Left => RotationDirection::Right,
        }
    }
}

/// Source cell for each destination cell: `new[i] = old[TABLE[i]]`.
type Permutation = [u8; Occupancy::CELLS];

const ROTATE_RIGHT: Permutation = [12, 8, 4, 0, 13, 9, 5, 1, 14, 10, 6, 2, 15, 11, 7, 3];
const ROTATE_LEFT: Permutation = [3, 7, 11, 15, 2, 6, 10, 14, 1, 5, 9, 13, 0, 4, 8, 12];
const FLIP_HORIZONTAL: Permutation = [3, 2, 1, 0, 7, 6, 5, 4, 11, 10, 9, 8, 15, 14, 13, 12];

impl Occupancy {
    /// Number of cells in the bounding box.
    pub const CELLS: usize = 16;
    pub const SIDE: usize = 4;
    pub const EMPTY: Self = Self(0);

    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Builds an occupancy from rows of cells, top to bottom.
    #[must_use]
    pub const fn from_rows(rows: [[bool; 4]; 4]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < Self::CELLS {
            if rows[i / Self::SIDE][i % Self::SIDE] {
                bits |= 1 << i;
            }
            i += 1;
        }
        Self(bits)
    }

    #[must_use]
    pub const fn is_occupied(self, index: usize) -> bool {
        self.0 & (1 << index) != 0
    }

    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    const fn permuted(self, table: &Permutation) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < Self::CELLS {
            if self.is_occupied(table[i] as usize) {
                bits |= 1 << i;
            }
            i += 1;
        }
        Self(bits)
    }

    #[must_use]
    pub const fn rotated(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Right => self.permuted(&ROTATE_RIGHT),
            RotationDirection::Left => self.permuted(&ROTATE_LEFT),
        }
    }

    /// Mirrors the box left to right.
    #[must_use]
    pub const fn flipped(self) -> Self {
        self.permuted(&FLIP_HORIZONTAL)
    }

    /// Iterates over the `(col, row)` of every occupied cell in the box.
    pub fn occupied_cells(self) -> impl Iterator<Item = (usize, usize)> {
        (0..Self::CELLS)
            .filter(move |&i| self.is_occupied(i))
            .map(|i| (i % Self::SIDE, i / Self::SIDE))
    }

    /// Returns the `(col, row)` reference cell of the occupancy: the left-most
    /// occupied column and the bottom-most occupied row.
    ///
    /// The cell itself need not be occupied. Returns `None` for an empty box.
    #[must_use]
    pub fn anchor(self) -> Option<(usize, usize)> {
        let col = self.occupied_cells().map(|(col, _)| col).min()?;
        let row = self.occupied_cells().map(|(_, row)| row).max()?;
        Some((col, row))
    }

    /// Iterates over occupied cells as offsets from the anchor.
    ///
    /// Offsets are never positive in `y` and never negative in `x`.
    pub fn anchored_offsets(self) -> impl Iterator<Item = (i32, i32)> {
        let (anchor_col, anchor_row) = self.anchor().unwrap_or_default();
        self.occupied_cells()
            .map(move |(col, row)| (offset(col, anchor_col), offset(row, anchor_row)))
    }
}

#[expect(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
fn offset(value: usize, origin: usize) -> i32 {
    // both are in 0..4
    value as i32 - origin as i32
}

/// Piece shapes available to the spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ShapeKind {
    /// 2×2 square.
    O = 0,
    /// Straight line of four.
    I = 1,
    /// Z skew.
    Z = 2,
    /// J hook.
    J = 3,
    /// T junction.
    T = 4,
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl ShapeKind {
    /// Number of shapes in the catalog.
    pub const LEN: usize = 5;
    pub const ALL: [Self; Self::LEN] = [
        ShapeKind::O,
        ShapeKind::I,
        ShapeKind::Z,
        ShapeKind::J,
        ShapeKind::T,
    ];

    /// Returns the spawn orientation of the shape.
    #[must_use]
    pub const fn occupancy(self) -> Occupancy {
        SHAPES[self as usize]
    }

    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::J.as_char(), 'J');
    /// assert_eq!(ShapeKind::from_char('J'), Some(ShapeKind::J));
    /// assert_eq!(ShapeKind::from_char('S'), None);
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::O => 'O',
            ShapeKind::I => 'I',
            ShapeKind::Z => 'Z',
            ShapeKind::J => 'J',
            ShapeKind::T => 'T',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'O' => Some(ShapeKind::O),
            'I' => Some(ShapeKind::I),
            'Z' => Some(ShapeKind::Z),
            'J' => Some(ShapeKind::J),
            'T' => Some(ShapeKind::T),
            _ => None,
        }
    }
}

const SHAPES: [Occupancy; ShapeKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // O
        Occupancy::from_rows([[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // I
        Occupancy::from_rows([[C, C, C, C], EEEE, EEEE, EEEE]),
        // Z
        Occupancy::from_rows([[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
        // J
        Occupancy::from_rows([[C, C, E, E], [C, E, E, E], [C, E, E, E], EEEE]),
        // T
        Occupancy::from_rows([[C, C, C, E], [E, C, E, E], EEEE, EEEE]),
    ]
};
