use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

use crate::{Grid, MotionRejected, Piece, RotationDirection};

/// A motion requested by the driver for the falling piece.
///
/// Serialized in kebab case (`"move-left"`, `"hard-drop"`, ...).
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Motion {
    #[default]
    #[display("none")]
    None,
    #[display("move-left")]
    MoveLeft,
    #[display("move-right")]
    MoveRight,
    /// Moves the piece one row down.
    #[display("soft-drop")]
    SoftDrop,
    /// Drops the piece as far as it goes.
    #[display("hard-drop")]
    HardDrop,
    #[display("rotate-left")]
    RotateLeft,
    #[display("rotate-right")]
    RotateRight,
    #[display("flip")]
    Flip,
}

impl Distribution<Motion> for StandardUniform {
    /// Samples one of the motions that act on the piece (never [`Motion::None`]).
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Motion {
        Motion::ACTIVE[rng.random_range(0..Motion::ACTIVE.len())]
    }
}

impl Motion {
    /// Every motion except [`Motion::None`].
    pub const ACTIVE: [Self; 7] = [
        Self::MoveLeft,
        Self::MoveRight,
        Self::SoftDrop,
        Self::HardDrop,
        Self::RotateLeft,
        Self::RotateRight,
        Self::Flip,
    ];

    /// Applies the motion to `piece`, reverting it if the result collides.
    ///
    /// [`Motion::None`] always succeeds. [`Motion::HardDrop`] also always
    /// succeeds, possibly without moving the piece.
    ///
    /// # Example
    ///
    /// ```
    /// use blockfall_engine::{ColorId, Grid, Motion, Piece, Position, ShapeKind};
    ///
    /// let grid = Grid::new(20, 10).unwrap();
    /// let mut piece = Piece::new(ShapeKind::O, ColorId::new(1).unwrap());
    ///
    /// assert!(Motion::MoveLeft.apply(&mut piece, &grid).is_err());
    /// assert_eq!(piece.position(), Position::ORIGIN);
    ///
    /// Motion::MoveRight.apply(&mut piece, &grid).unwrap();
    /// assert_eq!(piece.position(), Position::new(1, 0));
    /// ```
    pub fn apply(self, piece: &mut Piece, grid: &Grid) -> Result<(), MotionRejected> {
        match self {
            Self::None => Ok(()),
            Self::MoveLeft => piece.translate_if_legal(grid, -1, 0),
            Self::MoveRight => piece.translate_if_legal(grid, 1, 0),
            Self::SoftDrop => piece.translate_if_legal(grid, 0, 1),
            Self::HardDrop => {
                piece.drop_to_floor(grid);
                Ok(())
            }
            Self::RotateLeft => piece.rotate_if_legal(grid, RotationDirection::Left),
            Self::RotateRight => piece.rotate_if_legal(grid, RotationDirection::Right),
            Self::Flip => piece.flip_if_legal(grid),
        }
    }
}
