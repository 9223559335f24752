use arrayvec::ArrayVec;

use crate::MotionRejected;

use super::{
    collision::{Collision, classify},
    grid::{BoardCell, ColorId, Grid, Position},
    shape::{Occupancy, RotationDirection, ShapeKind},
};

/// Absolute cells of a piece; a piece never covers more than its 4×4 box.
pub type PieceCells = ArrayVec<BoardCell, { Occupancy::CELLS }>;

/// A falling piece: a shape instance with its own occupancy, a color and a
/// board position.
///
/// The piece keeps a private copy of the shape's occupancy, so rotating or
/// flipping it never touches the catalog. The position is the board
/// coordinate of the occupancy's anchor (bottom-most occupied row, left-most
/// occupied column), which keeps the visible footprint in place when the 4×4
/// box is rotated.
///
/// Plain transforms are unconditional. The `*_if_legal` variants check the
/// result against a grid and undo the transform when it collides.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Collision, ColorId, Grid, Piece, Position, ShapeKind};
///
/// let grid = Grid::new(20, 10).unwrap();
/// let mut piece = Piece::new(ShapeKind::T, ColorId::new(1).unwrap())
///     .with_position(Position::new(0, 5));
///
/// // moving left would leave the grid, so the piece stays where it is
/// assert!(piece.translate_if_legal(&grid, -1, 0).is_err());
/// assert_eq!(piece.position(), Position::new(0, 5));
///
/// piece.drop_to_floor(&grid);
/// assert_eq!(piece.classify(&grid), Collision::NoCollision);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    shape: ShapeKind,
    occupancy: Occupancy,
    color: ColorId,
    position: Position,
}

impl Piece {
    /// Creates a piece in the shape's spawn orientation at [`Position::ORIGIN`].
    #[must_use]
    pub fn new(shape: ShapeKind, color: ColorId) -> Self {
        Self {
            shape,
            occupancy: shape.occupancy(),
            color,
            position: Position::ORIGIN,
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    #[must_use]
    pub fn occupancy(&self) -> Occupancy {
        self.occupancy
    }

    #[must_use]
    pub fn color(&self) -> ColorId {
        self.color
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    /// Iterates over the board coordinates of every occupied cell.
    ///
    /// Cells outside the grid are included.
    pub fn occupied_positions(&self) -> impl Iterator<Item = Position> + use<> {
        let position = self.position;
        self.occupancy
            .anchored_offsets()
            .map(move |(dx, dy)| position.offset(dx, dy))
    }

    /// Returns every occupied cell with the piece's color, including cells
    /// outside the grid.
    #[must_use]
    pub fn occupied_cells(&self) -> PieceCells {
        self.occupied_positions()
            .map(|position| BoardCell {
                position,
                color: self.color,
            })
            .collect()
    }

    /// Returns the occupied cells that lie inside the grid.
    #[must_use]
    pub fn visible_cells(&self, grid: &Grid) -> PieceCells {
        self.occupied_cells()
            .into_iter()
            .filter(|cell| grid.index_of(cell.position.x, cell.position.y).is_some())
            .collect()
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.position = self.position.offset(dx, dy);
    }

    pub fn rotate(&mut self, direction: RotationDirection) {
        self.occupancy = self.occupancy.rotated(direction);
    }

    pub fn rotate_right(&mut self) {
        self.rotate(RotationDirection::Right);
    }

    pub fn rotate_left(&mut self) {
        self.rotate(RotationDirection::Left);
    }

    pub fn flip(&mut self) {
        self.occupancy = self.occupancy.flipped();
    }

    #[must_use]
    pub fn classify(&self, grid: &Grid) -> Collision {
        classify(self, grid)
    }

    /// Classifies the position `(dx, dy)` away without moving the piece.
    #[must_use]
    pub fn probe(&self, grid: &Grid, dx: i32, dy: i32) -> Collision {
        let mut moved = *self;
        moved.translate(dx, dy);
        moved.classify(grid)
    }

    pub fn translate_if_legal(
        &mut self,
        grid: &Grid,
        dx: i32,
        dy: i32,
    ) -> Result<(), MotionRejected> {
        self.translate(dx, dy);
        self.commit_or_revert(grid, |piece| piece.translate(-dx, -dy))
    }

    pub fn rotate_if_legal(
        &mut self,
        grid: &Grid,
        direction: RotationDirection,
    ) -> Result<(), MotionRejected> {
        self.rotate(direction);
        self.commit_or_revert(grid, |piece| piece.rotate(direction.inverse()))
    }

    pub fn flip_if_legal(&mut self, grid: &Grid) -> Result<(), MotionRejected> {
        self.flip();
        self.commit_or_revert(grid, Piece::flip)
    }

    fn commit_or_revert<F>(&mut self, grid: &Grid, revert: F) -> Result<(), MotionRejected>
    where
        F: FnOnce(&mut Self),
    {
        match self.classify(grid) {
            Collision::NoCollision => Ok(()),
            collision => {
                revert(self);
                Err(MotionRejected(collision))
            }
        }
    }

    /// Moves the piece down until the next step would collide.
    ///
    /// Takes at most `grid.rows()` steps and returns how many rows the piece
    /// moved.
    pub fn drop_to_floor(&mut self, grid: &Grid) -> usize {
        let mut dropped = 0;
        for _ in 0..grid.rows() {
            if self.translate_if_legal(grid, 0, 1).is_err() {
                break;
            }
            dropped += 1;
        }
        dropped
    }

    /// Returns a copy of the piece at its landing position.
    #[must_use]
    pub fn dropped(&self, grid: &Grid) -> Self {
        let mut piece = *self;
        piece.drop_to_floor(grid);
        piece
    }
}
