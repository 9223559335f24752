use super::{grid::Grid, piece::Piece};

/// Classification of a piece's position against a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Collision {
    #[display("no collision")]
    NoCollision,
    /// A cell lies left or right of the grid, or below its last row.
    #[display("out of bounds")]
    OutOfBounds,
    /// A cell overlaps a filled grid cell.
    #[display("blocked by brick")]
    BlockedByBrick,
    /// A freshly spawned piece already collides.
    #[display("game over")]
    GameOver,
}

/// Classifies the piece's current position against the grid.
///
/// Cells above the grid (negative `y`) are allowed, so pieces may spawn or
/// rest partially above the visible board. When several cells collide,
/// [`Collision::OutOfBounds`] wins over [`Collision::BlockedByBrick`].
///
/// # Example
///
/// ```
/// use blockfall_engine::{classify, Collision, ColorId, Grid, Piece, Position, ShapeKind};
///
/// let grid = Grid::new(4, 4).unwrap();
/// let color = ColorId::new(1).unwrap();
/// let piece = Piece::new(ShapeKind::O, color).with_position(Position::new(0, 0));
/// assert_eq!(classify(&piece, &grid), Collision::NoCollision);
///
/// let piece = piece.with_position(Position::new(-1, 0));
/// assert_eq!(classify(&piece, &grid), Collision::OutOfBounds);
/// ```
#[must_use]
pub fn classify(piece: &Piece, grid: &Grid) -> Collision {
    let mut blocked = false;
    for position in piece.occupied_positions() {
        let x_in_range = usize::try_from(position.x).is_ok_and(|x| x < grid.cols());
        let below_floor = usize::try_from(position.y).is_ok_and(|y| y >= grid.rows());
        if !x_in_range || below_floor {
            return Collision::OutOfBounds;
        }
        if grid
            .cell_at(position.x, position.y)
            .is_some_and(|cell| !cell.is_blank())
        {
            blocked = true;
        }
    }
    if blocked {
        Collision::BlockedByBrick
    } else {
        Collision::NoCollision
    }
}

/// Classifies a piece that has just been placed at its spawn position.
///
/// Any collision at spawn ends the round, so everything other than
/// [`Collision::NoCollision`] is reported as [`Collision::GameOver`].
#[must_use]
pub fn classify_spawn(piece: &Piece, grid: &Grid) -> Collision {
    match classify(piece, grid) {
        Collision::NoCollision => Collision::NoCollision,
        _ => Collision::GameOver,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColorId, Position, RotationDirection, ShapeKind};

    fn piece(kind: ShapeKind, x: i32, y: i32) -> Piece {
        Piece::new(kind, ColorId::new(3).unwrap()).with_position(Position::new(x, y))
    }

    #[test]
    fn test_empty_grid_in_bounds() {
        let grid = Grid::new(20, 10).unwrap();
        assert_eq!(classify(&piece(ShapeKind::I, 0, 19), &grid), Collision::NoCollision);
        assert_eq!(classify(&piece(ShapeKind::I, 6, 0), &grid), Collision::NoCollision);
    }

    #[test]
    fn test_out_of_bounds_sides_and_floor() {
        let grid = Grid::new(20, 10).unwrap();
        assert_eq!(classify(&piece(ShapeKind::I, -1, 5), &grid), Collision::OutOfBounds);
        assert_eq!(classify(&piece(ShapeKind::I, 7, 5), &grid), Collision::OutOfBounds);
        assert_eq!(classify(&piece(ShapeKind::O, 3, 20), &grid), Collision::OutOfBounds);
    }

    #[test]
    fn test_cells_above_grid_are_allowed() {
        let grid = Grid::new(20, 10).unwrap();
        let mut vertical = piece(ShapeKind::I, 4, 0);
        vertical.rotate(RotationDirection::Right);
        // three of the four cells are above row 0
        assert_eq!(classify(&vertical, &grid), Collision::NoCollision);
        let vertical = vertical.with_position(Position::new(4, -10));
        assert_eq!(classify(&vertical, &grid), Collision::NoCollision);
    }

    #[test]
    fn test_blocked_by_brick() {
        let grid = Grid::from_ascii(
            "
            ....
            ....
            .1..
            ",
        );
        assert_eq!(classify(&piece(ShapeKind::O, 0, 2), &grid), Collision::BlockedByBrick);
        assert_eq!(classify(&piece(ShapeKind::O, 2, 2), &grid), Collision::NoCollision);
        assert_eq!(classify(&piece(ShapeKind::O, 1, 1), &grid), Collision::NoCollision);
    }

    #[test]
    fn test_out_of_bounds_takes_precedence() {
        let grid = Grid::from_ascii(
            "
            ....
            1...
            ",
        );
        // overlaps the brick at (0, 1) and sticks out below the floor
        let mut vertical = piece(ShapeKind::I, 0, 2);
        vertical.rotate(RotationDirection::Left);
        assert_eq!(classify(&vertical, &grid), Collision::OutOfBounds);
        assert_eq!(classify(&piece(ShapeKind::I, 0, 1), &grid), Collision::BlockedByBrick);
        // clear of the brick but sticks out to the right
        assert_eq!(classify(&piece(ShapeKind::I, 1, 1), &grid), Collision::OutOfBounds);
    }

    #[test]
    fn test_classify_spawn() {
        let grid = Grid::from_ascii(
            "
            ....
            .1..
            ",
        );
        assert_eq!(classify_spawn(&piece(ShapeKind::O, 2, 1), &grid), Collision::NoCollision);
        assert_eq!(classify_spawn(&piece(ShapeKind::O, 0, 1), &grid), Collision::GameOver);
        assert_eq!(classify_spawn(&piece(ShapeKind::O, 3, 1), &grid), Collision::GameOver);
    }
}
