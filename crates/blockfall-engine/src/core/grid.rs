use std::{fmt, num::NonZeroU8, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::GridSizeError;

use super::piece::Piece;

/// Color of a filled cell.
///
/// Color ids are 1-based; blank is represented by [`Cell::Blank`], never by a
/// color id. Mapping ids to actual colors is left to the renderer.
///
/// Ids run from 1 to [`ColorId::MAX_ID`], the largest id a grid cell can be
/// written as in the text form (a single base-36 digit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ColorId(NonZeroU8);

impl ColorId {
    pub const MIN: Self = Self(NonZeroU8::MIN);
    pub const MAX_ID: u8 = 35;

    /// Returns `None` unless `id` is in `1..=MAX_ID`.
    #[must_use]
    pub const fn new(id: u8) -> Option<Self> {
        if id > Self::MAX_ID {
            return None;
        }
        match NonZeroU8::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

/// Error returned when converting an out-of-range integer into a [`ColorId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("color id must be in 1..=35, got {_0}")]
pub struct ColorIdError(#[error(not(source))] pub u8);

impl TryFrom<u8> for ColorId {
    type Error = ColorIdError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id).ok_or(ColorIdError(id))
    }
}

impl From<ColorId> for u8 {
    fn from(color: ColorId) -> Self {
        color.get()
    }
}

/// A single cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Blank,
    Filled(ColorId),
}

impl Cell {
    #[must_use]
    pub fn is_blank(self) -> bool {
        self == Cell::Blank
    }

    #[must_use]
    pub fn color(self) -> Option<ColorId> {
        match self {
            Cell::Blank => None,
            Cell::Filled(color) => Some(color),
        }
    }

    fn to_char(self) -> char {
        match self {
            Cell::Blank => '.',
            Cell::Filled(color) => char::from_digit(u32::from(color.get()), 36)
                .map_or('#', |c| c.to_ascii_uppercase()),
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Blank),
            '#' => Some(Cell::Filled(ColorId::MIN)),
            _ if c.is_ascii_digit() || c.is_ascii_uppercase() => {
                let id = u8::try_from(c.to_digit(36)?).ok()?;
                ColorId::new(id).map(Cell::Filled)
            }
            _ => None,
        }
    }
}

/// Board coordinate.
///
/// `x` grows rightward and `y` grows downward, with `(0, 0)` at the top-left
/// cell of the grid. Coordinates outside the grid are representable so that
/// pieces can sit partially above the board or be classified as out of
/// bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A non-blank cell together with its board position, used for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCell {
    pub position: Position,
    pub color: ColorId,
}

/// Occupancy matrix of the board.
///
/// Cells are stored row-major: the cell at `(x, y)` lives at index
/// `y * cols + x`. The dimensions are fixed for the lifetime of the grid.
///
/// # Example
///
/// ```
/// use blockfall_engine::Grid;
///
/// let mut grid = Grid::from_ascii(
///     "
///     ..
///     1.
///     22
///     ",
/// );
/// assert_eq!(grid.compact_filled_rows(), 1);
/// assert_eq!(grid.to_string(), "..\n..\n1.\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Largest accepted value for either dimension.
    pub const MAX_DIMENSION: usize = 1024;

    /// Creates a blank grid.
    ///
    /// Both dimensions must be in `1..=MAX_DIMENSION`.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridSizeError> {
        let valid = 1..=Self::MAX_DIMENSION;
        if !valid.contains(&rows) || !valid.contains(&cols) {
            return Err(GridSizeError { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::Blank; rows * cols],
        })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the cell at the given linear index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.cell_count()`.
    #[must_use]
    pub fn get(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Overwrites the cell at the given linear index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.cell_count()`.
    pub fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    /// Converts a board coordinate into a linear index, or `None` if the
    /// coordinate lies outside the grid.
    #[must_use]
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.cols)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.rows)?;
        Some(y * self.cols + x)
    }

    /// Converts a linear index back into a board coordinate.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn position_of(&self, index: usize) -> Position {
        debug_assert!(index < self.cells.len());
        // both dimensions are bounded by MAX_DIMENSION, so the casts are lossless
        Position::new((index % self.cols) as i32, (index / self.cols) as i32)
    }

    #[must_use]
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        self.index_of(x, y).map(|i| self.cells[i])
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.cols)
    }

    /// Collects every non-blank cell with its position and color.
    ///
    /// Meant for rendering; the order of the returned cells is unspecified.
    #[must_use]
    pub fn snapshot_occupied(&self) -> Vec<BoardCell> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| {
                cell.color().map(|color| BoardCell {
                    position: self.position_of(i),
                    color,
                })
            })
            .collect()
    }

    /// Writes the piece's cells into the grid as its color.
    ///
    /// Cells outside the grid are discarded.
    pub fn fill_piece(&mut self, piece: &Piece) {
        for cell in piece.occupied_cells() {
            if let Some(index) = self.index_of(cell.position.x, cell.position.y) {
                self.cells[index] = Cell::Filled(cell.color);
            }
        }
    }

    fn is_row_filled(&self, y: usize) -> bool {
        self.cells[y * self.cols..][..self.cols]
            .iter()
            .all(|cell| !cell.is_blank())
    }

    /// Removes every filled row and returns how many were removed.
    ///
    /// A row is filled when none of its cells is blank. Remaining rows shift
    /// down to close the gaps, keeping their relative order, and the vacated
    /// rows at the top become blank.
    pub fn compact_filled_rows(&mut self) -> usize {
        let cols = self.cols;
        let mut cleared = 0;
        for y in (0..self.rows).rev() {
            if self.is_row_filled(y) {
                cleared += 1;
                continue;
            }
            if cleared > 0 {
                let start = y * cols;
                self.cells.copy_within(start..start + cols, (y + cleared) * cols);
            }
        }
        self.cells[..cleared * cols].fill(Cell::Blank);
        cleared
    }

    /// Creates a grid from ASCII art for testing.
    ///
    /// `.` is a blank cell, `#` is color 1, and `1`-`9`/`A`-`Z` are the
    /// corresponding color ids. Whitespace is ignored and blank lines are
    /// skipped.
    ///
    /// # Panics
    ///
    /// Panics if the art does not describe a valid grid.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        art.parse()
            .unwrap_or_else(|e| panic!("invalid grid art: {e}"))
    }

    fn from_rows<I, S>(lines: I) -> Result<Self, GridParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cols = None;
        let mut cells = vec![];
        let mut rows = 0;
        for (y, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            let mut width = 0;
            for (x, c) in line.chars().filter(|c| !c.is_whitespace()).enumerate() {
                let cell = Cell::from_char(c).ok_or(GridParseError::InvalidCell {
                    row: y,
                    col: x,
                    found: c,
                })?;
                cells.push(cell);
                width += 1;
            }
            match cols {
                None => cols = Some(width),
                Some(expected) if expected != width => {
                    return Err(GridParseError::RaggedRow {
                        row: y,
                        expected,
                        found: width,
                    });
                }
                Some(_) => {}
            }
            rows += 1;
        }
        let cols = cols.ok_or(GridParseError::Empty)?;
        let mut grid = Self::new(rows, cols).map_err(GridParseError::Size)?;
        grid.cells = cells;
        Ok(grid)
    }
}

/// Error returned when parsing a grid from its text form.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridParseError {
    #[display("grid has no rows")]
    Empty,
    #[display("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("invalid cell {found:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, found: char },
    #[display("{_0}")]
    Size(GridSizeError),
}

impl FromStr for Grid {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_rows(s.lines().filter(|line| !line.trim().is_empty()))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows_iter() {
            for cell in row {
                write!(f, "{}", cell.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// Serialized as a list of row strings, top to bottom (e.g. `["..", "1."]`).
impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(
            self.rows_iter()
                .map(|row| row.iter().map(|cell| cell.to_char()).collect::<String>()),
        )
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        Self::from_rows(&rows).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(id: u8) -> Cell {
        Cell::Filled(ColorId::new(id).unwrap())
    }

    #[test]
    fn test_new_grid_is_blank() {
        let grid = Grid::new(20, 10).unwrap();
        assert_eq!(grid.rows(), 20);
        assert_eq!(grid.cols(), 10);
        assert_eq!(grid.cell_count(), 200);
        assert!((0..grid.cell_count()).all(|i| grid.get(i).is_blank()));
        assert!(grid.snapshot_occupied().is_empty());
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert_eq!(Grid::new(0, 10), Err(GridSizeError { rows: 0, cols: 10 }));
        assert_eq!(Grid::new(20, 0), Err(GridSizeError { rows: 20, cols: 0 }));
        assert!(Grid::new(Grid::MAX_DIMENSION + 1, 1).is_err());
    }

    #[test]
    fn test_index_conversion() {
        let grid = Grid::new(4, 3).unwrap();
        assert_eq!(grid.index_of(0, 0), Some(0));
        assert_eq!(grid.index_of(2, 1), Some(5));
        assert_eq!(grid.index_of(2, 3), Some(11));
        assert_eq!(grid.index_of(3, 0), None);
        assert_eq!(grid.index_of(-1, 0), None);
        assert_eq!(grid.index_of(0, -1), None);
        assert_eq!(grid.index_of(0, 4), None);

        for i in 0..grid.cell_count() {
            let Position { x, y } = grid.position_of(i);
            assert_eq!(grid.index_of(x, y), Some(i));
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set(3, color(2));
        assert_eq!(grid.get(3), color(2));
        assert_eq!(grid.cell_at(1, 1), Some(color(2)));
        grid.set(3, Cell::Blank);
        assert!(grid.get(3).is_blank());
    }

    #[test]
    fn test_snapshot_occupied() {
        let grid = Grid::from_ascii(
            "
            ...
            .2.
            1.3
            ",
        );
        let mut cells = grid.snapshot_occupied();
        cells.sort_by_key(|c| (c.position.y, c.position.x));
        let cells = cells
            .iter()
            .map(|c| (c.position.x, c.position.y, c.color.get()))
            .collect::<Vec<_>>();
        assert_eq!(cells, [(1, 1, 2), (0, 2, 1), (2, 2, 3)]);
    }

    #[test]
    fn test_fill_piece_discards_cells_outside() {
        let mut grid = Grid::new(3, 4).unwrap();
        let piece = Piece::new(crate::ShapeKind::T, ColorId::new(5).unwrap())
            .with_position(Position::new(1, 0));
        grid.fill_piece(&piece);
        assert_eq!(grid.to_string(), "..5.\n....\n....\n");

        let piece = piece.with_position(Position::new(2, 2));
        grid.fill_piece(&piece);
        assert_eq!(grid.to_string(), "..5.\n..55\n...5\n");
    }

    #[test]
    fn test_compact_no_filled_rows() {
        let mut grid = Grid::from_ascii(
            "
            1..
            .2.
            33.
            ",
        );
        let before = grid.clone();
        assert_eq!(grid.compact_filled_rows(), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_compact_all_rows_filled() {
        let mut grid = Grid::from_ascii(
            "
            12
            34
            ",
        );
        assert_eq!(grid.compact_filled_rows(), 2);
        assert_eq!(grid, Grid::new(2, 2).unwrap());
    }

    #[test]
    fn test_compact_bottom_row_only() {
        let mut grid = Grid::from_ascii(
            "
            1.
            .2
            34
            ",
        );
        assert_eq!(grid.compact_filled_rows(), 1);
        assert_eq!(
            grid,
            Grid::from_ascii(
                "
                ..
                1.
                .2
                ",
            )
        );
    }

    #[test]
    fn test_compact_non_adjacent_rows() {
        let mut grid = Grid::from_ascii(
            "
            1...
            2222
            .3..
            4444
            ..5.
            ",
        );
        assert_eq!(grid.compact_filled_rows(), 2);
        assert_eq!(
            grid,
            Grid::from_ascii(
                "
                ....
                ....
                1...
                .3..
                ..5.
                ",
            )
        );
    }

    #[test]
    fn test_display_and_parse() {
        let art = "..A\n#.1\n";
        let grid: Grid = art.parse().unwrap();
        assert_eq!(grid.cell_at(2, 0), Some(color(10)));
        assert_eq!(grid.cell_at(0, 1), Some(color(1)));
        assert_eq!(grid.to_string(), "..A\n1.1\n");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Grid>(), Err(GridParseError::Empty));
        assert_eq!(
            "..\n...".parse::<Grid>(),
            Err(GridParseError::RaggedRow {
                row: 1,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(
            ".x".parse::<Grid>(),
            Err(GridParseError::InvalidCell {
                row: 0,
                col: 1,
                found: 'x'
            })
        );
        assert!(matches!("0.".parse::<Grid>(), Err(GridParseError::InvalidCell { .. })));
        assert_eq!(
            "a.".parse::<Grid>(),
            Err(GridParseError::InvalidCell {
                row: 0,
                col: 0,
                found: 'a'
            })
        );
    }

    #[test]
    fn test_color_id_bounds() {
        assert_eq!(ColorId::new(0), None);
        assert_eq!(ColorId::new(ColorId::MAX_ID + 1), None);
        assert_eq!(ColorId::try_from(36), Err(ColorIdError(36)));

        let mut grid = Grid::new(1, 2).unwrap();
        grid.set(0, color(ColorId::MAX_ID));
        grid.set(1, color(1));
        assert_eq!(grid.to_string(), "Z1\n");
        assert_eq!(grid.to_string().parse::<Grid>(), Ok(grid.clone()));

        let json = serde_json::to_string(&ColorId::new(35)).unwrap();
        assert_eq!(json, "35");
        assert_eq!(serde_json::from_str::<ColorId>(&json).ok(), ColorId::new(35));
        assert!(serde_json::from_str::<ColorId>("36").is_err());
        assert!(serde_json::from_str::<ColorId>("0").is_err());
    }

    #[test]
    fn test_grid_serialization() {
        let grid = Grid::from_ascii(
            "
            ..
            1.
            24
            ",
        );
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(json, r#"["..","1.","24"]"#);

        let deserialized: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, grid);

        let err = serde_json::from_str::<Grid>(r#"["..","..."]"#).unwrap_err();
        assert!(err.to_string().contains("row 1 has 3 cells"));
        assert!(serde_json::from_str::<Grid>("[]").is_err());
    }
}
