pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Error returned when a grid dimension is zero or larger than
/// [`Grid::MAX_DIMENSION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("grid dimensions must be in 1..=1024, got {rows} rows x {cols} cols")]
pub struct GridSizeError {
    pub rows: usize,
    pub cols: usize,
}

/// Error returned by a collision-guarded piece operation that was reverted.
///
/// Carries the classification of the rejected position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("motion rejected: {_0}")]
pub struct MotionRejected(#[error(not(source))] pub Collision);

/// Error returned when a [`RoundConfig`] cannot start a round.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("invalid grid: {_0}")]
    InvalidGrid(GridSizeError),
    #[display("gravity interval must be at least one tick")]
    ZeroGravityInterval,
    #[display("color palette must contain at least one color")]
    EmptyPalette,
    #[display("color palette holds at most {max} colors, got {num_colors}")]
    PaletteTooLarge { num_colors: u8, max: u8 },
    #[display("spawn column {column} is outside a grid {cols} columns wide")]
    SpawnColumnOutOfRange { column: usize, cols: usize },
}
