use std::num::NonZeroU8;

use serde::{Deserialize, Serialize};

use crate::{ColorId, ConfigError, Grid, GridSizeError, Position};

/// Settings fixed for the lifetime of a round.
///
/// Missing fields take their default value when deserialized, so `{}` is a
/// valid configuration.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Position, RoundConfig};
///
/// let config = RoundConfig {
///     rows: 12,
///     cols: 6,
///     ..RoundConfig::default()
/// };
/// config.validate().unwrap();
/// assert_eq!(config.spawn_position(), Position::new(2, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoundConfig {
    /// Grid height, at most [`Grid::MAX_DIMENSION`].
    pub rows: usize,
    /// Grid width, at most [`Grid::MAX_DIMENSION`].
    pub cols: usize,
    /// Ticks between two gravity steps.
    pub gravity_interval: u32,
    /// Number of colors pieces are drawn from (ids `1..=num_colors`), at most
    /// [`ColorId::MAX_ID`].
    pub num_colors: u8,
    /// Column pieces spawn at. Defaults to the centre column.
    pub spawn_column: Option<usize>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 10,
            gravity_interval: 20,
            num_colors: 4,
            spawn_column: None,
        }
    }
}

impl RoundConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validated_parts().map(|_| ())
    }

    /// Checks the configuration and returns the pieces a round is built from.
    pub(crate) fn validated_parts(&self) -> Result<(Grid, NonZeroU8), ConfigError> {
        let grid = Grid::new(self.rows, self.cols)?;
        if self.gravity_interval == 0 {
            return Err(ConfigError::ZeroGravityInterval);
        }
        let num_colors = NonZeroU8::new(self.num_colors).ok_or(ConfigError::EmptyPalette)?;
        if num_colors.get() > ColorId::MAX_ID {
            return Err(ConfigError::PaletteTooLarge {
                num_colors: num_colors.get(),
                max: ColorId::MAX_ID,
            });
        }
        if let Some(column) = self.spawn_column
            && column >= self.cols
        {
            return Err(ConfigError::SpawnColumnOutOfRange {
                column,
                cols: self.cols,
            });
        }
        Ok((grid, num_colors))
    }

    /// Returns where freshly spawned pieces are anchored.
    ///
    /// The anchor is the bottom-left cell of the piece, so spawned pieces
    /// start with their lowest row on row 0 and the rest above the grid.
    #[must_use]
    pub fn spawn_position(&self) -> Position {
        let column = self
            .spawn_column
            .unwrap_or(self.cols.saturating_sub(1) / 2)
            .min(Grid::MAX_DIMENSION);
        Position::new(i32::try_from(column).unwrap_or(i32::MAX), 0)
    }
}

impl From<GridSizeError> for ConfigError {
    fn from(err: GridSizeError) -> Self {
        Self::InvalidGrid(err)
    }
}
