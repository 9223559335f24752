use blockfall_engine::{Grid, PieceSeed, Round, RoundConfig, RoundState, RoundStats};
use serde::Serialize;

/// Summary of a finished (or interrupted) round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundReport {
    /// Random seed used for piece generation
    pub seed: PieceSeed,
    pub config: RoundConfig,
    /// Number of ticks the round advanced
    pub ticks: u64,
    pub state: RoundState,
    pub stats: RoundStats,
    /// Final grid, one string per row from top to bottom
    pub grid: Grid,
}

impl RoundReport {
    pub fn from_round(round: &Round) -> Self {
        Self {
            seed: round.seed(),
            config: round.config().clone(),
            ticks: round.ticks(),
            state: round.state(),
            stats: round.stats().clone(),
            grid: round.grid().clone(),
        }
    }
}
