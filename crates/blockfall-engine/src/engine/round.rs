use std::mem;

use rand::Rng as _;
use serde::Serialize;

use crate::{
    BoardCell, Collision, ConfigError, Grid, Motion, Piece, PieceCells, PieceSeed, PieceSpawner,
    RoundConfig, RoundStats, classify_spawn,
};

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum RoundState {
    /// The current piece is under player and gravity control.
    #[default]
    #[display("falling")]
    Falling,
    /// The current piece is being written into the grid.
    ///
    /// Only held while a tick resolves a lock; ticks never end in this state.
    #[display("locking")]
    Locking,
    /// A freshly spawned piece collided. Terminal.
    #[display("game over")]
    GameOver,
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Whether the current piece was locked into the grid.
    pub locked: bool,
    /// Rows cleared by the lock (zero when nothing was locked).
    pub cleared_rows: usize,
    /// State of the round after the tick.
    pub state: RoundState,
}

/// A single round: grid, falling piece, one-piece preview and statistics,
/// advanced one tick at a time by the driver.
///
/// Each tick applies the pending motion, then on the gravity cadence moves
/// the piece one row down. A piece that cannot move down is locked, full rows
/// are cleared, and the preview piece spawns. If it collides at spawn, the
/// round is over and further ticks change nothing.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Motion, Round, RoundConfig};
///
/// let mut round = Round::new(RoundConfig::default()).unwrap();
///
/// round.request_motion(Motion::MoveLeft);
/// round.request_motion(Motion::HardDrop);
/// let report = round.tick();
///
/// assert!(report.locked);
/// assert_eq!(round.stats().completed_pieces(), 1);
/// assert_eq!(round.grid_cells().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Round {
    config: RoundConfig,
    seed: PieceSeed,
    grid: Grid,
    current: Piece,
    preview: Piece,
    spawner: PieceSpawner,
    stats: RoundStats,
    state: RoundState,
    pending_motion: Motion,
    ticks: u64,
    gravity_countdown: u32,
}

impl Round {
    /// Creates a round with a random piece seed.
    pub fn new(config: RoundConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Creates a round whose piece sequence is determined by `seed`.
    pub fn with_seed(config: RoundConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        let (grid, num_colors) = config.validated_parts()?;
        let mut spawner = PieceSpawner::with_seed(seed, num_colors);
        let current = spawner
            .draw_piece()
            .with_position(config.spawn_position());
        let preview = spawner.draw_piece();
        let state = match classify_spawn(&current, &grid) {
            Collision::NoCollision => RoundState::Falling,
            _ => RoundState::GameOver,
        };
        Ok(Self {
            gravity_countdown: config.gravity_interval,
            config,
            seed,
            grid,
            current,
            preview,
            spawner,
            stats: RoundStats::new(),
            state,
            pending_motion: Motion::None,
            ticks: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    #[must_use]
    pub fn state(&self) -> RoundState {
        self.state
    }

    /// Returns the score: total rows cleared.
    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn stats(&self) -> &RoundStats {
        &self.stats
    }

    /// Returns the number of ticks that advanced the round.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.current
    }

    /// Returns the next piece, positioned at the origin.
    #[must_use]
    pub fn preview_piece(&self) -> Piece {
        self.preview
    }

    /// Returns the locked cells of the grid.
    #[must_use]
    pub fn grid_cells(&self) -> Vec<BoardCell> {
        self.grid.snapshot_occupied()
    }

    /// Returns the cells of the falling piece that lie inside the grid.
    #[must_use]
    pub fn falling_cells(&self) -> PieceCells {
        self.current.visible_cells(&self.grid)
    }

    /// Returns the cells of the preview piece relative to its anchor.
    #[must_use]
    pub fn preview_cells(&self) -> PieceCells {
        self.preview.occupied_cells()
    }

    /// Returns the visible cells of the falling piece at its landing position.
    #[must_use]
    pub fn ghost_cells(&self) -> PieceCells {
        self.current.dropped(&self.grid).visible_cells(&self.grid)
    }

    /// Sets the motion applied on the next tick, replacing any earlier
    /// request. Ignored once the round is over.
    pub fn request_motion(&mut self, motion: Motion) {
        if self.state.is_game_over() {
            return;
        }
        self.pending_motion = motion;
    }

    /// Requests `motion` and advances one tick.
    pub fn step(&mut self, motion: Motion) -> TickReport {
        self.request_motion(motion);
        self.tick()
    }

    /// Advances the round by one tick.
    pub fn tick(&mut self) -> TickReport {
        if self.state.is_game_over() {
            return TickReport {
                locked: false,
                cleared_rows: 0,
                state: self.state,
            };
        }

        self.ticks += 1;
        let motion = mem::take(&mut self.pending_motion);
        // rejected motions leave the piece where it was
        motion.apply(&mut self.current, &self.grid).ok();

        let mut settle = motion == Motion::HardDrop;
        self.gravity_countdown = self.gravity_countdown.saturating_sub(1);
        if self.gravity_countdown == 0 {
            self.gravity_countdown = self.config.gravity_interval;
            settle = true;
        }

        let mut report = TickReport {
            locked: false,
            cleared_rows: 0,
            state: self.state,
        };
        if settle && self.current.translate_if_legal(&self.grid, 0, 1).is_err() {
            report.locked = true;
            report.cleared_rows = self.lock();
        }
        report.state = self.state;
        report
    }

    fn lock(&mut self) -> usize {
        self.state = RoundState::Locking;
        self.grid.fill_piece(&self.current);
        let cleared_rows = self.grid.compact_filled_rows();
        self.stats.record_lock(cleared_rows);

        let next = mem::replace(&mut self.preview, self.spawner.draw_piece());
        self.current = next.with_position(self.config.spawn_position());
        self.state = match classify_spawn(&self.current, &self.grid) {
            Collision::NoCollision => RoundState::Falling,
            _ => RoundState::GameOver,
        };
        cleared_rows
    }
}
