//! Round orchestration on top of the core data model.
//!
//! - [`Round`] - Tick-driven state machine: gravity, locking, line clears, spawning
//! - [`RoundConfig`] - Grid size, gravity cadence, palette and spawn column
//! - [`Motion`] - Motions the driver can request for the falling piece
//! - [`PieceSpawner`] - Random shape and color selection
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`RoundStats`] - Score and line clear statistics
//!
//! # Round Flow
//!
//! 1. Create a [`Round`] from a [`RoundConfig`] (optionally with a [`PieceSeed`])
//! 2. Each frame, request at most one [`Motion`] and call [`Round::tick`]
//! 3. Query the grid, falling piece and preview cells for rendering
//! 4. Stop once [`Round::state`] reports game over
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{Motion, PieceSeed, Round, RoundConfig};
//!
//! let seed = PieceSeed::from_bytes([1; 16]);
//! let mut round = Round::with_seed(RoundConfig::default(), seed).unwrap();
//!
//! while !round.state().is_game_over() {
//!     round.step(Motion::HardDrop);
//! }
//! println!("score: {}", round.score());
//! ```

pub use self::{config::*, motion::*, piece_spawner::*, round::*, round_stats::*};

mod config;
mod motion;
mod piece_spawner;
mod round;
mod round_stats;
