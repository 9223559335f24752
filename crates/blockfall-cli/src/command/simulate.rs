use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{Motion, PieceSeed, Round, RoundConfig};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    schema::{report::RoundReport, script::MotionScript},
    util::{self, Output},
};

const PROGRESS_INTERVAL: u64 = 1000;

/// How motions are chosen on each tick.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum Policy {
    /// A random motion with probability `motion-rate`, otherwise none
    #[default]
    Random,
    /// Never request a motion; pieces fall by gravity alone
    Idle,
    /// Hard drop every piece where it spawns
    HardDrop,
}

impl Policy {
    fn choose<R>(self, rng: &mut R, motion_rate: f64) -> Motion
    where
        R: Rng,
    {
        match self {
            Policy::Random if rng.random_bool(motion_rate) => rng.random(),
            Policy::Random | Policy::Idle => Motion::None,
            Policy::HardDrop => Motion::HardDrop,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Round configuration file (JSON format)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of grid rows, overriding the configuration file
    #[arg(long)]
    rows: Option<usize>,
    /// Number of grid columns, overriding the configuration file
    #[arg(long)]
    cols: Option<usize>,
    /// Piece seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Stop after this many ticks even if the round is not over
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,
    /// Motion policy (random, idle or harddrop)
    #[arg(long, default_value = "random")]
    policy: Policy,
    /// Probability of requesting a motion on a tick (random policy)
    #[arg(long, default_value_t = 0.3)]
    motion_rate: f64,
    /// Save the motions played as a replayable script
    #[arg(long)]
    record: Option<PathBuf>,
    /// Output file path for the report
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print the final grid to stderr
    #[arg(long, default_value_t = false)]
    print_board: bool,
}

impl Default for SimulateArg {
    fn default() -> Self {
        Self {
            config: None,
            rows: None,
            cols: None,
            seed: None,
            max_ticks: 100_000,
            policy: Policy::default(),
            motion_rate: 0.3,
            record: None,
            output: None,
            print_board: false,
        }
    }
}

impl SimulateArg {
    fn round_config(&self) -> anyhow::Result<RoundConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_config_file(path)?,
            None => RoundConfig::default(),
        };
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        config
            .validate()
            .context("Invalid round configuration")?;
        Ok(config)
    }
}

/// Seeds the motion source from the piece seed, so one seed reproduces the
/// whole simulation.
fn motion_rng(seed: PieceSeed) -> Pcg32 {
    let bytes = seed.to_bytes();
    let mut tail = [0; 8];
    tail.copy_from_slice(&bytes[8..]);
    Pcg32::seed_from_u64(u64::from_le_bytes(tail))
}

fn simulate(
    config: RoundConfig,
    seed: PieceSeed,
    policy: Policy,
    motion_rate: f64,
    max_ticks: u64,
) -> anyhow::Result<(Round, MotionScript)> {
    let mut round = Round::with_seed(config.clone(), seed)?;
    let mut script = MotionScript::new(seed, config);
    let mut rng = motion_rng(seed);

    while !round.state().is_game_over() && round.ticks() < max_ticks {
        let motion = policy.choose(&mut rng, motion_rate);
        let report = round.step(motion);
        script.push_tick(motion);
        if report.cleared_rows > 0 {
            eprintln!(
                "Tick {}: cleared {} rows (score {})",
                round.ticks(),
                report.cleared_rows,
                round.score()
            );
        }
        if round.ticks() % PROGRESS_INTERVAL == 0 {
            eprintln!(
                "Tick {}: {} pieces locked",
                round.ticks(),
                round.stats().completed_pieces()
            );
        }
    }

    Ok((round, script))
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        config: _,
        rows: _,
        cols: _,
        seed,
        max_ticks,
        policy,
        motion_rate,
        record,
        output,
        print_board,
    } = arg;

    anyhow::ensure!(
        (0.0..=1.0).contains(motion_rate),
        "Motion rate must be between 0 and 1, got {motion_rate}"
    );
    let config = arg.round_config()?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());

    eprintln!(
        "Simulating a {}x{} round with seed {seed} ({policy:?} policy)",
        config.rows, config.cols
    );
    let (round, script) = simulate(config, seed, *policy, *motion_rate, *max_ticks)?;
    eprintln!(
        "Finished after {} ticks: {} (score {}, {} pieces)",
        round.ticks(),
        round.state(),
        round.score(),
        round.stats().completed_pieces()
    );
    if *print_board {
        eprint!("{}", round.grid());
    }

    if let Some(path) = record {
        Output::save_json(&script, Some(path.as_path()))?;
        eprintln!("Recorded {} ticks to {}", script.ticks.len(), path.display());
    }
    Output::save_json(&RoundReport::from_round(&round), output.as_deref())?;
    Ok(())
}
