use std::path::PathBuf;

use anyhow::Context as _;

use crate::{
    schema::report::RoundReport,
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Path to the motion script (JSON format)
    script_file: PathBuf,
    /// Output file path for the report
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print the final grid to stderr
    #[arg(long, default_value_t = false)]
    print_board: bool,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let ReplayArg {
        script_file,
        output,
        print_board,
    } = arg;

    eprintln!("Loading script from {}", script_file.display());
    let script = util::read_script_file(script_file)?;
    eprintln!(
        "Loaded {} ticks (seed {})",
        script.ticks.len(),
        script.seed
    );

    let round = script
        .play()
        .with_context(|| format!("Invalid round configuration in {}", script_file.display()))?;
    eprintln!(
        "Replayed {} ticks: {} (score {})",
        round.ticks(),
        round.state(),
        round.score()
    );
    if *print_board {
        eprint!("{}", round.grid());
    }

    Output::save_json(&RoundReport::from_round(&round), output.as_deref())?;
    Ok(())
}
