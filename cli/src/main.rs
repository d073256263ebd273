use anyhow::{Context, Result};
use clap::Parser;
use demineur_core::{CellCount, Coord, Game, GameConfig, RevealOutcome};
use std::io::{self, BufRead, Write};

use command::Command;

mod command;

#[derive(Parser, Debug)]
#[command(version, about = "Play Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Number of rows, from 3 to 19
    #[arg(short, long, default_value_t = 5)]
    rows: Coord,

    /// Number of columns, from 3 to 19
    #[arg(short, long, default_value_t = 5)]
    cols: Coord,

    /// Number of mines, at least 1 and at most rows * cols
    #[arg(short, long, default_value_t = 5)]
    mines: CellCount,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

/// Seed drawn from the thread-local generator, itself seeded by the OS.
fn random_seed() -> u64 {
    use rand::prelude::*;
    rand::rng().random()
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = GameConfig::new(args.rows, args.cols, args.mines)
        .context("rows and columns must be between 3 and 19, mines between 1 and rows * cols")?;
    let seed = args.seed.unwrap_or_else(random_seed);
    log::debug!("seed: {}", seed);

    let mut game = Game::from_config(&config, seed)?;
    play(&mut game, io::stdin().lock(), io::stdout().lock())
}

fn play(game: &mut Game, input: impl BufRead, mut out: impl Write) -> Result<()> {
    writeln!(out, "{}", game.board().current_view())?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        match Command::parse(&line) {
            Ok(Command::Quit) => return Ok(()),
            Ok(Command::Solution) => writeln!(out, "{}", game.board().solution_view())?,
            Ok(Command::Flag(coords)) => match game.toggle_flag(coords) {
                Ok(_) => writeln!(out, "{}", game.board().current_view())?,
                Err(err) => writeln!(out, "{err}")?,
            },
            Ok(Command::Reveal(coords)) => match game.reveal(coords) {
                Ok(RevealOutcome::HitMine) => {
                    writeln!(out, "{}", game.board().solution_view())?;
                    writeln!(out, "Boom! Mine at {coords:?} after {} turns.", game.turns())?;
                    return Ok(());
                }
                Ok(RevealOutcome::Won) => {
                    writeln!(out, "{}", game.board().solution_view())?;
                    writeln!(
                        out,
                        "You win in {} turns, score: {}",
                        game.turns(),
                        game.score().unwrap_or_default()
                    )?;
                    return Ok(());
                }
                Ok(RevealOutcome::NoChange) => writeln!(out, "Nothing to reveal at {coords:?}")?,
                Ok(RevealOutcome::Revealed) => writeln!(out, "{}", game.board().current_view())?,
                Err(err) => writeln!(out, "{err}")?,
            },
            Err(err) => writeln!(out, "{err:#}")?,
        }
        write!(out, "Turn {} > ", game.turns() + 1)?;
        out.flush()?;
    }

    Ok(())
}
