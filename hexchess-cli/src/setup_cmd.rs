//! Setup command - write or validate starting positions
//!
//! `--output FILE` writes the opening array as JSON; `--check FILE` loads a
//! setup and reports whether it is playable.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use hexchess_core::{GameState, PieceKind, Setup, Side};

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct SetupArgs {
    /// Write the standard opening array to this file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Validate the setup in this file
    #[arg(long, value_name = "FILE")]
    pub check: Option<PathBuf>,
}

pub fn run(args: SetupArgs) -> Result<()> {
    if let Some(path) = args.output {
        write_standard(&path)?;
        println!("Wrote standard setup to {}", path.display());
    }

    if let Some(path) = args.check {
        let report = check_setup(&path)?;
        println!("{}", report);
    }

    Ok(())
}

fn write_standard(path: &Path) -> Result<()> {
    Setup::standard().save(path)?;
    tracing::info!(path = %path.display(), "setup written");
    Ok(())
}

/// Load and validate, returning a one-paragraph report
fn check_setup(path: &Path) -> Result<String> {
    let setup = Setup::load(path)?;
    let mut game = GameState::from_setup(&setup)
        .with_context(|| format!("setup {} is not playable", path.display()))?;

    let count = |side: Side| setup.pieces.iter().filter(|p| p.side == side).count();
    let pawns = setup
        .pieces
        .iter()
        .filter(|p| p.kind == PieceKind::Pawn)
        .count();
    let legal = game.legal_moves().len();

    let mut report = format!(
        "{}: {} white and {} black pieces ({} pawns), {:?} to move, {} legal moves",
        setup.name,
        count(Side::White),
        count(Side::Black),
        pawns,
        setup.to_move,
        legal
    );
    if let Some(outcome) = game.outcome() {
        report.push_str(&format!(", already finished ({:?})", outcome));
    }
    Ok(report)
}
