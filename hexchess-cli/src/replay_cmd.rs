//! Replay and moves commands - rebuild a game from notation
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_replay(), run_moves() - orchestration
//! - Level 2: rebuild_game(), summarize(), list_moves()
//! - Level 3: print_summary(), print_moves()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use hexchess_core::{GamePhase, GameState, Notation, Outcome, PieceKind, Position, Setup, Side};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ReplayArgs {
    /// Moves in OOFFNNRR[P] notation, oldest first
    #[arg(value_name = "NOTATION")]
    pub moves: Vec<String>,

    /// Start from this setup file instead of the opening array
    #[arg(long, value_name = "FILE")]
    pub setup: Option<PathBuf>,

    /// Output the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct MovesArgs {
    /// Moves in OOFFNNRR[P] notation, oldest first
    #[arg(value_name = "NOTATION")]
    pub moves: Vec<String>,

    /// Start from this setup file instead of the opening array
    #[arg(long, value_name = "FILE")]
    pub setup: Option<PathBuf>,

    /// Output the move list as JSON
    #[arg(long)]
    pub json: bool,
}

/// Where a replayed game ended up
#[derive(Clone, Debug, Serialize)]
pub struct ReplaySummary {
    pub moves: Vec<Notation>,
    pub turn: Side,
    pub ply: u32,
    pub move_number: u32,
    pub in_check: bool,
    pub phase: GamePhase,
    pub outcome: Option<Outcome>,
    pub winner: Option<Side>,
}

/// One entry of the moves listing
#[derive(Clone, Debug, Serialize)]
pub struct MoveEntry {
    pub notation: Notation,
    pub kind: PieceKind,
    pub from: Position,
    pub to: Position,
    pub en_passant: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run replay command
pub fn run_replay(args: ReplayArgs) -> Result<()> {
    let game = rebuild_game(args.setup.as_deref(), &args.moves)?;
    let summary = summarize(&game);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// Run moves command
pub fn run_moves(args: MovesArgs) -> Result<()> {
    let mut game = rebuild_game(args.setup.as_deref(), &args.moves)?;
    let entries = list_moves(&mut game);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print_moves(game.turn(), &entries);
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Replay `moves` from the setup file (or the opening array)
pub fn rebuild_game(setup: Option<&std::path::Path>, moves: &[String]) -> Result<GameState> {
    let mut game = match setup {
        Some(path) => {
            let setup = Setup::load(path)?;
            GameState::from_setup(&setup)
                .with_context(|| format!("setup {} is not playable", path.display()))?
        }
        None => GameState::new(),
    };

    game.load_state(moves).context("replaying move history")?;
    tracing::debug!(moves = moves.len(), ply = game.ply(), "history replayed");
    Ok(game)
}

pub fn summarize(game: &GameState) -> ReplaySummary {
    ReplaySummary {
        moves: game.history().to_vec(),
        turn: game.turn(),
        ply: game.ply(),
        move_number: game.move_number(),
        in_check: game.in_check(),
        phase: game.phase(),
        outcome: game.outcome(),
        winner: game.winner(),
    }
}

/// Legal moves of the side to move, sorted by notation
pub fn list_moves(game: &mut GameState) -> Vec<MoveEntry> {
    let mut entries: Vec<MoveEntry> = game
        .legal_moves()
        .into_iter()
        .filter_map(|mv| {
            let notation = mv.notation()?;
            Some(MoveEntry {
                notation,
                kind: mv.kind,
                from: notation.from,
                to: notation.to,
                en_passant: mv.en_passant.is_some(),
            })
        })
        .collect();
    entries.sort_by_key(|e| e.notation.to_string());
    entries
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn print_summary(summary: &ReplaySummary) {
    println!("Moves played: {}", summary.moves.len());
    for (i, pair) in summary.moves.chunks(2).enumerate() {
        let reply = pair.get(1).map(|n| n.to_string()).unwrap_or_default();
        println!("{:>4}. {}  {}", i + 1, pair[0], reply);
    }
    println!();
    println!("Move number: {}", summary.move_number);
    println!("To move:     {}", side_name(summary.turn));
    println!("In check:    {}", if summary.in_check { "yes" } else { "no" });
    println!("Result:      {}", describe_outcome(summary.outcome, summary.phase));
}

fn print_moves(turn: Side, entries: &[MoveEntry]) {
    println!("{} has {} legal moves", side_name(turn), entries.len());
    for entry in entries {
        let marker = if entry.en_passant { " (e.p.)" } else { "" };
        println!(
            "  {}  {:<6} {} -> {}{}",
            entry.notation, entry.kind, entry.from, entry.to, marker
        );
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn side_name(side: Side) -> &'static str {
    match side {
        Side::White => "White",
        Side::Black => "Black",
    }
}

pub fn describe_outcome(outcome: Option<Outcome>, phase: GamePhase) -> String {
    match (outcome, phase) {
        (Some(Outcome::Checkmate { winner }), _) => format!("checkmate, {} wins", side_name(winner)),
        (Some(Outcome::Stalemate), _) => "stalemate".to_string(),
        (None, GamePhase::PromotionPending) => "promotion pending".to_string(),
        (None, _) => "in progress".to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
