//! Standalone demonstration: read a position, think for a while, print the
//! chosen move and the board before and after.

use outpost::board::{Color, State};
use outpost::engine::Engine;
use outpost::logger::init_logging;
use outpost::square::Square;

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const DEMO_CLOCK_SECONDS: f64 = 60.0;

fn print_usage(program: &str) {
    println!("Usage: {program} [--worst] [FEN string]");
    println!("If no FEN string is provided, uses the standard starting position.");
    println!();
    println!("Options:");
    println!("  --worst    invert the evaluation so the engine picks the worst move");
    println!("  -h, --help print this message");
    println!();
    println!("Example:");
    println!("  {program} \"rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1\"");
}

/// Rank-by-rank board diagram, rank 8 on top.
fn render(state: &State) -> String {
    let mut out = String::new();
    out.push_str("    +------------------------+\n");
    for rank in (0..8).rev() {
        out.push_str(&format!(" {} |", rank + 1));
        for file in 0..8 {
            let sq = Square::from_index(rank * 8 + file);
            let ch = match state.piece_at(sq) {
                Some((color, piece)) => piece.fen_char(color),
                None => '.',
            };
            out.push_str(&format!(" {ch} "));
        }
        out.push_str("|\n");
    }
    out.push_str("    +------------------------+\n");
    out.push_str("      a  b  c  d  e  f  g  h\n");
    out
}

fn main() {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "outpost".into());

    let mut fen = START_FEN.to_string();
    let mut worst_mode = false;

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage(&program);
                return;
            }
            "--worst" => worst_mode = true,
            other => fen = other.to_string(),
        }
    }

    init_logging("logs/outpost.log", "outpost=debug");

    println!("outpost - minimax chess engine");
    println!("==============================");
    println!();
    println!("Initializing from FEN: {fen}");
    println!();

    let mut engine = match Engine::from_fen(&fen) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    engine.set_worst_mode(worst_mode);
    engine.update_timer(DEMO_CLOCK_SECONDS);

    println!("Initial board state:");
    println!("{}", render(engine.state()));

    println!("Computing best move...");
    let Some(action) = engine.choose_move() else {
        println!("No legal moves in this position.");
        return;
    };

    let mover = match action.color() {
        Color::White => "white",
        Color::Black => "black",
    };
    println!();
    println!("Best move for {mover}: {} -> {}", action.from(), action.to());
    if action.is_capture() {
        println!("  (capture)");
    }
    if action.is_en_passant() {
        println!("  (en passant)");
    }
    if let Some(promoted) = action.promotion() {
        println!("  (promotes to {promoted:?})");
    }
    if action.is_queen_side_castle() {
        println!("  (queen-side castle)");
    }
    if action.is_king_side_castle() {
        println!("  (king-side castle)");
    }

    println!();
    println!("Board after move:");
    println!("{}", render(engine.state()));
}
