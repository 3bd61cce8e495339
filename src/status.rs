//! Terminal detection and game-theoretic values. Free functions so the
//! search and the facade share one rule set without pulling movegen into
//! the board module.

use crate::bitboard::BitboardExt;
use crate::board::{Color, Piece, State};
use crate::history::{History, WINDOW};
use crate::moves::execute::{generate_legal, in_check};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Nonterminal,
    Draw,
    /// The side to move has no legal moves and stands in check.
    Loss,
    /// Never produced by `terminal_test` directly; a `Loss` seen from the
    /// other side's perspective.
    Win,
}

/// The bespoke repetition rule: the window holds its full eight states, the
/// first four pairwise equal the last four, and the last eight half-moves
/// contained neither a capture nor a pawn move.
pub fn is_repetition_draw(history: &History) -> bool {
    if history.len() < WINDOW {
        return false;
    }
    for i in 0..WINDOW / 2 {
        if history.state(i) != history.state(i + WINDOW / 2) {
            return false;
        }
    }
    history.moves_since_capture() >= 8 && history.moves_since_pawn_move() >= 8
}

/// K vs K, K vs K+N, or K vs K+B, from either side.
pub fn is_insufficient_material(state: &State) -> bool {
    // Any pawn, rook, or queen on the board means mating material exists.
    let heavy = state.pieces(Color::White, Piece::Pawn)
        | state.pieces(Color::Black, Piece::Pawn)
        | state.pieces(Color::White, Piece::Rook)
        | state.pieces(Color::Black, Piece::Rook)
        | state.pieces(Color::White, Piece::Queen)
        | state.pieces(Color::Black, Piece::Queen);
    if heavy != 0 {
        return false;
    }

    let minors = state.pieces(Color::White, Piece::Knight).count_bits()
        + state.pieces(Color::White, Piece::Bishop).count_bits()
        + state.pieces(Color::Black, Piece::Knight).count_bits()
        + state.pieces(Color::Black, Piece::Bishop).count_bits();
    minors <= 1
}

/// Fifty-move variant: fifty quiet half-moves on the capture clock and
/// strictly more than fifty on the pawn clock.
pub fn is_fifty_move_draw(history: &History) -> bool {
    history.moves_since_capture() >= 50 && history.moves_since_pawn_move() > 50
}

/// Classify the position for the side to move. Check order matters: an
/// empty move list decides the game before any draw rule is consulted.
pub fn terminal_test(state: &State, history: &History) -> Outcome {
    if generate_legal(state).is_empty() {
        if in_check(state, state.side_to_move) {
            return Outcome::Loss;
        }
        return Outcome::Draw;
    }
    if is_repetition_draw(history) {
        return Outcome::Draw;
    }
    if is_insufficient_material(state) {
        return Outcome::Draw;
    }
    if is_fifty_move_draw(history) {
        return Outcome::Draw;
    }
    Outcome::Nonterminal
}

/// Game-theoretic value of a terminal position from `friendly`'s side:
/// +inf for a win, -inf for a loss, 0 for a draw or a nonterminal state.
pub fn utility(state: &State, friendly: Color, history: &History) -> f32 {
    let terminal = terminal_test(state, history);
    let outcome = if state.side_to_move == friendly {
        terminal
    } else {
        match terminal {
            Outcome::Loss => Outcome::Win,
            Outcome::Win => Outcome::Loss,
            other => other,
        }
    };
    match outcome {
        Outcome::Win => f32::INFINITY,
        Outcome::Loss => f32::NEG_INFINITY,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::bit;
    use crate::moves::action::{Action, ActionFields};
    use crate::moves::apply;

    fn history_of(states: &[State]) -> History {
        let mut history = History::new();
        for &s in states {
            history.record_state(s);
        }
        history
    }

    #[test]
    fn start_position_is_nonterminal() {
        let state = State::new();
        let history = history_of(&[state]);
        assert_eq!(terminal_test(&state, &history), Outcome::Nonterminal);
    }

    #[test]
    fn stalemate_is_a_draw() {
        let state: State = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1".parse().unwrap();
        assert!(generate_legal(&state).is_empty());
        assert_eq!(terminal_test(&state, &History::new()), Outcome::Draw);
    }

    #[test]
    fn checkmate_is_a_loss_for_the_side_to_move() {
        // Back-rank mate: the a8 rook covers the whole rank, pawns box the king in.
        let state: State = "R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1".parse().unwrap();
        assert!(generate_legal(&state).is_empty());
        assert!(in_check(&state, Color::Black));
        assert_eq!(terminal_test(&state, &History::new()), Outcome::Loss);
    }

    #[test]
    fn bare_minor_is_insufficient() {
        let kb: State = "4k3/8/8/8/8/8/8/3BK3 w - - 0 1".parse().unwrap();
        assert!(is_insufficient_material(&kb));
        assert_eq!(terminal_test(&kb, &History::new()), Outcome::Draw);

        let kn: State = "4k3/8/8/8/8/8/8/3NK3 w - - 0 1".parse().unwrap();
        assert!(is_insufficient_material(&kn));

        let kk: State = "4k3/8/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        assert!(is_insufficient_material(&kk));
    }

    #[test]
    fn two_minors_are_sufficient() {
        let kbn: State = "4k3/8/8/8/8/8/8/2BNK3 w - - 0 1".parse().unwrap();
        assert!(!is_insufficient_material(&kbn));
        let kb_kn: State = "3nk3/8/8/8/8/8/8/3BK3 w - - 0 1".parse().unwrap();
        assert!(!is_insufficient_material(&kb_kn));
    }

    #[test]
    fn pawn_on_board_is_never_insufficient() {
        let state: State = "4k3/8/8/8/8/8/P7/4K3 w - - 0 1".parse().unwrap();
        assert!(!is_insufficient_material(&state));
    }

    #[test]
    fn utility_signs_follow_the_friendly_color() {
        let mate: State = "R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1".parse().unwrap();
        let history = History::new();
        // Black to move and checkmated: black loses, white wins.
        assert_eq!(utility(&mate, Color::Black, &history), f32::NEG_INFINITY);
        assert_eq!(utility(&mate, Color::White, &history), f32::INFINITY);

        let stalemate: State = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1".parse().unwrap();
        assert_eq!(utility(&stalemate, Color::White, &history), 0.0);
        assert_eq!(utility(&stalemate, Color::Black, &history), 0.0);
    }

    #[test]
    fn repetition_needs_a_full_matching_window() {
        // Two rooks shuffling: build A B A B A B A B in the window.
        let a: State = "r5k1/8/8/8/8/8/8/R5K1 w - - 0 1".parse().unwrap();
        let shuffle = |s: &State, from: u8, to: u8| {
            let action = generate_legal(s)
                .into_iter()
                .find(|m| m.from().index() == from && m.to().index() == to)
                .expect("shuffle move is legal");
            apply(s, action)
        };
        let b = shuffle(&a, 0, 1); // Ra1-b1
        let c = shuffle(&b, 56, 57); // Ra8-b8
        let d = shuffle(&c, 1, 0); // Rb1-a1
        let back = shuffle(&d, 57, 56); // Rb8-a8
        assert_eq!(back, a);

        let mut history = History::new();
        let cycle = [a, b, c, d];
        for _ in 0..2 {
            for s in cycle {
                history.record_state(s);
                // Quiet rook moves keep both counters climbing.
                history.record_action(
                    generate_legal(&s)
                        .into_iter()
                        .find(|m| !m.is_capture() && m.piece() != Piece::Pawn)
                        .unwrap(),
                );
            }
        }
        assert!(is_repetition_draw(&history));
        assert_eq!(terminal_test(&a, &history), Outcome::Draw);

        // Seven states only: not a draw.
        let mut short = History::new();
        for s in [a, b, c, d, a, b, c] {
            short.record_state(s);
        }
        assert!(!is_repetition_draw(&short));
    }

    #[test]
    fn repetition_requires_quiet_counters() {
        let a: State = "r5k1/8/8/8/8/8/8/R5K1 w - - 0 1".parse().unwrap();
        let mut history = History::new();
        for _ in 0..WINDOW {
            history.record_state(a);
        }
        // Window matches, but a recent pawn move spoils it.
        let pawn = Action::new(ActionFields::new(
            Piece::Pawn,
            Color::White,
            bit(12),
            bit(20),
        ));
        history.record_action(pawn);
        assert!(!is_repetition_draw(&history));
    }

    #[test]
    fn fifty_move_rule_is_asymmetric() {
        let mut history = History::new();
        let quiet = Action::new(ActionFields::new(
            Piece::Knight,
            Color::White,
            bit(6),
            bit(21),
        ));
        for _ in 0..50 {
            history.record_action(quiet);
        }
        // 50 on both clocks: pawn clock must be strictly greater than 50.
        assert!(!is_fifty_move_draw(&history));
        history.record_action(quiet);
        assert!(is_fifty_move_draw(&history));
    }
}
