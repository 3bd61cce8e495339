//! Static evaluation: plain material balance. Kings carry no weight.

use crate::bitboard::BitboardExt;
use crate::board::{Color, Piece, State};

const WEIGHTS: [(Piece, i32); 5] = [
    (Piece::Pawn, 1),
    (Piece::Knight, 3),
    (Piece::Bishop, 3),
    (Piece::Rook, 5),
    (Piece::Queen, 9),
];

/// Weighted piece-count difference from `friendly`'s point of view.
pub fn material_balance(state: &State, friendly: Color) -> f32 {
    let enemy = friendly.opposite();
    let mut value = 0;
    for (piece, weight) in WEIGHTS {
        let own = state.pieces(friendly, piece).count_bits() as i32;
        let theirs = state.pieces(enemy, piece).count_bits() as i32;
        value += weight * (own - theirs);
    }
    value as f32
}
