//! Legal move enumeration and the state transition. Legality is enforced by
//! simulating each candidate's occupancy, recomputing the enemy's whole
//! pseudo-legal attack set, and rejecting any move that leaves the mover's
//! king on an attacked square.

use crate::bitboard::{Bitboard, BitboardExt};
use crate::board::{Color, Piece, State};
use crate::moves::action::{Action, ActionFields};
use crate::moves::movegen::{
    all_standard_moves, bishop_moves, castling_targets, en_passant_adjacent,
    en_passant_destination, king_location_after_castling, king_moves, knight_moves, pawn_moves,
    queen_moves, rook_moves,
};

const RANKS_1_AND_8: Bitboard = 0xFF00_0000_0000_00FF;
const RANKS_2_AND_7: Bitboard = 0x00FF_0000_0000_FF00;
const RANKS_4_AND_5: Bitboard = 0x0000_00FF_FF00_0000;

const QUEEN_SIDE_ROOKS_BEFORE: Bitboard = (1 << 0) | (1 << 56); // a1, a8
const QUEEN_SIDE_ROOKS_AFTER: Bitboard = (1 << 3) | (1 << 59); // d1, d8
const KING_SIDE_ROOKS_BEFORE: Bitboard = (1 << 7) | (1 << 63); // h1, h8
const KING_SIDE_ROOKS_AFTER: Bitboard = (1 << 5) | (1 << 61); // f1, f8

const PROMOTION_TARGETS: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

/// How a generator's targets are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveKind {
    Standard,
    EnPassant,
    Castle,
}

struct GenCtx<'a> {
    color: Color,
    friendly: &'a [Bitboard; 6],
    enemy: &'a [Bitboard; 6],
    all_friendly: Bitboard,
    all_enemy: Bitboard,
    ep_target: Bitboard,
    castling: Bitboard,
}

type TargetFn = fn(&GenCtx, Bitboard) -> Bitboard;

fn king_targets(ctx: &GenCtx, piece: Bitboard) -> Bitboard {
    king_moves(piece, ctx.all_friendly)
}

fn knight_targets(ctx: &GenCtx, piece: Bitboard) -> Bitboard {
    knight_moves(piece, ctx.all_friendly)
}

fn rook_targets(ctx: &GenCtx, piece: Bitboard) -> Bitboard {
    rook_moves(piece, ctx.all_friendly, ctx.all_enemy)
}

fn bishop_targets(ctx: &GenCtx, piece: Bitboard) -> Bitboard {
    bishop_moves(piece, ctx.all_friendly, ctx.all_enemy)
}

fn queen_targets(ctx: &GenCtx, piece: Bitboard) -> Bitboard {
    queen_moves(piece, ctx.all_friendly, ctx.all_enemy)
}

fn pawn_targets(ctx: &GenCtx, piece: Bitboard) -> Bitboard {
    pawn_moves(piece, ctx.all_friendly, ctx.all_enemy, ctx.color)
}

fn en_passant_targets(ctx: &GenCtx, piece: Bitboard) -> Bitboard {
    if en_passant_adjacent(ctx.ep_target, piece) != 0 {
        en_passant_destination(ctx.ep_target, ctx.color)
    } else {
        0
    }
}

fn castle_targets(ctx: &GenCtx, piece: Bitboard) -> Bitboard {
    castling_targets(piece, ctx.castling, ctx.all_friendly | ctx.all_enemy)
}

/// One generator per piece kind, plus the two special pawn/rook forms.
static GENERATORS: [(Piece, MoveKind, TargetFn); 8] = [
    (Piece::King, MoveKind::Standard, king_targets),
    (Piece::Knight, MoveKind::Standard, knight_targets),
    (Piece::Rook, MoveKind::Standard, rook_targets),
    (Piece::Bishop, MoveKind::Standard, bishop_targets),
    (Piece::Queen, MoveKind::Standard, queen_targets),
    (Piece::Pawn, MoveKind::Standard, pawn_targets),
    (Piece::Pawn, MoveKind::EnPassant, en_passant_targets),
    (Piece::Rook, MoveKind::Castle, castle_targets),
];

fn find_captured(
    enemy: &[Bitboard; 6],
    all_enemy: Bitboard,
    target: Bitboard,
) -> Option<Piece> {
    if all_enemy & target == 0 {
        return None;
    }
    Piece::ALL
        .into_iter()
        .find(|&piece| enemy[piece as usize] & target != 0)
}

/// Every legal move for the side to move, sorted ascending by the packed
/// encoding. Promotions contribute four entries each.
pub fn generate_legal(state: &State) -> Vec<Action> {
    let color = state.side_to_move;
    let enemy_color = color.opposite();
    let ctx = GenCtx {
        color,
        friendly: state.side_boards(color),
        enemy: state.side_boards(enemy_color),
        all_friendly: state.occupancy(color),
        all_enemy: state.occupancy(enemy_color),
        ep_target: state.ep_target,
        castling: state.castling,
    };

    let mut actions = Vec::with_capacity(64);

    for &(piece, kind, targets_of) in GENERATORS.iter() {
        for piece_board in ctx.friendly[piece as usize].separated() {
            let targets = targets_of(&ctx, piece_board);
            if targets == 0 {
                continue;
            }
            for target in targets.separated() {
                // Occupancies as they would stand after the move.
                let next_friendly = (ctx.all_friendly & !piece_board) | target;
                let next_enemy = ctx.all_enemy & !target;
                let mut enemy_boards = *ctx.enemy;
                for board in enemy_boards.iter_mut() {
                    *board &= next_enemy;
                }

                let enemy_attacks =
                    all_standard_moves(&enemy_boards, next_enemy, next_friendly, enemy_color);

                let king_board = if kind == MoveKind::Castle {
                    king_location_after_castling(target)
                } else if piece == Piece::King {
                    target
                } else {
                    ctx.friendly[Piece::King as usize]
                };

                if enemy_attacks & king_board != 0 {
                    continue;
                }

                let captured = find_captured(ctx.enemy, ctx.all_enemy, target);
                let double_pawn_push = piece == Piece::Pawn
                    && piece_board & RANKS_2_AND_7 != 0
                    && target & RANKS_4_AND_5 != 0;
                let queen_side_castle = kind == MoveKind::Castle
                    && piece_board & QUEEN_SIDE_ROOKS_BEFORE != 0
                    && target & QUEEN_SIDE_ROOKS_AFTER != 0;
                let king_side_castle = kind == MoveKind::Castle
                    && piece_board & KING_SIDE_ROOKS_BEFORE != 0
                    && target & KING_SIDE_ROOKS_AFTER != 0;

                let fields = ActionFields {
                    double_pawn_push,
                    queen_side_castle,
                    king_side_castle,
                    captured,
                    en_passant: kind == MoveKind::EnPassant,
                    ..ActionFields::new(piece, color, piece_board, target)
                };

                if piece == Piece::Pawn && target & RANKS_1_AND_8 != 0 {
                    for promoted in PROMOTION_TARGETS {
                        actions.push(Action::new(ActionFields {
                            promotion: Some(promoted),
                            ..fields
                        }));
                    }
                } else {
                    actions.push(Action::new(fields));
                }
            }
        }
    }

    actions.sort();
    actions
}

/// The position after `action` is played. The input state is not modified;
/// states are small enough that the search copies one per edge.
pub fn apply(state: &State, action: Action) -> State {
    let mut next = *state;
    let color = state.side_to_move;
    let piece = action.piece();
    let from = action.from_board();
    let to = action.to_board();

    {
        let (own, other) = match color {
            Color::White => (&mut next.whites, &mut next.blacks),
            Color::Black => (&mut next.blacks, &mut next.whites),
        };

        if let Some(promoted) = action.promotion() {
            own[Piece::Pawn as usize] &= !from;
            own[promoted as usize] |= to;
        } else {
            own[piece as usize] &= !from;
            own[piece as usize] |= to;
        }

        if let Some(captured) = action.captured() {
            other[captured as usize] &= !to;
        }

        // The en-passant victim does not stand on the destination square.
        if action.is_en_passant() {
            other[Piece::Pawn as usize] &= !state.ep_target;
        }

        // A castle is encoded as the rook's transit; the king follows.
        if action.is_castle() {
            own[Piece::King as usize] = king_location_after_castling(to);
        }
    }

    // Only a rook leaving its origin square clears a castling right.
    if piece == Piece::Rook {
        next.castling &= !from;
    }

    next.ep_target = if action.is_double_pawn_push() { to } else { 0 };
    next.refresh_occupancy();
    next.side_to_move = color.opposite();
    next
}

/// True iff `color`'s king stands on a square the other side's standard
/// moves reach.
pub fn in_check(state: &State, color: Color) -> bool {
    let enemy_color = color.opposite();
    let attacks = all_standard_moves(
        state.side_boards(enemy_color),
        state.occupancy(enemy_color),
        state.occupancy(color),
        enemy_color,
    );
    attacks & state.pieces(color, Piece::King) != 0
}
