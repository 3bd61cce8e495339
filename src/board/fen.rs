//! FEN parsing: builds a fully populated `State` from a Forsyth-Edwards
//! Notation string, plus the two clock fields the engine facade needs.

use thiserror::Error;

use crate::bitboard::{bit, Bitboard, BitboardExt};
use crate::board::{Color, Piece, State, CASTLE_BK, CASTLE_BQ, CASTLE_WK, CASTLE_WQ};
use crate::square::Square;

#[derive(Debug, Error)]
pub enum FenError {
    #[error("malformed FEN: {0}")]
    Malformed(String),
    #[error("illegal position: {0}")]
    IllegalPosition(String),
}

/// A parsed FEN: the position plus the clock fields the position itself
/// does not carry.
#[derive(Debug, Clone)]
pub struct ParsedFen {
    pub state: State,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

pub fn parse(fen: &str) -> Result<ParsedFen, FenError> {
    let mut parts = fen.split_whitespace();

    let board_part = parts
        .next()
        .ok_or_else(|| FenError::Malformed("missing board layout".into()))?;
    let side_part = parts
        .next()
        .ok_or_else(|| FenError::Malformed("missing side-to-move".into()))?;
    let castling_part = parts
        .next()
        .ok_or_else(|| FenError::Malformed("missing castling rights".into()))?;
    let ep_part = parts
        .next()
        .ok_or_else(|| FenError::Malformed("missing en-passant square".into()))?;
    // Clock fields are optional in practice; default them like an EPD line.
    let halfmove_part = parts.next().unwrap_or("0");
    let fullmove_part = parts.next().unwrap_or("1");

    if parts.next().is_some() {
        return Err(FenError::Malformed("extra trailing fields".into()));
    }

    let mut state = State::new_empty();
    parse_board(board_part, &mut state)?;

    state.side_to_move = match side_part {
        "w" => Color::White,
        "b" => Color::Black,
        other => {
            return Err(FenError::Malformed(format!(
                "side-to-move must be 'w' or 'b', got {other:?}"
            )))
        }
    };

    state.castling = parse_castling(castling_part)?;
    state.ep_target = parse_ep(ep_part)?;
    state.refresh_occupancy();

    let halfmove_clock = halfmove_part
        .parse::<u32>()
        .map_err(|_| FenError::Malformed(format!("bad half-move clock {halfmove_part:?}")))?;
    let fullmove_number = fullmove_part
        .parse::<u32>()
        .map_err(|_| FenError::Malformed(format!("bad full-move number {fullmove_part:?}")))?;

    state
        .validate()
        .map_err(FenError::IllegalPosition)?;
    for (color, name) in [(Color::White, "white"), (Color::Black, "black")] {
        if state.pieces(color, Piece::King).count_bits() == 0 {
            return Err(FenError::IllegalPosition(format!("no {name} king")));
        }
    }

    Ok(ParsedFen {
        state,
        halfmove_clock,
        fullmove_number,
    })
}

fn parse_board(board_part: &str, state: &mut State) -> Result<(), FenError> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::Malformed(
            "board layout must contain 8 ranks".into(),
        ));
    }

    // FEN lists rank 8 first; bit indexing starts at a1.
    for (fen_rank, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - fen_rank as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(step) = ch.to_digit(10) {
                if !(1..=8).contains(&step) {
                    return Err(FenError::Malformed(format!(
                        "bad empty-square count {ch:?}"
                    )));
                }
                file += step as u8;
                continue;
            }

            if file >= 8 {
                return Err(FenError::Malformed("rank has too many files".into()));
            }

            let (color, piece) = piece_from_char(ch)
                .ok_or_else(|| FenError::Malformed(format!("bad piece character {ch:?}")))?;
            let mask = bit(rank * 8 + file);
            match color {
                Color::White => state.whites[piece as usize] |= mask,
                Color::Black => state.blacks[piece as usize] |= mask,
            }
            file += 1;
        }

        if file != 8 {
            return Err(FenError::Malformed(
                "rank does not sum to 8 files".into(),
            ));
        }
    }

    Ok(())
}

fn piece_from_char(ch: char) -> Option<(Color, Piece)> {
    let piece = match ch.to_ascii_lowercase() {
        'p' => Piece::Pawn,
        'n' => Piece::Knight,
        'b' => Piece::Bishop,
        'r' => Piece::Rook,
        'q' => Piece::Queen,
        'k' => Piece::King,
        _ => return None,
    };
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    Some((color, piece))
}

fn parse_castling(castling_part: &str) -> Result<Bitboard, FenError> {
    if castling_part == "-" {
        return Ok(0);
    }
    let mut rights: Bitboard = 0;
    for ch in castling_part.chars() {
        rights |= match ch {
            'K' => CASTLE_WK,
            'Q' => CASTLE_WQ,
            'k' => CASTLE_BK,
            'q' => CASTLE_BQ,
            _ => {
                return Err(FenError::Malformed(format!(
                    "bad castling character {ch:?}"
                )))
            }
        };
    }
    Ok(rights)
}

fn parse_ep(ep_part: &str) -> Result<Bitboard, FenError> {
    if ep_part == "-" {
        return Ok(0);
    }
    let sq: Square = ep_part.parse().map_err(FenError::Malformed)?;
    Ok(sq.board())
}
