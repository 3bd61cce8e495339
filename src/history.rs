//! The sliding window of recent positions plus the half-move counters that
//! feed the draw rules. The window never exceeds eight states; pushes evict
//! the oldest entry, so no allocation happens after construction.

use arrayvec::ArrayVec;

use crate::board::{Piece, State};
use crate::moves::action::Action;

pub const WINDOW: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct History {
    states: ArrayVec<State, WINDOW>,
    moves_since_capture: u32,
    moves_since_pawn_move: u32,
}

impl History {
    pub fn new() -> Self {
        History::default()
    }

    /// Append a position, evicting the oldest one once the window is full.
    pub fn record_state(&mut self, state: State) {
        if self.states.is_full() {
            self.states.remove(0);
        }
        self.states.push(state);
    }

    /// Update the half-move counters for a played action: a capture resets
    /// the capture counter, a pawn move resets the pawn counter, and each
    /// counter increments otherwise.
    pub fn record_action(&mut self, action: Action) {
        if action.is_capture() {
            self.moves_since_capture = 0;
        } else {
            self.moves_since_capture += 1;
        }
        if action.piece() == Piece::Pawn {
            self.moves_since_pawn_move = 0;
        } else {
            self.moves_since_pawn_move += 1;
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline(always)]
    pub fn state(&self, index: usize) -> &State {
        &self.states[index]
    }

    #[inline(always)]
    pub fn moves_since_capture(&self) -> u32 {
        self.moves_since_capture
    }

    #[inline(always)]
    pub fn moves_since_pawn_move(&self) -> u32 {
        self.moves_since_pawn_move
    }
}
