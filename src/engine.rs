//! The engine facade: owns the current position, the percept window, and
//! the clock, and turns "it is your move" into a committed action.

use tracing::info;

use crate::board::{parse_fen, FenError, State};
use crate::history::History;
use crate::moves::action::Action;
use crate::moves::execute::apply;
use crate::search::time::{move_time_budget, SearchClock};
use crate::search::choose_action;

pub struct Engine {
    state: State,
    history: History,
    half_move_number: u32,
    time_remaining: f64,
    worst_mode: bool,
}

impl Engine {
    /// Build an engine from a FEN position. The half-move counter seeds
    /// from twice the FEN half-move clock; it only feeds the time budget.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = parse_fen(fen)?;
        let mut history = History::new();
        history.record_state(parsed.state);
        Ok(Engine {
            state: parsed.state,
            history,
            half_move_number: 2 * parsed.halfmove_clock,
            time_remaining: 0.0,
            worst_mode: false,
        })
    }

    /// Flip the evaluation sign so the search prefers the worst move.
    /// Terminal values are unaffected.
    pub fn set_worst_mode(&mut self, enabled: bool) {
        self.worst_mode = enabled;
    }

    /// Set the engine's remaining clock, in seconds.
    pub fn update_timer(&mut self, seconds: f64) {
        self.time_remaining = seconds;
    }

    /// Commit an action played by either side (typically the opponent's
    /// reply) without searching.
    pub fn update_move(&mut self, action: Action) {
        self.state = apply(&self.state, action);
        self.history.record_state(self.state);
        self.history.record_action(action);
        self.half_move_number += 1;
    }

    /// Search within the current time budget, commit the chosen action, and
    /// debit the clock. `None` means the position has no legal moves; run
    /// `status::terminal_test` before calling.
    pub fn choose_move(&mut self) -> Option<Action> {
        let clock = SearchClock::start();
        let budget = move_time_budget(self.half_move_number, self.time_remaining);

        let action = choose_action(&self.state, &self.history, budget, self.worst_mode)?;

        self.state = apply(&self.state, action);
        self.history.record_state(self.state);
        self.history.record_action(action);
        self.half_move_number += 1;
        self.time_remaining -= clock.elapsed();

        info!(
            action = %action,
            budget,
            spent = clock.elapsed(),
            remaining = self.time_remaining,
            "committed move"
        );
        Some(action)
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn half_move_number(&self) -> u32 {
        self.half_move_number
    }

    pub fn time_remaining(&self) -> f64 {
        self.time_remaining
    }
}
