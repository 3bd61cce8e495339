//! Per-move time budgeting and the clock the search polls.

use std::time::Instant;

/// Seconds to spend on the next move: a fixed fraction of the remaining
/// clock, scaled by a Gaussian bump that peaks near half-move 80 so the
/// engine thinks longest in the middlegame.
pub fn move_time_budget(half_move_number: u32, time_remaining: f64) -> f64 {
    const FRACTION: f64 = 0.035;
    const PEAK: f64 = 80.0;
    const SPREAD: f64 = 35.0;

    let n = half_move_number as f64;
    time_remaining * FRACTION * (0.1 + (-(n - PEAK).powi(2) / (2.0 * SPREAD * SPREAD)).exp())
}

/// Monotonic stopwatch the search polls at every node entry.
#[derive(Debug, Clone, Copy)]
pub struct SearchClock {
    started: Instant,
}

impl SearchClock {
    pub fn start() -> Self {
        SearchClock {
            started: Instant::now(),
        }
    }

    #[inline(always)]
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_scales_with_time_remaining() {
        let slow = move_time_budget(40, 600.0);
        let fast = move_time_budget(40, 60.0);
        assert!(slow > fast);
        assert!((slow / fast - 10.0).abs() < 1e-9);
    }

    #[test]
    fn budget_peaks_near_move_eighty() {
        let early = move_time_budget(10, 300.0);
        let peak = move_time_budget(80, 300.0);
        let late = move_time_budget(160, 300.0);
        assert!(peak > early);
        assert!(peak > late);
    }

    #[test]
    fn budget_is_positive_for_positive_clock() {
        for n in [0, 1, 80, 200, 1000] {
            assert!(move_time_budget(n, 30.0) > 0.0);
        }
    }

    #[test]
    fn budget_at_the_peak_matches_the_curve() {
        // At n = 80 the Gaussian term is 1, so the budget is 1.1 * 0.035 * t.
        let t = 100.0;
        let expected = t * 0.035 * 1.1;
        assert!((move_time_budget(80, t) - expected).abs() < 1e-9);
    }

    #[test]
    fn clock_reports_monotonic_elapsed_time() {
        let clock = SearchClock::start();
        let first = clock.elapsed();
        let second = clock.elapsed();
        assert!(first >= 0.0);
        assert!(second >= first);
    }
}
