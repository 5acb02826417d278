//! Time-base inference for the opaque frame counter
//!
//! The physical unit of the counter depends on firmware and is not recorded
//! anywhere in the capture. The only usable signal is that the implied
//! flight duration has to be plausible, so tick-rate hypotheses are tried in
//! a fixed order and the first plausible one is applied to every point.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Longest flight duration accepted by any hypothesis
pub const MAX_FLIGHT_DURATION_S: f64 = 48.0 * 3600.0;

/// Point spacing used when no hypothesis fits
pub const SYNTHETIC_SPACING_S: f64 = 0.01;

/// Chosen interpretation of the frame counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeBase {
    Hz100,
    Microseconds,
    Hz10k,
    /// Counter ignored, points spaced `SYNTHETIC_SPACING_S` apart
    Synthetic,
}

impl TimeBase {
    /// Counter ticks per second, `None` for synthetic spacing
    pub fn ticks_per_second(&self) -> Option<f64> {
        TIME_BASE_HYPOTHESES
            .iter()
            .find(|(tb, _)| tb == self)
            .map(|&(_, rate)| rate)
    }
}

impl fmt::Display for TimeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBase::Hz100 => write!(f, "100 Hz"),
            TimeBase::Microseconds => write!(f, "1 MHz (microseconds)"),
            TimeBase::Hz10k => write!(f, "10 kHz"),
            TimeBase::Synthetic => write!(f, "synthetic 10 ms spacing"),
        }
    }
}

/// Hypotheses with their tick rates, in preference order; the first plausible one wins
pub const TIME_BASE_HYPOTHESES: &[(TimeBase, f64)] = &[
    (TimeBase::Hz100, 100.0),
    (TimeBase::Microseconds, 1_000_000.0),
    (TimeBase::Hz10k, 10_000.0),
];

fn is_plausible_duration(duration_s: f64) -> bool {
    duration_s.is_finite() && (0.0..=MAX_FLIGHT_DURATION_S).contains(&duration_s)
}

/// Pick the time base for a counter span
pub fn infer_time_base(start_counter: u32, end_counter: u32) -> TimeBase {
    let delta = end_counter as i64 - start_counter as i64;
    TIME_BASE_HYPOTHESES
        .iter()
        .find(|&&(_, rate)| is_plausible_duration(delta as f64 / rate))
        .map(|&(tb, _)| tb)
        .unwrap_or(TimeBase::Synthetic)
}

/// Per-point timestamps in seconds plus the total duration
///
/// Counter-derived times are clamped into `[previous, duration]` so counters
/// from out-of-order or spurious frames cannot make time run backwards.
pub fn assign_times(counters: &[u32]) -> (TimeBase, Vec<f64>, f64) {
    let (first, last) = match (counters.first(), counters.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return (TimeBase::Synthetic, Vec::new(), 0.0),
    };

    let time_base = infer_time_base(first, last);
    match time_base.ticks_per_second() {
        Some(rate) => {
            let duration = (last as i64 - first as i64) as f64 / rate;
            let mut previous = 0.0f64;
            let times = counters
                .iter()
                .map(|&counter| {
                    let raw = (counter as i64 - first as i64) as f64 / rate;
                    let t = raw.clamp(previous, duration);
                    previous = t;
                    t
                })
                .collect();
            (time_base, times, duration)
        }
        None => {
            let times: Vec<f64> = (0..counters.len())
                .map(|i| i as f64 * SYNTHETIC_SPACING_S)
                .collect();
            let duration = times.last().copied().unwrap_or(0.0);
            (time_base, times, duration)
        }
    }
}
