//! Post-processing of the consolidated track
//!
//! Fills altitude gaps, estimates ground speed and optionally trims leading
//! outliers. These run after consolidation and never drop a point unless
//! start trimming is explicitly requested.

use crate::conversion::haversine_km;
use crate::conversion::haversine_m;

/// Altitude used when the capture carries no usable altitude at all
pub const DEFAULT_ALTITUDE_M: f64 = 100.0;

/// Leading points farther than this from the mid-track centroid are outliers
const START_OUTLIER_DISTANCE_KM: f64 = 30.0;
/// Tracks shorter than this are never trimmed
const MIN_POINTS_FOR_TRIM: usize = 20;
/// Forced skip applies only to tracks longer than this
const FORCED_SKIP_MIN_POINTS: usize = 50;
const FORCED_SKIP_POINTS: usize = 10;

fn is_usable_altitude(alt: Option<f64>) -> bool {
    matches!(alt, Some(a) if a.is_finite() && a > 0.0)
}

/// Fill missing altitudes (None, non-finite or <= 0)
///
/// Gaps are interpolated linearly by point index between the nearest usable
/// samples on each side. A gap with only one usable neighbor copies it. With
/// no usable sample anywhere every altitude becomes `DEFAULT_ALTITUDE_M`.
pub fn interpolate_altitudes(altitudes: &[Option<f64>]) -> Vec<f64> {
    let n = altitudes.len();

    // Index of the nearest usable sample at or before / at or after each point
    let mut prev_valid: Vec<Option<usize>> = vec![None; n];
    let mut last = None;
    for i in 0..n {
        if is_usable_altitude(altitudes[i]) {
            last = Some(i);
        }
        prev_valid[i] = last;
    }
    let mut next_valid: Vec<Option<usize>> = vec![None; n];
    let mut next = None;
    for i in (0..n).rev() {
        if is_usable_altitude(altitudes[i]) {
            next = Some(i);
        }
        next_valid[i] = next;
    }

    let value = |i: usize| altitudes[i].unwrap_or(DEFAULT_ALTITUDE_M);

    (0..n)
        .map(|i| match (prev_valid[i], next_valid[i]) {
            (Some(p), _) if p == i => value(i),
            (Some(p), Some(q)) => {
                let fraction = (i - p) as f64 / (q - p) as f64;
                value(p) + (value(q) - value(p)) * fraction
            }
            (Some(p), None) => value(p),
            (None, Some(q)) => value(q),
            (None, None) => DEFAULT_ALTITUDE_M,
        })
        .collect()
}

/// Ground speed in m/s for every point
///
/// Interior points use a centered difference over `window` points on each
/// side; edge points fall back to a one-sided difference with the adjacent
/// point. Speeds above `max_speed_mps` are scanner noise and become 0.
pub fn estimate_speeds(
    coords: &[(f64, f64)],
    times: &[f64],
    window: usize,
    max_speed_mps: f64,
) -> Vec<f64> {
    let n = coords.len().min(times.len());

    let speed_between = |a: usize, b: usize| -> f64 {
        let dt = times[b] - times[a];
        if dt <= 0.0 || !dt.is_finite() {
            return 0.0;
        }
        haversine_m(coords[a].0, coords[a].1, coords[b].0, coords[b].1) / dt
    };

    (0..n)
        .map(|i| {
            let speed = if i >= window && i + window < n {
                speed_between(i - window, i + window)
            } else if i == 0 {
                if n > 1 {
                    speed_between(0, 1)
                } else {
                    0.0
                }
            } else if i < window && i + 1 < n {
                speed_between(i, i + 1)
            } else {
                speed_between(i - 1, i)
            };

            if speed.is_finite() && speed <= max_speed_mps {
                speed
            } else {
                0.0
            }
        })
        .collect()
}

/// Number of leading points to drop because they sit far from the track
///
/// The reference is the centroid of the middle third of the track, which is
/// the part least affected by start-up garbage.
pub fn find_real_start_point(coords: &[(f64, f64)]) -> usize {
    if coords.len() < MIN_POINTS_FOR_TRIM {
        return 0;
    }

    let middle = &coords[coords.len() / 3..2 * coords.len() / 3];
    if middle.is_empty() {
        return 0;
    }
    let center_lat = middle.iter().map(|c| c.0).sum::<f64>() / middle.len() as f64;
    let center_lon = middle.iter().map(|c| c.1).sum::<f64>() / middle.len() as f64;

    let distance = |c: &(f64, f64)| haversine_km(c.0, c.1, center_lat, center_lon);

    let mut start = coords
        .iter()
        .position(|c| distance(c) < START_OUTLIER_DISTANCE_KM)
        .unwrap_or(0);

    if start < 5 && coords.len() > FORCED_SKIP_MIN_POINTS {
        let outliers = coords
            .iter()
            .take(FORCED_SKIP_POINTS)
            .filter(|c| distance(c) > START_OUTLIER_DISTANCE_KM)
            .count();
        if outliers > 5 {
            start = FORCED_SKIP_POINTS;
        }
    }

    start
}
