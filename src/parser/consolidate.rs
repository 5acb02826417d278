//! Merge known and discovered candidates into one coherent track
//!
//! Candidates are ordered by byte offset rather than by the declared counter,
//! which can reset or carry garbage in spurious frames. Near-duplicates are
//! dropped, then the track is split wherever it teleports and only the
//! largest contiguous cluster is kept.

use crate::conversion::haversine_m;
use crate::types::GpsCandidate;
use tracing::debug;

/// Outcome of consolidation with the counts needed for statistics
#[derive(Debug, Clone, Default)]
pub struct Consolidated {
    pub candidates: Vec<GpsCandidate>,
    pub duplicates_removed: usize,
    pub outliers_removed: usize,
    pub cluster_count: usize,
}

pub fn consolidate(
    mut candidates: Vec<GpsCandidate>,
    dedup_distance_m: f64,
    cluster_gap_km: f64,
) -> Consolidated {
    candidates.sort_by_key(|c| c.byte_offset);

    let before_dedup = candidates.len();
    let deduplicated = remove_duplicates(candidates, dedup_distance_m);
    let duplicates_removed = before_dedup - deduplicated.len();

    let before_clustering = deduplicated.len();
    let mut clusters = split_clusters(deduplicated, cluster_gap_km * 1000.0);
    let cluster_count = clusters.len();

    // max_by_key keeps the last maximum; iterate reversed so the first wins ties
    let largest = clusters
        .iter()
        .enumerate()
        .rev()
        .max_by_key(|(_, cluster)| cluster.len())
        .map(|(i, _)| i);
    let kept = match largest {
        Some(i) => clusters.swap_remove(i),
        None => Vec::new(),
    };
    let outliers_removed = before_clustering - kept.len();

    debug!(
        kept = kept.len(),
        duplicates_removed,
        outliers_removed,
        cluster_count,
        "Consolidation complete"
    );

    Consolidated {
        candidates: kept,
        duplicates_removed,
        outliers_removed,
        cluster_count,
    }
}

/// Drop candidates closer than `min_distance_m` to the previously retained one
pub fn remove_duplicates(candidates: Vec<GpsCandidate>, min_distance_m: f64) -> Vec<GpsCandidate> {
    let mut retained: Vec<GpsCandidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if let Some(prev) = retained.last() {
            let d = haversine_m(
                prev.latitude,
                prev.longitude,
                candidate.latitude,
                candidate.longitude,
            );
            if d < min_distance_m {
                continue;
            }
        }
        retained.push(candidate);
    }
    retained
}

/// Split into runs whose consecutive distances never exceed `max_gap_m`
pub fn split_clusters(candidates: Vec<GpsCandidate>, max_gap_m: f64) -> Vec<Vec<GpsCandidate>> {
    let mut clusters: Vec<Vec<GpsCandidate>> = Vec::new();
    let mut current: Vec<GpsCandidate> = Vec::new();

    for candidate in candidates {
        if let Some(prev) = current.last() {
            let d = haversine_m(
                prev.latitude,
                prev.longitude,
                candidate.latitude,
                candidate.longitude,
            );
            if d > max_gap_m {
                clusters.push(std::mem::take(&mut current));
            }
        }
        current.push(candidate);
    }
    if !current.is_empty() {
        clusters.push(current);
    }
    clusters
}
