use crate::error::{Result, UdError};

/// Tuning knobs for a parse pass
///
/// Defaults reproduce the behavior the heuristics were calibrated with; the
/// CLI exposes the geographic thresholds and the framing window.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserConfig {
    /// Maximum distance the framer looks ahead for the next marker
    pub search_window: usize,
    /// Coherence gate: max distance to the nearest recent coordinate
    pub max_jump_km: f64,
    /// Region gate: max distance to the running region center
    pub max_region_radius_km: f64,
    /// Region center is refreshed after this many accepted discoveries
    pub region_refresh_interval: usize,
    /// Discovery only scans offsets below this bound within a frame
    pub discovery_scan_limit: usize,
    /// Consecutive candidates closer than this are duplicates
    pub dedup_distance_m: f64,
    /// A consecutive jump above this starts a new spatial cluster
    pub cluster_gap_km: f64,
    /// Speeds above this are zeroed as scanner noise
    pub max_speed_mps: f64,
    /// Half-width in points of the centered speed window
    pub speed_window: usize,
    /// Drop leading points far from the middle of the track
    pub trim_start_outliers: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            search_window: 1024,
            max_jump_km: 50.0,
            max_region_radius_km: 200.0,
            region_refresh_interval: 100,
            discovery_scan_limit: 80,
            dedup_distance_m: 1.0,
            cluster_gap_km: 10.0,
            max_speed_mps: 300.0,
            speed_window: 5,
            trim_start_outliers: false,
        }
    }
}

impl ParserConfig {
    pub fn validate(&self) -> Result<()> {
        if self.search_window == 0 {
            return Err(UdError::InvalidConfig(
                "search window must be at least 1 byte".to_string(),
            ));
        }
        if self.region_refresh_interval == 0 {
            return Err(UdError::InvalidConfig(
                "region refresh interval must be at least 1".to_string(),
            ));
        }
        if self.speed_window == 0 {
            return Err(UdError::InvalidConfig(
                "speed window must be at least 1 point".to_string(),
            ));
        }
        let distances = [
            ("max jump", self.max_jump_km),
            ("region radius", self.max_region_radius_km),
            ("cluster gap", self.cluster_gap_km),
            ("max speed", self.max_speed_mps),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value <= 0.0 {
                return Err(UdError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if !self.dedup_distance_m.is_finite() || self.dedup_distance_m < 0.0 {
            return Err(UdError::InvalidConfig(format!(
                "dedup distance must be non-negative, got {}",
                self.dedup_distance_m
            )));
        }
        Ok(())
    }
}
