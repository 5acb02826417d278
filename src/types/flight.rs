use crate::timebase::TimeBase;
use crate::types::{RegionCenter, TypeStats};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One sample of the recovered trajectory
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlightPoint {
    /// Seconds since the first point
    pub time: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Meters
    pub altitude: f64,
    /// Meters per second
    pub speed: f64,
    /// Not present in the capture, always 0
    pub satellites: u8,
}

/// Geographic and vertical extent of the trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_alt: f64,
    pub max_alt: f64,
}

impl Bounds {
    pub fn from_points(points: &[FlightPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Bounds {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lon: first.longitude,
            max_lon: first.longitude,
            min_alt: first.altitude,
            max_alt: first.altitude,
        };
        for p in &points[1..] {
            bounds.min_lat = bounds.min_lat.min(p.latitude);
            bounds.max_lat = bounds.max_lat.max(p.latitude);
            bounds.min_lon = bounds.min_lon.min(p.longitude);
            bounds.max_lon = bounds.max_lon.max(p.longitude);
            bounds.min_alt = bounds.min_alt.min(p.altitude);
            bounds.max_alt = bounds.max_alt.max(p.altitude);
        }
        Some(bounds)
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Approximate extent in kilometers as (north-south, east-west)
    pub fn size_km(&self) -> (f64, f64) {
        let (center_lat, _) = self.center();
        let lat_km = (self.max_lat - self.min_lat) * 111.0;
        let lon_km = (self.max_lon - self.min_lon) * 111.0 * center_lat.to_radians().cos();
        (lat_km, lon_km)
    }
}

/// Descriptive statistics of one parse pass
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParseMetadata {
    pub total_records: u32,
    pub truncated_records: u32,
    pub known_gps_count: usize,
    pub discovered_gps_count: usize,
    /// Known plus discovered candidates before consolidation
    pub total_gps_points: usize,
    pub relative_position_count: usize,
    pub telemetry_count: usize,
    pub region_center: Option<RegionCenter>,
    /// Coordinates held by the region tracker at the end of the pass
    pub region_size: usize,
    pub duplicates_removed: usize,
    pub outliers_removed: usize,
    pub leading_points_trimmed: usize,
    pub time_base: Option<TimeBase>,
    pub type_statistics: BTreeMap<String, TypeStats>,
}

/// Complete result of parsing a UD capture
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlightData {
    pub points: Vec<FlightPoint>,
    /// Seconds
    pub duration: f64,
    pub bounds: Bounds,
    pub source: String,
    pub metadata: ParseMetadata,
}

impl FlightData {
    pub fn has_discovered_points(&self) -> bool {
        self.metadata.discovered_gps_count > 0
    }

    /// Percentage of extra points recovered by discovery over the known layouts
    pub fn discovery_gain_percent(&self) -> Option<f64> {
        let known = self.metadata.known_gps_count;
        let discovered = self.metadata.discovered_gps_count;
        if known == 0 || discovered == 0 {
            return None;
        }
        Some(discovered as f64 / known as f64 * 100.0)
    }

    /// Telemetry records per candidate GPS point
    pub fn telemetry_ratio(&self) -> Option<f64> {
        if self.metadata.total_gps_points == 0 || self.metadata.telemetry_count == 0 {
            return None;
        }
        Some(self.metadata.telemetry_count as f64 / self.metadata.total_gps_points as f64)
    }
}
