use crate::types::TypeId;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a GPS candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CandidateSource {
    /// Fixed-offset read from a documented record layout
    Known,
    /// Heuristic float-pair scan inside an unknown record
    Discovered,
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateSource::Known => write!(f, "KNOWN_TYPE"),
            CandidateSource::Discovered => write!(f, "DISCOVERED"),
        }
    }
}

/// GPS coordinate recovered from a single frame
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsCandidate {
    pub source: CandidateSource,
    pub type_id: TypeId,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub counter: u32,
    /// Absolute position of the latitude field in the capture
    pub byte_offset: usize,
}

/// Relative position from `27 52` records, not geo-referenced
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelativePosition {
    pub type_id: TypeId,
    pub counter: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub byte_offset: usize,
}

/// Running median of accepted coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionCenter {
    pub latitude: f64,
    pub longitude: f64,
}

/// KS telemetry record. Only counted; the parameters are not decoded further.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KsTelemetry {
    pub counter: u32,
    pub param1: f32,
    pub param2: f32,
    pub param3: f32,
}
