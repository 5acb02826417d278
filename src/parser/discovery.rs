//! Heuristic GPS discovery inside frames of unknown layout
//!
//! Without a schema, the only admission signal for a float pair is that it
//! looks like a coordinate and sits close to the trajectory recovered so far.
//! Admission runs in a fixed order:
//!
//! 1. basic coordinate validity
//! 2. not both components below one degree
//! 3. coherence with the most recent accepted coordinates
//! 4. proximity to the running region center, once enough history exists
//!
//! The first admitted offset of a frame wins and the rest of the frame is
//! not scanned, so overlapping aligned reads cannot flood the stream.

use crate::conversion::{is_plausible_discovered_altitude, is_valid_coordinate};
use crate::parser::config::ParserConfig;
use crate::parser::framer::FRAME_HEADER_LEN;
use crate::parser::region::RegionTracker;
use crate::parser::stream::UdDataStream;
use crate::types::{CandidateSource, Frame, GpsCandidate};

/// First in-frame offset tried, right after the marker and type bytes
pub const DISCOVERY_START_OFFSET: usize = 4;
/// Candidate pairs are read at this alignment
pub const DISCOVERY_STRIDE: usize = 4;
/// Pairs where both components are below this are rejected
const MIN_DISCOVERED_DEGREES: f64 = 1.0;
/// Region gate applies only once the history holds more entries than this
pub const REGION_GATE_MIN_HISTORY: usize = 10;

/// Scan one frame for the first admissible (lat, lon) pair
pub fn find_gps_in_frame(
    data: &[u8],
    frame: &Frame,
    region: &RegionTracker,
    config: &ParserConfig,
) -> Option<GpsCandidate> {
    if frame.length < FRAME_HEADER_LEN {
        return None;
    }

    let stream = UdDataStream::bounded(data, frame.offset, frame.offset + frame.length);
    let scan_end = (frame.length - 8).min(config.discovery_scan_limit);

    for offset in (DISCOVERY_START_OFFSET..scan_end).step_by(DISCOVERY_STRIDE) {
        let base = frame.offset + offset;
        let (lat, lon) = match (stream.f32_at(base), stream.f32_at(base + 4)) {
            (Ok(lat), Ok(lon)) => (lat as f64, lon as f64),
            _ => continue,
        };

        if !is_admissible(lat, lon, region, config) {
            continue;
        }

        let altitude = stream
            .f32_at(base + 8)
            .ok()
            .map(|alt| alt as f64)
            .filter(|&alt| is_plausible_discovered_altitude(alt));

        return Some(GpsCandidate {
            source: CandidateSource::Discovered,
            type_id: frame.type_id,
            latitude: lat,
            longitude: lon,
            altitude,
            counter: frame.counter,
            byte_offset: base,
        });
    }

    None
}

fn is_admissible(lat: f64, lon: f64, region: &RegionTracker, config: &ParserConfig) -> bool {
    if !is_valid_coordinate(lat, lon) {
        return false;
    }
    if lat.abs() < MIN_DISCOVERED_DEGREES && lon.abs() < MIN_DISCOVERED_DEGREES {
        return false;
    }
    if !region.is_geographically_coherent(lat, lon, config.max_jump_km) {
        return false;
    }
    if region.len() > REGION_GATE_MIN_HISTORY && !region.is_in_reasonable_region(lat, lon) {
        return false;
    }
    true
}
