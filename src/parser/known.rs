//! Known-schema record extraction
//!
//! Reads fixed-offset float fields from the record types whose layout has
//! been reverse-engineered. A read that fails or does not pass the validity
//! predicate simply produces no record.

use crate::conversion::is_valid_fix;
use crate::error::Result;
use crate::parser::stream::UdDataStream;
use crate::types::{CandidateSource, Frame, GpsCandidate, RelativePosition};
use tracing::debug;

/// Layout of a record carrying three consecutive little-endian f32 fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatTripleLayout {
    /// First two type bytes identifying the record
    pub type_prefix: [u8; 2],
    /// Offset of the first field from the frame marker
    pub field_offset: usize,
    /// Frames shorter than this are not decoded
    pub min_length: usize,
}

/// Absolute GPS: latitude, longitude, altitude
pub const GPS_ABSOLUTE: FloatTripleLayout = FloatTripleLayout {
    type_prefix: [0x23, 0x52],
    field_offset: 24,
    min_length: 36,
};

/// Relative position: x, y, z
pub const GPS_RELATIVE: FloatTripleLayout = FloatTripleLayout {
    type_prefix: [0x27, 0x52],
    field_offset: 20,
    min_length: 40,
};

/// Registry of documented GPS layouts; frames of these types are never scanned
pub const KNOWN_GPS_LAYOUTS: &[FloatTripleLayout] = &[GPS_ABSOLUTE, GPS_RELATIVE];

pub fn is_known_gps_type(frame: &Frame) -> bool {
    KNOWN_GPS_LAYOUTS
        .iter()
        .any(|layout| frame.type_id.has_prefix(layout.type_prefix))
}

fn read_triple(data: &[u8], frame: &Frame, layout: &FloatTripleLayout) -> Result<[f64; 3]> {
    let stream = UdDataStream::bounded(data, frame.offset, frame.offset + frame.length);
    let base = frame.offset + layout.field_offset;
    Ok([
        stream.f32_at(base)? as f64,
        stream.f32_at(base + 4)? as f64,
        stream.f32_at(base + 8)? as f64,
    ])
}

/// Decode an absolute GPS fix from a `23 52` frame
pub fn parse_known_gps(data: &[u8], frame: &Frame) -> Option<GpsCandidate> {
    let layout = &GPS_ABSOLUTE;
    if !frame.type_id.has_prefix(layout.type_prefix) || frame.length < layout.min_length {
        return None;
    }

    let [latitude, longitude, altitude] = match read_triple(data, frame, layout) {
        Ok(values) => values,
        Err(e) => {
            debug!(offset = frame.offset, error = %e, "Known GPS read rejected");
            return None;
        }
    };

    if !is_valid_fix(latitude, longitude, Some(altitude)) {
        return None;
    }

    Some(GpsCandidate {
        source: CandidateSource::Known,
        type_id: frame.type_id,
        latitude,
        longitude,
        altitude: Some(altitude),
        counter: frame.counter,
        byte_offset: frame.offset + layout.field_offset,
    })
}

/// Decode a relative position from a `27 52` frame
pub fn parse_relative_position(data: &[u8], frame: &Frame) -> Option<RelativePosition> {
    let layout = &GPS_RELATIVE;
    if !frame.type_id.has_prefix(layout.type_prefix) || frame.length < layout.min_length {
        return None;
    }

    let [x, y, z] = read_triple(data, frame, layout).ok()?;
    Some(RelativePosition {
        type_id: frame.type_id,
        counter: frame.counter,
        x,
        y,
        z,
        byte_offset: frame.offset + layout.field_offset,
    })
}
