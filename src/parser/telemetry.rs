use crate::parser::stream::UdDataStream;
use crate::types::{Frame, KsTelemetry};

/// Type bytes of the KS telemetry record
pub const KS_TYPE_PREFIX: [u8; 2] = *b"KS";
/// KS records shorter than this are ignored
pub const KS_MIN_LENGTH: usize = 77;
const KS_PARAM_OFFSET: usize = 32;

pub fn is_telemetry_type(frame: &Frame) -> bool {
    frame.type_id.has_prefix(KS_TYPE_PREFIX)
}

/// Decode the three leading parameters of a KS telemetry record
pub fn parse_ks_telemetry(data: &[u8], frame: &Frame) -> Option<KsTelemetry> {
    if !is_telemetry_type(frame) || frame.length < KS_MIN_LENGTH {
        return None;
    }

    let stream = UdDataStream::bounded(data, frame.offset, frame.offset + frame.length);
    let base = frame.offset + KS_PARAM_OFFSET;
    Some(KsTelemetry {
        counter: frame.counter,
        param1: stream.f32_at(base).ok()?,
        param2: stream.f32_at(base + 4).ok()?,
        param3: stream.f32_at(base + 8).ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeId;

    fn ks_frame_bytes(len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        bytes[0] = 0x7E;
        bytes[1] = b'K';
        bytes[2] = b'S';
        bytes[4..8].copy_from_slice(&9u32.to_le_bytes());
        bytes[32..36].copy_from_slice(&1.5f32.to_le_bytes());
        bytes[36..40].copy_from_slice(&(-2.0f32).to_le_bytes());
        bytes[40..44].copy_from_slice(&0.25f32.to_le_bytes());
        bytes
    }

    fn frame_for(bytes: &[u8]) -> Frame {
        Frame {
            offset: 0,
            type_id: TypeId([bytes[1], bytes[2], bytes[3]]),
            counter: 9,
            device_id: 0,
            length: bytes.len(),
        }
    }

    #[test]
    fn test_parse_ks_telemetry() {
        let data = ks_frame_bytes(80);
        let tel = parse_ks_telemetry(&data, &frame_for(&data)).unwrap();
        assert_eq!(tel.counter, 9);
        assert_eq!(tel.param1, 1.5);
        assert_eq!(tel.param2, -2.0);
        assert_eq!(tel.param3, 0.25);
    }

    #[test]
    fn test_short_ks_record_ignored() {
        let data = ks_frame_bytes(60);
        assert!(parse_ks_telemetry(&data, &frame_for(&data)).is_none());
    }
}
