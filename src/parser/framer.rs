use crate::error::Result;
use crate::parser::stream::{UdDataStream, FRAME_MARKER};
use crate::types::{Frame, FrameStats, TypeId};
use tracing::debug;

/// Marker + 3-byte type + counter + device id
pub const FRAME_HEADER_LEN: usize = 12;

/// Locate every marker-delimited frame in the capture
///
/// Every marker byte starts a frame, including markers that happen to sit
/// inside another frame's payload. The length runs to the next marker within
/// `search_window` bytes, or to `min(remaining, search_window)` otherwise.
pub fn find_frames(data: &[u8], search_window: usize, stats: &mut FrameStats) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut stream = UdDataStream::new(data);
    stats.total_bytes += data.len() as u64;

    for offset in 0..data.len() {
        if data[offset] != FRAME_MARKER {
            continue;
        }

        if data.len() - offset < FRAME_HEADER_LEN {
            stats.truncated_frames += 1;
            debug!(offset, "Skipping marker without room for a frame header");
            continue;
        }

        stream.set_position(offset + 1);
        let (type_bytes, counter, device_id) = match read_frame_header(&mut stream) {
            Ok(header) => header,
            Err(_) => {
                stats.truncated_frames += 1;
                continue;
            }
        };

        let length = match stream.find_next_marker(offset, search_window) {
            Some(next) => next - offset,
            None => (data.len() - offset).min(search_window),
        };

        let type_id = TypeId(type_bytes);
        stats.record_frame(type_id);

        if frames.len() < 3 {
            debug!(offset, type_id = %type_id, counter, length, "Found frame");
        }

        frames.push(Frame {
            offset,
            type_id,
            counter,
            device_id,
            length,
        });
    }

    debug!(
        frames = frames.len(),
        truncated = stats.truncated_frames,
        "Framing complete"
    );
    frames
}

fn read_frame_header(stream: &mut UdDataStream) -> Result<([u8; 3], u32, u32)> {
    let type_id = stream.read_type_id()?;
    let counter = stream.read_u32_le()?;
    let device_id = stream.read_u32_le()?;
    Ok((type_id, counter, device_id))
}
