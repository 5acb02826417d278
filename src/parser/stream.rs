use crate::error::{Result, UdError};

/// Frame marker byte
pub const FRAME_MARKER: u8 = 0x7E;

/// UD data stream for bounded little-endian reads over the capture
pub struct UdDataStream<'a> {
    data: &'a [u8],
    pub pos: usize,
    end: usize,
    pub eof: bool,
}

impl<'a> UdDataStream<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            end: data.len(),
            eof: data.is_empty(),
        }
    }

    /// Restrict reads to `data[start..end]`, e.g. a single frame
    pub fn bounded(data: &'a [u8], start: usize, end: usize) -> Self {
        let end = end.min(data.len());
        let start = start.min(end);
        Self {
            data,
            pos: start,
            end,
            eof: start >= end,
        }
    }

    pub fn remaining(&self) -> usize {
        self.end.saturating_sub(self.pos)
    }

    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
        self.eof = pos >= self.end;
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        if self.remaining() < N {
            self.eof = true;
            return Err(UdError::Malformed(format!(
                "read of {} bytes at offset {} past end {}",
                N, self.pos, self.end
            )));
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        self.eof = self.pos >= self.end;
        Ok(bytes)
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array::<4>()?))
    }

    pub fn read_type_id(&mut self) -> Result<[u8; 3]> {
        self.read_array::<3>()
    }

    /// Read a little-endian f32 at an absolute offset without moving the cursor
    pub fn f32_at(&self, offset: usize) -> Result<f32> {
        match offset.checked_add(4) {
            Some(stop) if stop <= self.end => {
                let mut bytes = [0u8; 4];
                bytes.copy_from_slice(&self.data[offset..stop]);
                Ok(f32::from_le_bytes(bytes))
            }
            _ => Err(UdError::Malformed(format!(
                "f32 read at offset {} past end {}",
                offset, self.end
            ))),
        }
    }

    /// Position of the next marker strictly after `from`, looking at most `window` bytes ahead
    pub fn find_next_marker(&self, from: usize, window: usize) -> Option<usize> {
        let start = from.checked_add(1)?;
        if start >= self.end {
            return None;
        }
        let stop = from.saturating_add(window).min(self.end);
        if start >= stop {
            return None;
        }
        self.data[start..stop]
            .iter()
            .position(|&b| b == FRAME_MARKER)
            .map(|i| start + i)
    }
}
