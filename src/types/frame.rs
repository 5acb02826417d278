use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Three-byte record type identifier that follows the frame marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeId(pub [u8; 3]);

impl TypeId {
    /// True if the first two type bytes match `prefix`
    pub fn has_prefix(&self, prefix: [u8; 2]) -> bool {
        self.0[0] == prefix[0] && self.0[1] == prefix[1]
    }

    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

/// A marker-delimited record located in the capture
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    /// Absolute offset of the marker byte
    pub offset: usize,
    pub type_id: TypeId,
    pub counter: u32,
    pub device_id: u32,
    /// Estimated length including the marker
    pub length: usize,
}

/// Per record type counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeStats {
    pub count: u32,
    pub gps_found: u32,
}

/// Frame statistics collected while framing and scanning
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameStats {
    pub total_frames: u32,
    pub truncated_frames: u32,
    pub total_bytes: u64,
    /// Keyed by the hex rendering of the type id
    pub by_type: BTreeMap<String, TypeStats>,
}

impl FrameStats {
    pub fn record_frame(&mut self, type_id: TypeId) {
        self.total_frames += 1;
        self.by_type.entry(type_id.to_hex()).or_default().count += 1;
    }

    pub fn record_gps_found(&mut self, type_id: TypeId) {
        self.by_type.entry(type_id.to_hex()).or_default().gps_found += 1;
    }

    /// Types with at least one GPS hit, most productive first
    pub fn top_gps_types(&self, limit: usize) -> Vec<(&str, &TypeStats)> {
        let mut types: Vec<(&str, &TypeStats)> = self
            .by_type
            .iter()
            .filter(|(_, stats)| stats.gps_found > 0)
            .map(|(name, stats)| (name.as_str(), stats))
            .collect();
        types.sort_by(|a, b| b.1.gps_found.cmp(&a.1.gps_found).then(a.0.cmp(b.0)));
        types.truncate(limit);
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id_hex() {
        let id = TypeId([0x23, 0x52, 0x0a]);
        assert_eq!(id.to_hex(), "23520a");
        assert!(id.has_prefix([0x23, 0x52]));
        assert!(!id.has_prefix([0x27, 0x52]));
    }

    #[test]
    fn test_top_gps_types_ordering() {
        let mut stats = FrameStats::default();
        let a = TypeId([1, 2, 3]);
        let b = TypeId([4, 5, 6]);
        stats.record_frame(a);
        stats.record_frame(b);
        stats.record_frame(b);
        stats.record_gps_found(a);
        stats.record_gps_found(b);
        stats.record_gps_found(b);

        let top = stats.top_gps_types(10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0, "040506");
        assert_eq!(top[0].1.count, 2);
        assert_eq!(stats.total_frames, 3);
    }
}
