use crate::conversion::haversine_km;
use crate::types::RegionCenter;

/// Number of most recent coordinates consulted by the coherence check
pub const RECENT_HISTORY: usize = 10;

/// Accumulates accepted coordinates and answers spatial admission questions
#[derive(Debug, Clone)]
pub struct RegionTracker {
    history: Vec<(f64, f64)>,
    center: Option<RegionCenter>,
    max_region_radius_km: f64,
}

impl RegionTracker {
    pub fn new(max_region_radius_km: f64) -> Self {
        Self {
            history: Vec::new(),
            center: None,
            max_region_radius_km,
        }
    }

    pub fn push(&mut self, lat: f64, lon: f64) {
        self.history.push((lat, lon));
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn center(&self) -> Option<RegionCenter> {
        self.center
    }

    /// Recompute the center as the per-axis median of the whole history
    pub fn update_center(&mut self) {
        if self.history.is_empty() {
            return;
        }

        let mut lats: Vec<f64> = self.history.iter().map(|c| c.0).collect();
        let mut lons: Vec<f64> = self.history.iter().map(|c| c.1).collect();
        lats.sort_by(f64::total_cmp);
        lons.sort_by(f64::total_cmp);

        self.center = Some(RegionCenter {
            latitude: lats[lats.len() / 2],
            longitude: lons[lons.len() / 2],
        });
    }

    /// Within `max_jump_km` of the nearest of the last few accepted coordinates
    pub fn is_geographically_coherent(&self, lat: f64, lon: f64, max_jump_km: f64) -> bool {
        if self.history.is_empty() {
            return true;
        }

        let recent = &self.history[self.history.len().saturating_sub(RECENT_HISTORY)..];
        let min_distance = recent
            .iter()
            .map(|&(h_lat, h_lon)| haversine_km(lat, lon, h_lat, h_lon))
            .fold(f64::INFINITY, f64::min);

        min_distance < max_jump_km
    }

    /// Within the configured radius of the region center
    pub fn is_in_reasonable_region(&self, lat: f64, lon: f64) -> bool {
        match self.center {
            Some(center) => {
                haversine_km(lat, lon, center.latitude, center.longitude)
                    < self.max_region_radius_km
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tracker_admits_everything() {
        let tracker = RegionTracker::new(200.0);
        assert!(tracker.is_geographically_coherent(-33.9, 151.2, 50.0));
        assert!(tracker.is_in_reasonable_region(-33.9, 151.2));
        assert!(tracker.center().is_none());
    }

    #[test]
    fn test_upper_median_center() {
        let mut tracker = RegionTracker::new(200.0);
        for (lat, lon) in [(10.0, 40.0), (30.0, 20.0), (20.0, 30.0), (40.0, 10.0)] {
            tracker.push(lat, lon);
        }
        tracker.update_center();
        let center = tracker.center().unwrap();
        assert_eq!(center.latitude, 30.0);
        assert_eq!(center.longitude, 30.0);
    }

    #[test]
    fn test_coherence_uses_recent_history_only() {
        let mut tracker = RegionTracker::new(200.0);
        tracker.push(55.7, 37.5);
        for i in 0..RECENT_HISTORY {
            tracker.push(48.85, 2.35 + i as f64 * 0.001);
        }
        // Moscow point has fallen out of the recent window
        assert!(!tracker.is_geographically_coherent(55.7, 37.5, 50.0));
        assert!(tracker.is_geographically_coherent(48.86, 2.36, 50.0));
    }

    #[test]
    fn test_region_radius() {
        let mut tracker = RegionTracker::new(200.0);
        tracker.push(55.7, 37.5);
        tracker.update_center();
        assert!(tracker.is_in_reasonable_region(56.5, 37.5));
        assert!(!tracker.is_in_reasonable_region(59.9, 30.3));
    }
}
