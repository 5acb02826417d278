use crate::error::{Result, UdError};
use crate::filters::{estimate_speeds, find_real_start_point, interpolate_altitudes};
use crate::parser::config::ParserConfig;
use crate::parser::consolidate::{consolidate, Consolidated};
use crate::parser::discovery::find_gps_in_frame;
use crate::parser::framer::find_frames;
use crate::parser::known::{is_known_gps_type, parse_known_gps, parse_relative_position};
use crate::parser::region::RegionTracker;
use crate::parser::telemetry::{is_telemetry_type, parse_ks_telemetry};
use crate::timebase::assign_times;
use crate::types::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Label attached to every result produced by this parser
pub const SOURCE_LABEL: &str = "Denis/UD binary (smart GPS discovery)";

/// Message of the error returned when nothing usable was recovered
pub const NO_GPS_MESSAGE: &str = "No valid GPS data found in file.";

/// Progress milestones reported to the optional callback, in percent
pub mod progress {
    pub const FRAMING: u8 = 10;
    pub const KNOWN_EXTRACTION: u8 = 25;
    pub const REGION_UPDATE: u8 = 30;
    pub const DISCOVERY: u8 = 60;
    pub const TELEMETRY: u8 = 70;
    pub const CONSOLIDATION: u8 = 85;
    pub const CONVERSION: u8 = 100;
}

/// Parse a UD capture from disk
pub fn parse_ud_file(file_path: &Path, config: &ParserConfig) -> Result<FlightData> {
    let file_data = std::fs::read(file_path).map_err(|e| {
        UdError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read UD capture {:?}: {}", file_path, e),
        ))
    })?;

    info!(
        path = %file_path.display(),
        size_mb = file_data.len() as f64 / 1024.0 / 1024.0,
        "Loaded capture"
    );

    parse_ud_bytes(&file_data, config)
}

/// Parse a UD capture already resident in memory
pub fn parse_ud_bytes(data: &[u8], config: &ParserConfig) -> Result<FlightData> {
    let mut parser = UdParser::new(config.clone())?;
    parser.parse(data, None)
}

/// One parse pass over one capture
///
/// History and statistics accumulate across calls to [`UdParser::parse`];
/// use a fresh parser per capture.
pub struct UdParser {
    config: ParserConfig,
    region: RegionTracker,
    stats: FrameStats,
    known: Vec<GpsCandidate>,
    discovered: Vec<GpsCandidate>,
    relative: Vec<RelativePosition>,
    telemetry: Vec<KsTelemetry>,
}

impl UdParser {
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            region: RegionTracker::new(config.max_region_radius_km),
            config,
            stats: FrameStats::default(),
            known: Vec::new(),
            discovered: Vec::new(),
            relative: Vec::new(),
            telemetry: Vec::new(),
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn known_candidates(&self) -> &[GpsCandidate] {
        &self.known
    }

    pub fn discovered_candidates(&self) -> &[GpsCandidate] {
        &self.discovered
    }

    /// Known absolute fixes followed by discoveries, in extraction order
    pub fn all_candidates(&self) -> Vec<GpsCandidate> {
        self.known
            .iter()
            .chain(self.discovered.iter())
            .cloned()
            .collect()
    }

    pub fn relative_positions(&self) -> &[RelativePosition] {
        &self.relative
    }

    pub fn telemetry(&self) -> &[KsTelemetry] {
        &self.telemetry
    }

    /// Run the whole pipeline over `data`
    pub fn parse(
        &mut self,
        data: &[u8],
        mut on_progress: Option<&mut dyn FnMut(u8)>,
    ) -> Result<FlightData> {
        let mut report = |pct: u8| {
            if let Some(cb) = on_progress.as_mut() {
                cb(pct);
            }
        };

        debug!(size = data.len(), "Parsing UD data");

        let frames = find_frames(data, self.config.search_window, &mut self.stats);
        info!(records = frames.len(), "Records located");
        report(progress::FRAMING);

        self.extract_known(data, &frames);
        report(progress::KNOWN_EXTRACTION);

        if !self.region.is_empty() {
            self.region.update_center();
        }
        match self.region.center() {
            Some(center) => info!(
                lat = center.latitude,
                lon = center.longitude,
                known = self.known.len(),
                "Region center from known GPS"
            ),
            None => warn!("No known GPS records; discovery starts without a region"),
        }
        report(progress::REGION_UPDATE);

        self.discover(data, &frames);
        report(progress::DISCOVERY);

        self.extract_telemetry(data, &frames);
        report(progress::TELEMETRY);

        let consolidated = consolidate(
            self.all_candidates(),
            self.config.dedup_distance_m,
            self.config.cluster_gap_km,
        );
        report(progress::CONSOLIDATION);

        let flight = self.assemble(consolidated)?;
        report(progress::CONVERSION);
        Ok(flight)
    }

    fn extract_known(&mut self, data: &[u8], frames: &[Frame]) {
        for frame in frames {
            if let Some(candidate) = parse_known_gps(data, frame) {
                self.region.push(candidate.latitude, candidate.longitude);
                self.stats.record_gps_found(frame.type_id);
                self.known.push(candidate);
            } else if let Some(rel) = parse_relative_position(data, frame) {
                self.relative.push(rel);
            }
        }
        debug!(
            known = self.known.len(),
            relative = self.relative.len(),
            "Known-schema extraction complete"
        );
    }

    fn discover(&mut self, data: &[u8], frames: &[Frame]) {
        let progress_step = (frames.len() / 10).max(1);

        for (idx, frame) in frames.iter().enumerate() {
            if idx > 0 && idx % progress_step == 0 {
                debug!(
                    processed = idx,
                    total = frames.len(),
                    "Discovery progress {:.1}%",
                    100.0 * idx as f64 / frames.len() as f64
                );
            }

            if is_known_gps_type(frame) || is_telemetry_type(frame) {
                continue;
            }

            let candidate = match find_gps_in_frame(data, frame, &self.region, &self.config) {
                Some(candidate) => candidate,
                None => continue,
            };

            self.region.push(candidate.latitude, candidate.longitude);
            self.stats.record_gps_found(frame.type_id);
            self.discovered.push(candidate);

            if self.discovered.len() % self.config.region_refresh_interval == 0 {
                self.region.update_center();
            }
        }

        info!(discovered = self.discovered.len(), "Discovery complete");
    }

    fn extract_telemetry(&mut self, data: &[u8], frames: &[Frame]) {
        self.telemetry.extend(
            frames
                .iter()
                .filter(|frame| is_telemetry_type(frame))
                .filter_map(|frame| parse_ks_telemetry(data, frame)),
        );
        debug!(telemetry = self.telemetry.len(), "Telemetry extraction complete");
    }

    fn assemble(&self, consolidated: Consolidated) -> Result<FlightData> {
        let mut candidates = consolidated.candidates;

        let mut leading_points_trimmed = 0;
        if self.config.trim_start_outliers {
            let coords: Vec<(f64, f64)> =
                candidates.iter().map(|c| (c.latitude, c.longitude)).collect();
            leading_points_trimmed = find_real_start_point(&coords);
            if leading_points_trimmed > 0 {
                info!(skipped = leading_points_trimmed, "Trimmed leading outliers");
                candidates.drain(..leading_points_trimmed);
            }
        }

        if candidates.is_empty() {
            return Err(UdError::EmptyInput(NO_GPS_MESSAGE.to_string()));
        }

        let counters: Vec<u32> = candidates.iter().map(|c| c.counter).collect();
        let (time_base, times, duration) = assign_times(&counters);
        debug!(%time_base, duration, "Time base selected");

        let altitudes: Vec<Option<f64>> = candidates.iter().map(|c| c.altitude).collect();
        let altitudes = interpolate_altitudes(&altitudes);

        let coords: Vec<(f64, f64)> = candidates
            .iter()
            .map(|c| (c.latitude, c.longitude))
            .collect();
        let speeds = estimate_speeds(
            &coords,
            &times,
            self.config.speed_window,
            self.config.max_speed_mps,
        );

        let points: Vec<FlightPoint> = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| FlightPoint {
                time: times[i],
                latitude: c.latitude,
                longitude: c.longitude,
                altitude: altitudes[i],
                speed: speeds[i],
                satellites: 0,
            })
            .collect();

        let bounds = Bounds::from_points(&points)
            .ok_or_else(|| UdError::EmptyInput(NO_GPS_MESSAGE.to_string()))?;

        let metadata = ParseMetadata {
            total_records: self.stats.total_frames,
            truncated_records: self.stats.truncated_frames,
            known_gps_count: self.known.len(),
            discovered_gps_count: self.discovered.len(),
            total_gps_points: self.known.len() + self.discovered.len(),
            relative_position_count: self.relative.len(),
            telemetry_count: self.telemetry.len(),
            region_center: self.region.center(),
            region_size: self.region.len(),
            duplicates_removed: consolidated.duplicates_removed,
            outliers_removed: consolidated.outliers_removed,
            leading_points_trimmed,
            time_base: Some(time_base),
            type_statistics: self.stats.by_type.clone(),
        };

        info!(
            points = points.len(),
            duration_s = duration,
            "Trajectory assembled"
        );

        Ok(FlightData {
            points,
            duration,
            bounds,
            source: SOURCE_LABEL.to_string(),
            metadata,
        })
    }
}
