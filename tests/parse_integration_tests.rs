//! Integration tests for the full parsing pipeline
//!
//! Captures are built in memory from hand-assembled frames:
//! - known absolute GPS records (`23 52`)
//! - relative position records (`27 52`)
//! - KS telemetry records
//! - unknown records carrying a coordinate pair at an unaligned offset

use std::fs;
use tempfile::TempDir;
use ud_parser::{
    parse_ud_bytes, parse_ud_file, CandidateSource, ParserConfig, TimeBase, UdError, UdParser,
    DEFAULT_ALTITUDE_M, NO_GPS_MESSAGE,
};

fn header(type_bytes: [u8; 3], counter: u32, device_id: u32) -> Vec<u8> {
    let mut bytes = vec![0x7E];
    bytes.extend_from_slice(&type_bytes);
    bytes.extend_from_slice(&counter.to_le_bytes());
    bytes.extend_from_slice(&device_id.to_le_bytes());
    bytes
}

fn push_f32s(bytes: &mut Vec<u8>, values: &[f32]) {
    for value in values {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
}

fn known_gps(counter: u32, lat: f32, lon: f32, alt: f32) -> Vec<u8> {
    let mut bytes = header([0x23, 0x52, 0x01], counter, 1);
    bytes.extend_from_slice(&[0u8; 12]);
    push_f32s(&mut bytes, &[lat, lon, alt]);
    bytes
}

fn relative_position(counter: u32, x: f32, y: f32, z: f32) -> Vec<u8> {
    let mut bytes = header([0x27, 0x52, 0x01], counter, 1);
    bytes.extend_from_slice(&[0u8; 8]);
    push_f32s(&mut bytes, &[x, y, z]);
    bytes.extend_from_slice(&[0u8; 8]);
    bytes
}

fn ks_telemetry(counter: u32, params: [f32; 3]) -> Vec<u8> {
    let mut bytes = header([b'K', b'S', 0x01], counter, 1);
    bytes.extend_from_slice(&[0u8; 20]);
    push_f32s(&mut bytes, &params);
    bytes.extend_from_slice(&[0u8; 33]);
    bytes
}

/// Unknown record; the NaN device id keeps the header from reading as a coordinate
fn unknown_with_pair(counter: u32, lat: f32, lon: f32, alt: f32) -> Vec<u8> {
    let mut bytes = header([0x10, 0x20, 0x30], counter, u32::MAX);
    push_f32s(&mut bytes, &[lat, lon, alt]);
    bytes
}

fn concat(frames: &[Vec<u8>]) -> Vec<u8> {
    frames.iter().flatten().copied().collect()
}

#[test]
fn test_no_markers_reports_no_gps() {
    let data = vec![0u8; 256];
    let err = parse_ud_bytes(&data, &ParserConfig::default()).unwrap_err();
    assert!(matches!(err, UdError::EmptyInput(_)));
    assert_eq!(err.to_string(), NO_GPS_MESSAGE);
}

#[test]
fn test_three_known_fixes_at_100hz() {
    let data = concat(&[
        known_gps(0, 55.700, 37.500, 120.0),
        known_gps(100, 55.701, 37.501, 121.0),
        known_gps(200, 55.702, 37.502, 122.0),
    ]);

    let flight = parse_ud_bytes(&data, &ParserConfig::default()).unwrap();

    assert_eq!(flight.points.len(), 3);
    assert_eq!(flight.duration, 2.0);
    assert_eq!(flight.metadata.time_base, Some(TimeBase::Hz100));
    let times: Vec<f64> = flight.points.iter().map(|p| p.time).collect();
    assert_eq!(times, vec![0.0, 1.0, 2.0]);
    assert_eq!(flight.points[1].altitude, 121.0);
    assert_eq!(flight.metadata.known_gps_count, 3);
    assert_eq!(flight.metadata.discovered_gps_count, 0);
    assert_eq!(flight.metadata.total_records, 3);
    assert!(!flight.has_discovered_points());
}

#[test]
fn test_non_positive_altitudes_fall_back_to_default() {
    let data = concat(&[
        known_gps(0, 55.700, 37.500, -5.0),
        known_gps(100, 55.701, 37.501, 0.0),
        known_gps(200, 55.702, 37.502, -5.0),
    ]);

    let flight = parse_ud_bytes(&data, &ParserConfig::default()).unwrap();

    assert_eq!(flight.points.len(), 3);
    for point in &flight.points {
        assert_eq!(point.altitude, DEFAULT_ALTITUDE_M);
    }
}

#[test]
fn test_microsecond_counters() {
    let data = concat(&[
        known_gps(0, 55.700, 37.500, 120.0),
        known_gps(30_000_000, 55.701, 37.501, 121.0),
        known_gps(60_000_000, 55.702, 37.502, 122.0),
    ]);

    let flight = parse_ud_bytes(&data, &ParserConfig::default()).unwrap();

    assert_eq!(flight.metadata.time_base, Some(TimeBase::Microseconds));
    assert_eq!(flight.duration, 60.0);
    assert_eq!(flight.points[1].time, 30.0);
}

#[test]
fn test_out_of_order_counters_keep_time_monotonic() {
    let data = concat(&[
        known_gps(0, 55.700, 37.500, 120.0),
        known_gps(300, 55.701, 37.501, 121.0),
        known_gps(100, 55.702, 37.502, 122.0),
        known_gps(400, 55.703, 37.503, 123.0),
    ]);

    let flight = parse_ud_bytes(&data, &ParserConfig::default()).unwrap();

    let times: Vec<f64> = flight.points.iter().map(|p| p.time).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]), "times {times:?}");
    assert_eq!(times.last().copied(), Some(flight.duration));
}

#[test]
fn test_discovery_fills_gaps_between_known_fixes() {
    let data = concat(&[
        known_gps(0, 55.700, 37.500, 120.0),
        unknown_with_pair(50, 55.7005, 37.5005, 130.0),
        known_gps(100, 55.701, 37.501, 121.0),
        unknown_with_pair(150, 55.7015, 37.5015, 131.0),
        known_gps(200, 55.702, 37.502, 122.0),
    ]);

    let mut parser = UdParser::new(ParserConfig::default()).unwrap();
    let flight = parser.parse(&data, None).unwrap();

    assert_eq!(flight.metadata.known_gps_count, 3);
    assert_eq!(flight.metadata.discovered_gps_count, 2);
    assert_eq!(flight.metadata.total_gps_points, 5);
    assert_eq!(flight.points.len(), 5);
    assert!(flight.has_discovered_points());

    // Consolidation orders by position in the capture
    let lats: Vec<f64> = flight.points.iter().map(|p| p.latitude).collect();
    assert!(lats.windows(2).all(|w| w[0] < w[1]), "lats {lats:?}");
    assert_eq!(flight.points[1].time, 0.5);
    assert!((flight.points[1].altitude - 130.0).abs() < 1e-9);

    let discovered = parser.discovered_candidates();
    assert!(discovered
        .iter()
        .all(|c| c.source == CandidateSource::Discovered));
    // Pair sits right after the 12-byte header
    assert_eq!(discovered[0].byte_offset, 36 + 12);

    let stats = &flight.metadata.type_statistics["102030"];
    assert_eq!(stats.count, 2);
    assert_eq!(stats.gps_found, 2);
}

#[test]
fn test_far_discovery_is_rejected() {
    let data = concat(&[
        known_gps(0, 55.700, 37.500, 120.0),
        unknown_with_pair(50, 48.8566, 2.3522, 35.0),
        known_gps(100, 55.701, 37.501, 121.0),
    ]);

    let flight = parse_ud_bytes(&data, &ParserConfig::default()).unwrap();

    assert_eq!(flight.metadata.discovered_gps_count, 0);
    assert_eq!(flight.points.len(), 2);
}

#[test]
fn test_isolated_known_fix_is_removed_as_outlier() {
    let data = concat(&[
        known_gps(0, 55.700, 37.500, 120.0),
        known_gps(100, 55.701, 37.501, 121.0),
        known_gps(200, 55.702, 37.502, 122.0),
        known_gps(300, 10.0, 10.0, 50.0),
    ]);

    let flight = parse_ud_bytes(&data, &ParserConfig::default()).unwrap();

    assert_eq!(flight.points.len(), 3);
    assert_eq!(flight.metadata.outliers_removed, 1);
    assert_eq!(flight.metadata.total_gps_points, 4);
    assert!(flight.points.iter().all(|p| p.latitude > 55.0));
}

#[test]
fn test_duplicate_fixes_collapse() {
    let data = concat(&[
        known_gps(0, 55.700, 37.500, 120.0),
        known_gps(100, 55.700, 37.500, 120.0),
        known_gps(200, 55.702, 37.502, 122.0),
    ]);

    let flight = parse_ud_bytes(&data, &ParserConfig::default()).unwrap();

    assert_eq!(flight.points.len(), 2);
    assert_eq!(flight.metadata.duplicates_removed, 1);
}

#[test]
fn test_relative_and_telemetry_records_are_counted() {
    let data = concat(&[
        known_gps(0, 55.700, 37.500, 120.0),
        relative_position(50, 12.0, 0.5, 1.5),
        ks_telemetry(60, [1.5, 2.5, 3.5]),
        ks_telemetry(70, [1.5, 2.5, 3.5]),
        known_gps(100, 55.701, 37.501, 121.0),
    ]);

    let mut parser = UdParser::new(ParserConfig::default()).unwrap();
    let flight = parser.parse(&data, None).unwrap();

    assert_eq!(flight.metadata.relative_position_count, 1);
    assert_eq!(flight.metadata.telemetry_count, 2);
    assert_eq!(flight.metadata.known_gps_count, 2);
    assert_eq!(flight.points.len(), 2);
    assert_eq!(flight.telemetry_ratio(), Some(1.0));

    let rel = &parser.relative_positions()[0];
    assert_eq!((rel.x, rel.y, rel.z), (12.0, 0.5, 1.5));
    let ks = &parser.telemetry()[0];
    assert_eq!((ks.param1, ks.param2, ks.param3), (1.5, 2.5, 3.5));
}

#[test]
fn test_trailing_marker_counts_as_truncated() {
    let mut data = concat(&[
        known_gps(0, 55.700, 37.500, 120.0),
        known_gps(100, 55.701, 37.501, 121.0),
    ]);
    data.extend_from_slice(&[0x7E, 0x01, 0x02]);

    let flight = parse_ud_bytes(&data, &ParserConfig::default()).unwrap();

    assert_eq!(flight.metadata.truncated_records, 1);
    assert_eq!(flight.metadata.total_records, 2);
    assert_eq!(flight.points.len(), 2);
}

#[test]
fn test_bounds_cover_every_point() {
    let data = concat(&[
        known_gps(0, 55.700, 37.500, 120.0),
        known_gps(100, 55.701, 37.501, 121.0),
        known_gps(200, 55.702, 37.502, 122.0),
    ]);

    let flight = parse_ud_bytes(&data, &ParserConfig::default()).unwrap();
    let b = &flight.bounds;

    for p in &flight.points {
        assert!(b.min_lat <= p.latitude && p.latitude <= b.max_lat);
        assert!(b.min_lon <= p.longitude && p.longitude <= b.max_lon);
        assert!(b.min_alt <= p.altitude && p.altitude <= b.max_alt);
        assert!(p.speed >= 0.0);
    }
}

#[test]
fn test_parse_ud_file_from_disk() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("flight.dat");
    fs::write(
        &path,
        concat(&[
            known_gps(0, 55.700, 37.500, 120.0),
            known_gps(100, 55.701, 37.501, 121.0),
        ]),
    )
    .expect("Failed to write capture");

    let flight = parse_ud_file(&path, &ParserConfig::default()).unwrap();
    assert_eq!(flight.points.len(), 2);
    assert_eq!(flight.duration, 1.0);
}

#[test]
fn test_missing_file_is_io_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let err = parse_ud_file(&temp_dir.path().join("absent.dat"), &ParserConfig::default())
        .unwrap_err();
    assert!(matches!(err, UdError::Io(_)));
}

#[test]
fn test_track_spacing_and_gap_limits() {
    let data = concat(&[
        known_gps(0, 55.700, 37.500, 120.0),
        unknown_with_pair(50, 55.7005, 37.5005, 130.0),
        known_gps(100, 55.701, 37.501, 121.0),
        known_gps(150, 55.701, 37.501, 121.0),
        unknown_with_pair(200, 55.7015, 37.5015, 131.0),
        known_gps(250, 55.702, 37.502, 122.0),
        known_gps(300, 10.0, 10.0, 50.0),
    ]);

    let flight = parse_ud_bytes(&data, &ParserConfig::default()).unwrap();

    for pair in flight.points.windows(2) {
        let d = ud_parser::haversine_m(
            pair[0].latitude,
            pair[0].longitude,
            pair[1].latitude,
            pair[1].longitude,
        );
        assert!(d >= 1.0, "adjacent points {d} m apart");
        assert!(d <= 10_000.0, "adjacent points {d} m apart");
    }
    assert!(flight.duration <= ud_parser::MAX_FLIGHT_DURATION_S);
}

#[test]
fn test_known_candidates_are_deterministic() {
    let data = concat(&[
        known_gps(0, 55.700, 37.500, 120.0),
        unknown_with_pair(50, 55.7005, 37.5005, 130.0),
        known_gps(100, 55.701, 37.501, 121.0),
    ]);

    let mut first = UdParser::new(ParserConfig::default()).unwrap();
    first.parse(&data, None).unwrap();
    let mut second = UdParser::new(ParserConfig::default()).unwrap();
    second.parse(&data, None).unwrap();

    assert_eq!(first.known_candidates(), second.known_candidates());
    assert_eq!(first.discovered_candidates(), second.discovered_candidates());
}

#[test]
fn test_region_center_refresh_cadence_controls_admission() {
    let config = ParserConfig {
        region_refresh_interval: 3,
        max_region_radius_km: 20.0,
        ..ParserConfig::default()
    };

    // No known fixes: the center comes only from refreshes after every third
    // discovery. The track drifts north ~30 km in steps under the 50 km jump.
    let lats: [f32; 14] = [
        50.000, 50.001, 50.002, 50.003, 50.004, // refreshes at 3
        50.180, 50.181, // refresh at 6
        50.270, 50.271, 50.272, 50.273, // refresh at 9 keeps the center at 50.004
        50.274, // 11 in history, ~30 km from the center: rejected
        50.010, // 12th discovery, refresh moves the center to 50.180
        50.275, // ~10.6 km from the new center: admitted
    ];
    let frames: Vec<Vec<u8>> = lats
        .iter()
        .enumerate()
        .map(|(i, &lat)| unknown_with_pair(i as u32 * 10, lat, 10.0, 100.0))
        .collect();
    let data = concat(&frames);

    let mut parser = UdParser::new(config).unwrap();
    let flight = parser.parse(&data, None).unwrap();

    let discovered: Vec<f64> = parser
        .discovered_candidates()
        .iter()
        .map(|c| c.latitude)
        .collect();
    let expected: Vec<f64> = lats
        .iter()
        .filter(|&&lat| lat != 50.274)
        .map(|&lat| lat as f64)
        .collect();
    assert_eq!(discovered, expected);
    assert_eq!(flight.metadata.discovered_gps_count, 13);
    assert_eq!(flight.metadata.region_size, 13);

    // Upper median of the first 12 discoveries, not recomputed for the 13th
    let center = flight.metadata.region_center.unwrap();
    assert_eq!(center.latitude, 50.180f32 as f64);
    assert_eq!(center.longitude, 10.0);

    let stats = &flight.metadata.type_statistics["102030"];
    assert_eq!(stats.count, 14);
    assert_eq!(stats.gps_found, 13);
}
