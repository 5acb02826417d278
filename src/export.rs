//! Export functionality for recovered trajectories
//!
//! Writes the candidate list to CSV, the trajectory to GPX and KML, and the
//! whole parse result to JSON. Output files are named after the capture and
//! land next to it unless an output directory is given.

use crate::error::Result;
use crate::types::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Export options for controlling output formats
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub csv: bool,
    pub gpx: bool,
    pub kml: bool,
    pub json: bool,
    pub output_dir: Option<String>,
}

impl ExportOptions {
    pub fn any(&self) -> bool {
        self.csv || self.gpx || self.kml || self.json
    }
}

/// Paths of the files written by [`export_all`]
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub csv_path: Option<PathBuf>,
    pub gpx_path: Option<PathBuf>,
    pub kml_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
}

/// Output path for `input_path` with the given suffix, creating the directory
pub fn compute_export_path(
    input_path: &Path,
    suffix: &str,
    export_options: &ExportOptions,
) -> Result<PathBuf> {
    let base_name = input_path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("capture");

    let output_dir = match export_options.output_dir.as_deref() {
        Some(dir) => PathBuf::from(dir),
        None => input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    if !output_dir.as_os_str().is_empty() && !output_dir.exists() {
        std::fs::create_dir_all(&output_dir)?;
    }

    Ok(output_dir.join(format!("{}{}", base_name, suffix)))
}

/// Write every enabled format and report the produced paths
pub fn export_all(
    input_path: &Path,
    flight: &FlightData,
    candidates: &[GpsCandidate],
    export_options: &ExportOptions,
) -> Result<ExportReport> {
    let mut report = ExportReport::default();

    if export_options.csv {
        #[cfg(feature = "csv")]
        {
            report.csv_path = export_candidates_to_csv(input_path, candidates, export_options)?;
        }
        #[cfg(not(feature = "csv"))]
        {
            let _ = candidates;
            return Err(crate::error::UdError::Export(
                "CSV export requires the `csv` feature".to_string(),
            ));
        }
    }
    if export_options.gpx {
        report.gpx_path = export_to_gpx(input_path, flight, export_options)?;
    }
    if export_options.kml {
        report.kml_path = export_to_kml(input_path, flight, export_options)?;
    }
    if export_options.json {
        #[cfg(feature = "json")]
        {
            report.json_path = Some(export_to_json(input_path, flight, export_options)?);
        }
        #[cfg(not(feature = "json"))]
        {
            return Err(crate::error::UdError::Export(
                "JSON export requires the `json` feature".to_string(),
            ));
        }
    }

    Ok(report)
}

/// Export every GPS candidate, before consolidation, to `<name>.gps.csv`
#[cfg(feature = "csv")]
pub fn export_candidates_to_csv(
    input_path: &Path,
    candidates: &[GpsCandidate],
    export_options: &ExportOptions,
) -> Result<Option<PathBuf>> {
    if candidates.is_empty() {
        return Ok(None);
    }

    let path = compute_export_path(input_path, ".gps.csv", export_options)?;
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record([
        "source",
        "type_hex",
        "latitude",
        "longitude",
        "altitude",
        "counter",
        "record_offset",
    ])?;

    for c in candidates {
        writer.write_record([
            c.source.to_string(),
            c.type_id.to_hex(),
            format!("{:.8}", c.latitude),
            format!("{:.8}", c.longitude),
            c.altitude.map(|a| format!("{:.2}", a)).unwrap_or_default(),
            c.counter.to_string(),
            c.byte_offset.to_string(),
        ])?;
    }
    writer.flush()?;

    info!(path = %path.display(), count = candidates.len(), "Exported GPS candidates");
    Ok(Some(path))
}

/// Relative time rendered on a fixed epoch; the capture carries no wall clock
fn format_gpx_time(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let days = total_ms / 86_400_000;
    let hours = (total_ms / 3_600_000) % 24;
    let minutes = (total_ms / 60_000) % 60;
    let secs = (total_ms / 1000) % 60;
    let millis = total_ms % 1000;
    format!(
        "1970-01-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        days + 1,
        hours,
        minutes,
        secs,
        millis
    )
}

/// Export the trajectory to `<name>.gps.gpx`
pub fn export_to_gpx(
    input_path: &Path,
    flight: &FlightData,
    export_options: &ExportOptions,
) -> Result<Option<PathBuf>> {
    if flight.points.is_empty() {
        return Ok(None);
    }

    let path = compute_export_path(input_path, ".gps.gpx", export_options)?;
    let mut gpx_file = BufWriter::new(File::create(&path)?);
    writeln!(gpx_file, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        gpx_file,
        r#"<gpx creator="UD Parser (Rust)" version="1.1" xmlns="http://www.topografix.com/GPX/1/1" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd">"#
    )?;
    writeln!(gpx_file, "<metadata><name>UD flight log</name></metadata>")?;
    writeln!(gpx_file, "<trk><name>UD flight log</name><trkseg>")?;

    for point in &flight.points {
        writeln!(
            gpx_file,
            r#"  <trkpt lat="{:.7}" lon="{:.7}"><ele>{:.2}</ele><time>{}</time></trkpt>"#,
            point.latitude,
            point.longitude,
            point.altitude,
            format_gpx_time(point.time)
        )?;
    }

    writeln!(gpx_file, "</trkseg></trk>")?;
    writeln!(gpx_file, "</gpx>")?;
    gpx_file.flush()?;

    info!(path = %path.display(), "Exported GPX track");
    Ok(Some(path))
}

/// Export the trajectory as a KML line with start and finish placemarks
pub fn export_to_kml(
    input_path: &Path,
    flight: &FlightData,
    export_options: &ExportOptions,
) -> Result<Option<PathBuf>> {
    let (first, last) = match (flight.points.first(), flight.points.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Ok(None),
    };

    let path = compute_export_path(input_path, ".trajectory.kml", export_options)?;
    let mut kml = BufWriter::new(File::create(&path)?);

    writeln!(kml, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(kml, r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#)?;
    writeln!(kml, "  <Document>")?;
    writeln!(kml, "    <name>UAV trajectory</name>")?;
    writeln!(
        kml,
        "    <description>Points: {}</description>",
        flight.points.len()
    )?;
    writeln!(
        kml,
        r#"    <Style id="path"><LineStyle><color>ff0000ff</color><width>3</width></LineStyle></Style>"#
    )?;
    writeln!(kml, "    <Placemark>")?;
    writeln!(kml, "      <name>Trajectory</name>")?;
    writeln!(kml, "      <styleUrl>#path</styleUrl>")?;
    writeln!(kml, "      <LineString>")?;
    writeln!(kml, "        <altitudeMode>absolute</altitudeMode>")?;
    writeln!(kml, "        <coordinates>")?;
    for point in &flight.points {
        writeln!(
            kml,
            "          {:.8},{:.8},{:.2}",
            point.longitude, point.latitude, point.altitude
        )?;
    }
    writeln!(kml, "        </coordinates>")?;
    writeln!(kml, "      </LineString>")?;
    writeln!(kml, "    </Placemark>")?;
    for (name, point) in [("Start", first), ("Finish", last)] {
        writeln!(
            kml,
            "    <Placemark><name>{}</name><Point><coordinates>{:.8},{:.8},{:.2}</coordinates></Point></Placemark>",
            name, point.longitude, point.latitude, point.altitude
        )?;
    }
    writeln!(kml, "  </Document>")?;
    writeln!(kml, "</kml>")?;
    kml.flush()?;

    info!(path = %path.display(), "Exported KML trajectory");
    Ok(Some(path))
}

/// Export the whole parse result to `<name>.flight.json`
#[cfg(feature = "json")]
pub fn export_to_json(
    input_path: &Path,
    flight: &FlightData,
    export_options: &ExportOptions,
) -> Result<PathBuf> {
    let path = compute_export_path(input_path, ".flight.json", export_options)?;
    let writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(writer, flight)?;
    info!(path = %path.display(), "Exported JSON result");
    Ok(path)
}
