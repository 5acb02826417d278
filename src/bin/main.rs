//! CLI binary for UD Parser
//!
//! This provides the command-line interface for the UD parser library.

use anyhow::{Context, Result};
use clap::{Arg, Command};
use glob::glob;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;
use ud_parser::{export_all, ExportOptions, FlightData, ParserConfig, UdParser};

fn long_version() -> &'static str {
    static LONG_VERSION: OnceLock<String> = OnceLock::new();
    LONG_VERSION.get_or_init(|| {
        format!(
            "{} ({})",
            env!("CARGO_PKG_VERSION"),
            option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
        )
    })
}

fn build_command() -> Command {
    Command::new("UD Parser")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version())
        .about("Recover GPS trajectories from Denis/UD binary telemetry captures.")
        .arg(
            Arg::new("files")
                .help("UD capture files to parse (supports globbing)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output and detailed parsing information")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Export every GPS candidate (before consolidation) to .gps.csv")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("gpx")
                .long("gpx")
                .help("Export the recovered trajectory to a GPX track")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("kml")
                .long("kml")
                .help("Export the recovered trajectory to KML")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Export the full parse result to JSON (requires the json feature)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for output files (default: same as input file)")
                .value_name("DIR"),
        )
        .arg(
            Arg::new("max-jump-km")
                .long("max-jump-km")
                .help("Max distance of a discovered point from recent points")
                .value_name("KM")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("region-radius-km")
                .long("region-radius-km")
                .help("Max distance of a discovered point from the region center")
                .value_name("KM")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("search-window")
                .long("search-window")
                .help("Max bytes scanned for the next record marker")
                .value_name("BYTES")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("trim-start")
                .long("trim-start")
                .help("Drop leading points far from the middle of the track")
                .action(clap::ArgAction::SetTrue),
        )
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn expand_patterns(patterns: &[&String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') {
            match glob(pattern) {
                Ok(entries) => {
                    for entry in entries {
                        match entry {
                            Ok(path) => paths.push(path),
                            Err(e) => eprintln!("Error expanding glob pattern '{pattern}': {e}"),
                        }
                    }
                }
                Err(e) => eprintln!("Invalid glob pattern '{pattern}': {e}"),
            }
        } else {
            paths.push(PathBuf::from(pattern.as_str()));
        }
    }
    paths
}

fn print_summary(flight: &FlightData) {
    let meta = &flight.metadata;
    println!("Records:            {}", meta.total_records);
    println!("Telemetry (KS):     {}", meta.telemetry_count);
    println!("GPS data:");
    println!("  Known types:      {}", meta.known_gps_count);
    println!("  Discovered:       {}", meta.discovered_gps_count);
    println!("  Total candidates: {}", meta.total_gps_points);
    println!(
        "  Trajectory:       {} points ({} duplicates, {} outliers removed)",
        flight.points.len(),
        meta.duplicates_removed,
        meta.outliers_removed
    );
    if let Some(gain) = flight.discovery_gain_percent() {
        println!("  Recovered extra:  +{gain:.0}%");
    }
    if let Some(time_base) = meta.time_base {
        println!("Time base:          {time_base}");
    }
    println!("Duration:           {:.1} s", flight.duration);

    let b = &flight.bounds;
    let (center_lat, center_lon) = b.center();
    let (ns_km, ew_km) = b.size_km();
    println!("Latitude:           {:.6} - {:.6}", b.min_lat, b.max_lat);
    println!("Longitude:          {:.6} - {:.6}", b.min_lon, b.max_lon);
    println!("Altitude:           {:.1} - {:.1} m", b.min_alt, b.max_alt);
    println!("Center:             {center_lat:.6}, {center_lon:.6}");
    println!("Area:               {ns_km:.2} x {ew_km:.2} km");
    if let Some(ratio) = flight.telemetry_ratio() {
        println!("Telemetry:GPS       {ratio:.1}:1");
    }
}

fn print_type_table(parser: &UdParser) {
    let top = parser.stats().top_gps_types(10);
    if top.is_empty() {
        return;
    }
    println!();
    println!("{:<12} {:<10} {:<10} {:<8}", "Type", "Total", "With GPS", "%");
    for (type_hex, stats) in top {
        let percent = 100.0 * stats.gps_found as f64 / stats.count.max(1) as f64;
        println!(
            "{:<12} {:<10} {:<10} {:>6.1}%",
            type_hex, stats.count, stats.gps_found, percent
        );
    }
}

fn process_file(
    path: &Path,
    config: &ParserConfig,
    export_options: &ExportOptions,
) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {path:?}"))?;

    let mut parser = UdParser::new(config.clone())?;
    let mut on_progress = |pct: u8| tracing::debug!(pct, "Progress");
    let flight = parser.parse(&data, Some(&mut on_progress))?;

    print_summary(&flight);
    print_type_table(&parser);

    if export_options.any() {
        let report = export_all(path, &flight, &parser.all_candidates(), export_options)?;
        for written in [
            report.csv_path,
            report.gpx_path,
            report.kml_path,
            report.json_path,
        ]
        .into_iter()
        .flatten()
        {
            println!("Exported: {}", written.display());
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    init_logging(debug);

    let mut config = ParserConfig {
        trim_start_outliers: matches.get_flag("trim-start"),
        ..ParserConfig::default()
    };
    if let Some(&km) = matches.get_one::<f64>("max-jump-km") {
        config.max_jump_km = km;
    }
    if let Some(&km) = matches.get_one::<f64>("region-radius-km") {
        config.max_region_radius_km = km;
    }
    if let Some(&window) = matches.get_one::<usize>("search-window") {
        config.search_window = window;
    }
    config.validate()?;

    let export_options = ExportOptions {
        csv: matches.get_flag("csv"),
        gpx: matches.get_flag("gpx"),
        kml: matches.get_flag("kml"),
        json: matches.get_flag("json"),
        output_dir: matches.get_one::<String>("output-dir").cloned(),
    };

    let file_patterns: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|values| values.collect())
        .unwrap_or_default();

    let valid_paths: Vec<PathBuf> = expand_patterns(&file_patterns)
        .into_iter()
        .filter(|path| {
            let exists = path.is_file();
            if !exists {
                eprintln!("Warning: File does not exist: {path:?}");
            }
            exists
        })
        .collect();

    if valid_paths.is_empty() {
        eprintln!("Error: No valid files found to process.");
        eprintln!("Input patterns were: {file_patterns:?}");
        std::process::exit(1);
    }

    let mut processed_files = 0;
    for (index, path) in valid_paths.iter().enumerate() {
        if index > 0 {
            println!();
        }

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        println!("Processing: {filename}");

        match process_file(path, &config, &export_options) {
            Ok(()) => processed_files += 1,
            Err(e) => {
                eprintln!("Error processing {filename}: {e:#}");
                eprintln!("Continuing with next file...");
            }
        }
    }

    if processed_files == 0 {
        eprintln!(
            "Error: No files were successfully processed out of {} files found.",
            valid_paths.len()
        );
        eprintln!("Use --debug flag for more detailed error information.");
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        build_command().debug_assert();
    }

    #[test]
    fn test_flags_map_to_config() {
        let matches = build_command()
            .try_get_matches_from(["ud_parser", "--max-jump-km", "25", "--trim-start", "a.dat"])
            .unwrap();
        assert_eq!(matches.get_one::<f64>("max-jump-km"), Some(&25.0));
        assert!(matches.get_flag("trim-start"));
        assert!(!matches.get_flag("gpx"));
    }
}
