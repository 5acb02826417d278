//! UD Parser Library
//!
//! A Rust library for recovering GPS trajectories from Denis/UD binary
//! telemetry captures. Most record types in these captures are undocumented;
//! the parser combines fixed-offset decoding of the few known layouts with a
//! heuristic scan of unknown records, then cleans the result into a single
//! time-ordered track.
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV export of GPS candidates
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`**: Enable JSON export of the full parse result
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ud_parser::{parse_ud_file, ParserConfig};
//! use std::path::Path;
//!
//! let flight = parse_ud_file(Path::new("flight.dat"), &ParserConfig::default()).unwrap();
//! println!("Recovered {} points over {:.1} s", flight.points.len(), flight.duration);
//! println!("Discovered in unknown records: {}", flight.metadata.discovered_gps_count);
//! ```
//!
//! Progress reporting and access to the raw candidates:
//! ```rust,no_run
//! use ud_parser::{ParserConfig, UdParser};
//!
//! let data = std::fs::read("flight.dat").unwrap();
//! let mut parser = UdParser::new(ParserConfig::default()).unwrap();
//! let mut on_progress = |pct: u8| println!("{pct}%");
//! let flight = parser.parse(&data, Some(&mut on_progress)).unwrap();
//! println!("{} known, {} discovered", parser.known_candidates().len(), parser.discovered_candidates().len());
//! # let _ = flight;
//! ```
//!
//! # Public API
//!
//! ## Parsing
//! - [`parse_ud_file`] - Parse a capture from disk
//! - [`parse_ud_bytes`] - Parse a capture from memory
//! - [`UdParser`] - Pipeline with progress reporting and candidate access
//! - [`ParserConfig`] - Thresholds and windows used by the heuristics
//!
//! ## Data Types
//! - [`FlightData`] - Points, duration, bounds and metadata
//! - [`FlightPoint`] - One trajectory sample
//! - [`GpsCandidate`] - Raw known or discovered fix before consolidation
//! - [`Frame`] - Marker-delimited record
//!
//! ## Export Functions
//! - [`export_all`] - Write every format enabled in [`ExportOptions`]
//! - [`export_to_gpx`] / [`export_to_kml`] - Trajectory exports
//!
//! ## Processing Stages
//! - [`find_frames`], [`parse_known_gps`], [`find_gps_in_frame`], [`consolidate`]
//! - [`assign_times`], [`interpolate_altitudes`], [`estimate_speeds`]

// Module declarations
pub mod conversion;
pub mod error;
pub mod export;
pub mod filters;
pub mod parser;
pub mod timebase;
pub mod types;

// Re-export everything from modules for convenience
#[allow(ambiguous_glob_reexports)]
pub use conversion::*;
#[allow(ambiguous_glob_reexports)]
pub use error::*;
#[allow(ambiguous_glob_reexports)]
pub use export::*;
#[allow(ambiguous_glob_reexports)]
pub use filters::*;
#[allow(ambiguous_glob_reexports)]
pub use parser::*;
#[allow(ambiguous_glob_reexports)]
pub use timebase::*;
#[allow(ambiguous_glob_reexports)]
pub use types::*;
