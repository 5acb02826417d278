pub mod config;
pub mod consolidate;
pub mod discovery;
pub mod framer;
pub mod known;
pub mod main;
pub mod region;
pub mod stream;
pub mod telemetry;

pub use config::*;
pub use consolidate::*;
pub use discovery::*;
pub use framer::*;
pub use known::*;
pub use main::*;
pub use region::*;
pub use stream::*;
pub use telemetry::*;
