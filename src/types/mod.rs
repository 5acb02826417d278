pub mod flight;
pub mod frame;
pub mod gps;

pub use flight::*;
pub use frame::*;
pub use gps::*;
