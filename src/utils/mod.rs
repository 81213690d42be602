//! Utility modules

pub mod logger;
pub mod metrics;
pub mod numeric;

pub use logger::*;
pub use numeric::*;
