//! Per-exchange datasets and their ingestion

pub mod amplitude;
pub mod dataset;
pub mod loader;
pub mod series;

pub use amplitude::{AmplitudeStats, Candle};
pub use dataset::{ExchangeDataset, FundingSnapshot, SpotAvailability};
pub use loader::DatasetLoader;
pub use series::{FundingEvent, FundingHistory, RawRates};
