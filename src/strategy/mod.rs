//! Opportunity detection
//!
//! Pure computers over immutable venue datasets, plus the orchestrator that runs them.

pub mod direction;
pub mod normalizer;
pub mod perp_perp;
pub mod ranking;
pub mod scanner;
pub mod spot_perp;

pub use direction::{AssignDirection, Direction, DirectionMode};
pub use normalizer::normalize;
pub use perp_perp::{PerpPerpComputer, PerpPerpOpportunity, ReconciledAmplitude, Window, WindowSeries, WindowTotals};
pub use ranking::{filter_and_sort, sort_perp_perp, RateSign};
pub use scanner::{FundingScanner, ScanOutcome, ScanReport, ScanStatistics, SpotPerpResults};
pub use spot_perp::{SpotPerpComputer, SpotPerpOpportunity};
