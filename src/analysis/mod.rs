//! Side-normalisation and cross-phase aggregation.
//!
//! Everything in here is synchronous and infallible: missing, zero or malformed data is
//! left out of the aggregates, never reported as an error. Handlers load the phase
//! records, build a [`report::Cohort`] and hand it to one of the report builders.

pub mod bilateral;
pub mod catalog;
pub mod hop;
pub mod individual;
pub mod phase;
pub mod ratio;
pub mod record;
pub mod report;
pub mod side;
pub mod stats;
pub mod value;

pub use phase::{Phase, PhaseSchema};
pub use record::{PhaseDataset, PhaseRecord};
pub use report::Cohort;
pub use side::Side;
pub use stats::SideSummary;

/// Tunables for one aggregation run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Per-patient differences above this magnitude (percent) are counted and logged.
    pub extreme_diff_pct: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self { extreme_diff_pct: 100.0 }
    }
}
