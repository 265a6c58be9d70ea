pub mod blessure;
pub mod patient;

pub use blessure::{options_for, Blessure, BlessureInput, BlessureSummary, BLESSURE_OPTIONS};
pub use patient::{Patient, PatientInput, PatientWithBlessures};
