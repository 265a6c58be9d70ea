use serde::Serialize;
use tracing::warn;

use super::AnalysisOptions;

pub const MAGNITUDE_DIGITS: i32 = 1;
pub const PERCENT_DIGITS: i32 = 1;
pub const RATIO_DIGITS: i32 = 2;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Ties go to the even digit: 82.25 becomes 82.2, 82.35 becomes 82.4.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10_f64.powi(digits);
    (value * factor).round_ties_even() / factor
}

pub fn rounded_mean(values: &[f64], digits: i32) -> Option<f64> {
    mean(values).map(|m| round_to(m, digits))
}

/// Signed difference of the operated side relative to the healthy side, in percent.
pub fn percent_diff(operated: f64, healthy: f64) -> Option<f64> {
    if healthy == 0.0 {
        return None;
    }
    let diff = (operated - healthy) / healthy * 100.0;
    diff.is_finite().then_some(diff)
}

/// Aggregate of one test or ratio, operated versus healthy side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideSummary {
    pub label: String,
    pub operated_mean: Option<f64>,
    pub healthy_mean: Option<f64>,
    pub diff_pct: Option<f64>,
    pub n_operated: usize,
    pub n_healthy: usize,
    pub n_pairs: usize,
    /// Per-patient differences beyond the configured magnitude; reported, never clamped.
    #[serde(skip_serializing_if = "is_zero")]
    pub n_extreme: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Per-patient samples collected for one test or ratio.
#[derive(Debug, Default)]
pub struct PairedSamples {
    operated: Vec<f64>,
    healthy: Vec<f64>,
    diffs: Vec<f64>,
    extreme: usize,
}

impl PairedSamples {
    /// Add one patient. The difference is taken per patient, before any averaging.
    pub fn record(
        &mut self,
        label: &str,
        injury_id: i64,
        operated: Option<f64>,
        healthy: Option<f64>,
        options: &AnalysisOptions,
    ) {
        if let Some(o) = operated {
            self.operated.push(o);
        }
        if let Some(h) = healthy {
            self.healthy.push(h);
        }
        if let (Some(o), Some(h)) = (operated, healthy) {
            if let Some(diff) = percent_diff(o, h) {
                if diff.abs() > options.extreme_diff_pct {
                    self.extreme += 1;
                    warn!(
                        test = label,
                        blessure_id = injury_id,
                        diff_pct = diff,
                        "extreme operated/healthy difference"
                    );
                }
                self.diffs.push(diff);
            }
        }
    }

    /// Nothing measured on either side.
    pub fn is_empty(&self) -> bool {
        self.operated.is_empty() && self.healthy.is_empty()
    }

    pub fn summarize(&self, label: &str, value_digits: i32) -> SideSummary {
        SideSummary {
            label: label.to_string(),
            operated_mean: rounded_mean(&self.operated, value_digits),
            healthy_mean: rounded_mean(&self.healthy, value_digits),
            diff_pct: rounded_mean(&self.diffs, PERCENT_DIGITS),
            n_operated: self.operated.len(),
            n_healthy: self.healthy.len(),
            n_pairs: self.diffs.len(),
            n_extreme: self.extreme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(rounded_mean(&[1.0, 2.0], 1), Some(1.5));
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(0.654, 2), 0.65);
        assert_eq!(round_to(-19.96, 1), -20.0);
        assert_eq!(round_to(12.34, 1), 12.3);
    }

    #[test]
    fn ties_round_to_even() {
        assert_eq!(round_to(82.25, 1), 82.2);
        assert_eq!(round_to(82.75, 1), 82.8);
        assert_eq!(round_to(-0.5, 0), -0.0);
        assert_eq!(round_to(0.125, 2), 0.12);
    }

    #[test]
    fn percent_diff_is_relative_to_healthy() {
        assert_eq!(percent_diff(80.0, 100.0), Some(-20.0));
        assert_eq!(percent_diff(110.0, 100.0).map(|d| round_to(d, 1)), Some(10.0));
        assert_eq!(percent_diff(5.0, 0.0), None);
    }

    #[test]
    fn unpaired_values_count_per_side() {
        let opts = AnalysisOptions::default();
        let mut s = PairedSamples::default();
        s.record("t", 1, Some(80.0), None, &opts);
        s.record("t", 2, None, Some(100.0), &opts);
        s.record("t", 3, Some(60.0), Some(120.0), &opts);
        let sum = s.summarize("t", MAGNITUDE_DIGITS);
        assert_eq!(sum.n_operated, 2);
        assert_eq!(sum.n_healthy, 2);
        assert_eq!(sum.n_pairs, 1);
        assert_eq!(sum.operated_mean, Some(70.0));
        assert_eq!(sum.healthy_mean, Some(110.0));
        assert_eq!(sum.diff_pct, Some(-50.0));
    }

    #[test]
    fn extreme_differences_are_counted_not_clamped() {
        let opts = AnalysisOptions { extreme_diff_pct: 100.0 };
        let mut s = PairedSamples::default();
        s.record("t", 1, Some(30.0), Some(10.0), &opts);
        let sum = s.summarize("t", MAGNITUDE_DIGITS);
        assert_eq!(sum.diff_pct, Some(200.0));
        assert_eq!(sum.n_extreme, 1);
    }
}
