use std::collections::BTreeMap;

use serde::Serialize;

use super::bilateral::{aggregate_group_means, aggregate_tests, GroupMean};
use super::catalog::{
    BASELINE_SCREENING, FUNCTIONAL_TESTS, GIRTH_TESTS, MOBILITY_TESTS, ONE_LEG_JUMP_TESTS,
    STRENGTH_RATIOS, STRENGTH_TESTS, TWO_LEG_JUMP_TESTS,
};
use super::hop::{hop_cluster, HopCluster};
use super::phase::Phase;
use super::record::PhaseDataset;
use super::stats::{round_to, SideSummary, PERCENT_DIGITS};
use super::AnalysisOptions;

/// Every phase's record set for one request. Phases without rows hold an empty dataset.
#[derive(Debug, Clone)]
pub struct Cohort {
    datasets: Vec<PhaseDataset>,
}

impl Cohort {
    pub fn new(datasets: impl IntoIterator<Item = PhaseDataset>) -> Self {
        let mut slots: Vec<PhaseDataset> = Phase::ALL.into_iter().map(PhaseDataset::empty).collect();
        for ds in datasets {
            let slot = &mut slots[ds.phase as usize];
            slot.records.extend(ds.records);
        }
        Self { datasets: slots }
    }

    pub fn dataset(&self, phase: Phase) -> &PhaseDataset {
        &self.datasets[phase as usize]
    }

    /// Same cohort, limited to the given injuries.
    pub fn restrict(&self, injury_ids: &[i64]) -> Self {
        Self {
            datasets: self.datasets.iter().map(|d| d.for_injuries(injury_ids)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.iter().all(|d| d.records.is_empty())
    }
}

/// Phase identifier as it appears in every report block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseId {
    pub phase: Phase,
    pub label: &'static str,
}

impl From<Phase> for PhaseId {
    fn from(phase: Phase) -> Self {
        Self { phase, label: phase.label() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StrengthPhase {
    #[serde(flatten)]
    pub id: PhaseId,
    pub tests: Vec<SideSummary>,
    pub ratios: Vec<SideSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsPhase {
    #[serde(flatten)]
    pub id: PhaseId,
    pub anthropometry: Vec<SideSummary>,
    pub mobility: Vec<SideSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionalPhase {
    #[serde(flatten)]
    pub id: PhaseId,
    pub functional: Vec<SideSummary>,
    pub jumps: Vec<SideSummary>,
    pub jumps_two_leg: Vec<GroupMean>,
    pub hop_cluster: Option<HopCluster>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub value: String,
    pub count: usize,
    pub pct: f64,
}

/// Distribution of one categorical baseline item. `None` shares when nothing was filled in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDistribution {
    pub key: String,
    pub label: String,
    pub n: usize,
    pub shares: Option<Vec<CategoryShare>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionalReport {
    pub baseline: Vec<CategoryDistribution>,
    pub phases: Vec<FunctionalPhase>,
}

/// Strength tests and ratios for every follow-up phase.
pub fn strength_report(cohort: &Cohort, options: &AnalysisOptions) -> Vec<StrengthPhase> {
    Phase::FOLLOW_UP
        .into_iter()
        .map(|phase| {
            let ds = cohort.dataset(phase);
            StrengthPhase {
                id: phase.into(),
                tests: aggregate_tests(ds, STRENGTH_TESTS, options),
                ratios: super::ratio::aggregate_ratios(ds, STRENGTH_RATIOS, options),
            }
        })
        .collect()
}

/// Girth and knee mobility for all five phases.
pub fn metrics_report(cohort: &Cohort, options: &AnalysisOptions) -> Vec<MetricsPhase> {
    Phase::ALL
        .into_iter()
        .map(|phase| {
            let ds = cohort.dataset(phase);
            MetricsPhase {
                id: phase.into(),
                anthropometry: aggregate_tests(ds, GIRTH_TESTS, options),
                mobility: aggregate_tests(ds, MOBILITY_TESTS, options),
            }
        })
        .collect()
}

pub fn functional_phases(cohort: &Cohort, options: &AnalysisOptions) -> Vec<FunctionalPhase> {
    Phase::FOLLOW_UP
        .into_iter()
        .map(|phase| {
            let ds = cohort.dataset(phase);
            FunctionalPhase {
                id: phase.into(),
                functional: aggregate_tests(ds, FUNCTIONAL_TESTS, options),
                jumps: aggregate_tests(ds, ONE_LEG_JUMP_TESTS, options),
                jumps_two_leg: aggregate_group_means(ds, TWO_LEG_JUMP_TESTS),
                hop_cluster: (phase == Phase::TERMINAL).then(|| hop_cluster(ds)),
            }
        })
        .collect()
}

/// Baseline screening distribution plus functional and jump tests per follow-up phase.
pub fn functional_report(cohort: &Cohort, options: &AnalysisOptions) -> FunctionalReport {
    FunctionalReport {
        baseline: baseline_screening(cohort.dataset(Phase::Baseline)),
        phases: functional_phases(cohort, options),
    }
}

pub fn baseline_screening(dataset: &PhaseDataset) -> Vec<CategoryDistribution> {
    BASELINE_SCREENING
        .iter()
        .map(|item| {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for rec in &dataset.records {
                if let Some(v) = rec.category(item.base) {
                    *counts.entry(v).or_default() += 1;
                }
            }
            let n: usize = counts.values().sum();
            let shares = (n > 0).then(|| {
                counts
                    .into_iter()
                    .map(|(value, count)| CategoryShare {
                        value: value.to_string(),
                        count,
                        pct: round_to(count as f64 / n as f64 * 100.0, PERCENT_DIGITS),
                    })
                    .collect()
            });
            CategoryDistribution {
                key: item.base.to_string(),
                label: item.label.to_string(),
                n,
                shares,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::record::PhaseRecord;
    use crate::analysis::side::Side;
    use serde_json::{json, Value};

    fn rec(phase: Phase, id: i64, v: Value) -> PhaseRecord {
        PhaseRecord::from_row(phase, id, Side::Left, v.as_object().unwrap())
    }

    #[test]
    fn cohort_fills_missing_phases() {
        let cohort = Cohort::new(vec![PhaseDataset::new(
            Phase::Month3,
            vec![rec(Phase::Month3, 1, json!({}))],
        )]);
        assert_eq!(cohort.dataset(Phase::Month3).records.len(), 1);
        assert!(cohort.dataset(Phase::Week6).records.is_empty());
        assert!(cohort.restrict(&[2]).is_empty());
    }

    #[test]
    fn strength_report_follows_phase_capabilities() {
        let cohort = Cohort::new(vec![
            PhaseDataset::new(
                Phase::Week6,
                vec![rec(Phase::Week6, 1, json!({ "kracht_quadriceps_60_l": 80, "kracht_quadriceps_60_r": 100 }))],
            ),
            PhaseDataset::new(
                Phase::Month45,
                vec![rec(Phase::Month45, 1, json!({ "kracht_nordics_l": 200, "kracht_nordics_r": 250 }))],
            ),
        ]);
        let report = strength_report(&cohort, &AnalysisOptions::default());
        let phases: Vec<_> = report.iter().map(|p| p.id.phase).collect();
        assert_eq!(phases, Phase::FOLLOW_UP.to_vec());
        assert_eq!(report[0].tests[0].diff_pct, Some(-20.0));
        assert_eq!(report[2].tests[0].label, "Nordics");
        assert_eq!(report[2].tests[0].diff_pct, Some(-20.0));
    }

    #[test]
    fn hop_cluster_only_at_the_last_phase() {
        let report = functional_report(&Cohort::new(Vec::new()), &AnalysisOptions::default());
        let with_cluster: Vec<_> = report
            .phases
            .iter()
            .filter(|p| p.hop_cluster.is_some())
            .map(|p| p.id.phase)
            .collect();
        assert_eq!(with_cluster, vec![Phase::Month6]);
    }

    #[test]
    fn baseline_screening_percentages() {
        let ds = PhaseDataset::new(
            Phase::Baseline,
            vec![
                rec(Phase::Baseline, 1, json!({ "lag_test": "Ja" })),
                rec(Phase::Baseline, 2, json!({ "lag_test": "Nee" })),
                rec(Phase::Baseline, 3, json!({ "lag_test": "Nee" })),
            ],
        );
        let out = baseline_screening(&ds);
        assert_eq!(out[0].n, 3);
        let shares = out[0].shares.as_ref().unwrap();
        assert_eq!(shares[0], CategoryShare { value: "Ja".into(), count: 1, pct: 33.3 });
        assert_eq!(shares[1].pct, 66.7);
        assert_eq!(out[1].shares, None);
    }

    #[test]
    fn phase_blocks_serialize_flat() {
        let report = metrics_report(&Cohort::new(Vec::new()), &AnalysisOptions::default());
        let v = serde_json::to_value(&report[1]).unwrap();
        assert_eq!(v["phase"], "week6");
        assert_eq!(v["label"], "Week 6");
        assert!(v["mobility"].as_array().unwrap().is_empty());
    }
}
