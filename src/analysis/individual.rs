use chrono::NaiveDate;
use serde::Serialize;

use super::hop::HopCluster;
use super::phase::Phase;
use super::report::{
    functional_phases, metrics_report, strength_report, Cohort, FunctionalPhase, MetricsPhase,
    PhaseId, StrengthPhase,
};
use super::AnalysisOptions;

/// A phase that has a record for one injury.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentPhase {
    pub blessure_id: i64,
    #[serde(flatten)]
    pub id: PhaseId,
    pub examined_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientOverview {
    pub injury_count: usize,
    pub phase_count: usize,
    pub present_phases: Vec<PresentPhase>,
    pub latest_examination: Option<NaiveDate>,
    pub latest_phase: Option<PresentPhase>,
}

/// Which phases exist for the given injuries, and the most recent examination.
pub fn overview(cohort: &Cohort, injury_ids: &[i64]) -> PatientOverview {
    let mut present = Vec::new();
    for &id in injury_ids {
        for phase in Phase::ALL {
            if let Some(rec) = cohort.dataset(phase).records.iter().find(|r| r.injury_id == id) {
                present.push(PresentPhase {
                    blessure_id: id,
                    id: phase.into(),
                    examined_on: rec.examined_on,
                });
            }
        }
    }

    // first one wins on equal dates, so an earlier phase is kept
    let latest = present
        .iter()
        .filter(|p| p.examined_on.is_some())
        .fold(None::<&PresentPhase>, |best, p| match best {
            Some(b) if b.examined_on >= p.examined_on => Some(b),
            _ => Some(p),
        })
        .cloned();

    PatientOverview {
        injury_count: injury_ids.len(),
        phase_count: present.len(),
        latest_examination: latest.as_ref().and_then(|p| p.examined_on),
        latest_phase: latest,
        present_phases: present,
    }
}

/// Analysis blocks of one injury.
#[derive(Debug, Clone, Serialize)]
pub struct InjuryAnalysis<T> {
    pub blessure_id: i64,
    pub phases: T,
}

fn per_injury<T>(
    cohort: &Cohort,
    injury_ids: &[i64],
    build: impl Fn(&Cohort) -> T,
) -> Vec<InjuryAnalysis<T>> {
    injury_ids
        .iter()
        .map(|&id| InjuryAnalysis {
            blessure_id: id,
            phases: build(&cohort.restrict(&[id])),
        })
        .collect()
}

pub fn strength_by_injury(
    cohort: &Cohort,
    injury_ids: &[i64],
    options: &AnalysisOptions,
) -> Vec<InjuryAnalysis<Vec<StrengthPhase>>> {
    per_injury(cohort, injury_ids, |c| strength_report(c, options))
}

pub fn metrics_by_injury(
    cohort: &Cohort,
    injury_ids: &[i64],
    options: &AnalysisOptions,
) -> Vec<InjuryAnalysis<Vec<MetricsPhase>>> {
    per_injury(cohort, injury_ids, |c| metrics_report(c, options))
}

pub fn functional_by_injury(
    cohort: &Cohort,
    injury_ids: &[i64],
    options: &AnalysisOptions,
) -> Vec<InjuryAnalysis<Vec<FunctionalPhase>>> {
    per_injury(cohort, injury_ids, |c| functional_phases(c, options))
}

/// Terminal-phase hop cluster per injury, for the dashboard.
pub fn hop_by_injury(cohort: &Cohort, injury_ids: &[i64]) -> Vec<InjuryAnalysis<HopCluster>> {
    per_injury(cohort, injury_ids, |c| super::hop::hop_cluster(c.dataset(Phase::TERMINAL)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::record::{PhaseDataset, PhaseRecord};
    use crate::analysis::side::Side;
    use serde_json::{json, Value};

    fn rec(phase: Phase, id: i64, v: Value) -> PhaseRecord {
        PhaseRecord::from_row(phase, id, Side::Right, v.as_object().unwrap())
    }

    fn cohort() -> Cohort {
        Cohort::new(vec![
            PhaseDataset::new(
                Phase::Baseline,
                vec![
                    rec(Phase::Baseline, 1, json!({ "datum_onderzoek": "2025-01-10" })),
                    rec(Phase::Baseline, 9, json!({ "datum_onderzoek": "2025-09-01" })),
                ],
            ),
            PhaseDataset::new(
                Phase::Week6,
                vec![rec(
                    Phase::Week6,
                    1,
                    json!({
                        "datum_onderzoek": "2025-03-01",
                        "kracht_quadriceps_60_l": 100, "kracht_quadriceps_60_r": 90
                    }),
                )],
            ),
            PhaseDataset::new(Phase::Month3, vec![rec(Phase::Month3, 2, json!({}))]),
        ])
    }

    #[test]
    fn overview_finds_latest_examination() {
        let o = overview(&cohort(), &[1, 2]);
        assert_eq!(o.injury_count, 2);
        assert_eq!(o.phase_count, 3);
        assert_eq!(o.latest_examination, NaiveDate::from_ymd_opt(2025, 3, 1));
        let latest = o.latest_phase.unwrap();
        assert_eq!(latest.blessure_id, 1);
        assert_eq!(latest.id.phase, Phase::Week6);
    }

    #[test]
    fn overview_without_dates() {
        let o = overview(&cohort(), &[2]);
        assert_eq!(o.phase_count, 1);
        assert_eq!(o.latest_examination, None);
        assert_eq!(o.latest_phase, None);
    }

    #[test]
    fn analysis_is_split_per_injury() {
        let out = strength_by_injury(&cohort(), &[1, 2], &AnalysisOptions::default());
        assert_eq!(out.len(), 2);
        let week6 = &out[0].phases[0];
        assert_eq!(week6.tests[0].operated_mean, Some(90.0));
        assert_eq!(week6.tests[0].healthy_mean, Some(100.0));
        assert!(out[1].phases[0].tests.is_empty());
    }
}
