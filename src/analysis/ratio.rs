use tracing::debug;

use super::catalog::{RatioDefinition, RatioOperand};
use super::phase::PhaseSchema;
use super::record::{PhaseDataset, PhaseRecord};
use super::side::Suffix;
use super::stats::{PairedSamples, SideSummary, RATIO_DIGITS};
use super::AnalysisOptions;

fn operand_value(operand: RatioOperand, rec: &PhaseRecord, suffix: Suffix) -> Option<f64> {
    match operand {
        RatioOperand::Test(base) => rec.bilateral(base, suffix),
        RatioOperand::Sum(short, long) => {
            let sum = rec.bilateral(short, suffix).unwrap_or(0.0)
                + rec.bilateral(long, suffix).unwrap_or(0.0);
            (sum != 0.0).then_some(sum)
        }
    }
}

fn recorded(def: &RatioDefinition, schema: &PhaseSchema) -> bool {
    let ok = def
        .numerator
        .bases()
        .into_iter()
        .chain(def.denominator.bases())
        .all(|base| schema.is_bilateral(base));
    if !ok {
        debug!(phase = %schema.phase(), ratio = def.label, "ratio operands not recorded in this phase");
    }
    ok
}

/// Ratio of one patient on one side.
pub fn side_ratio(def: &RatioDefinition, rec: &PhaseRecord, suffix: Suffix) -> Option<f64> {
    ratio(
        operand_value(def.numerator, rec, suffix),
        operand_value(def.denominator, rec, suffix),
    )
}

/// `numerator / denominator`, absent when either side is absent or the denominator is 0.
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => {
            let r = n / d;
            r.is_finite().then_some(r)
        }
        _ => None,
    }
}

/// Per-patient ratios on both sides, averaged per ratio.
///
/// The percentage difference is taken between each patient's operated and healthy
/// ratio and then averaged, not derived from the two averaged ratios. Ratios whose
/// operands this phase does not record are skipped; a recorded ratio without data is
/// still listed with empty means.
pub fn aggregate_ratios(
    dataset: &PhaseDataset,
    ratios: &[RatioDefinition],
    options: &AnalysisOptions,
) -> Vec<SideSummary> {
    let schema = dataset.phase.schema();

    ratios
        .iter()
        .filter(|def| recorded(def, schema))
        .map(|def| {
            let mut samples = PairedSamples::default();
            for rec in &dataset.records {
                let Some(pair) = rec.sides() else { continue };
                samples.record(
                    def.label,
                    rec.injury_id,
                    side_ratio(def, rec, pair.operated),
                    side_ratio(def, rec, pair.healthy),
                    options,
                );
            }
            samples.summarize(def.label, RATIO_DIGITS)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::catalog::STRENGTH_RATIOS;
    use crate::analysis::phase::Phase;
    use crate::analysis::side::Side;
    use serde_json::{json, Value};

    fn rec(id: i64, side: Side, v: Value) -> PhaseRecord {
        PhaseRecord::from_row(Phase::Week6, id, side, v.as_object().unwrap())
    }

    fn by_label<'a>(out: &'a [SideSummary], label: &str) -> &'a SideSummary {
        out.iter().find(|s| s.label == label).unwrap()
    }

    #[test]
    fn ratio_needs_both_operands() {
        assert_eq!(ratio(Some(1.0), Some(4.0)), Some(0.25));
        assert_eq!(ratio(Some(1.0), None), None);
        assert_eq!(ratio(None, Some(4.0)), None);
        assert_eq!(ratio(Some(1.0), Some(0.0)), None);
    }

    #[test]
    fn hq_ratio_on_both_sides() {
        let ds = PhaseDataset::new(
            Phase::Week6,
            vec![rec(
                1,
                Side::Right,
                json!({
                    "kracht_hamstrings_30_r": 30, "kracht_quadriceps_60_r": 60,
                    "kracht_hamstrings_30_l": 40, "kracht_quadriceps_60_l": 80
                }),
            )],
        );
        let out = aggregate_ratios(&ds, STRENGTH_RATIOS, &AnalysisOptions::default());
        let hq = by_label(&out, "H/Q");
        assert_eq!(hq.operated_mean, Some(0.5));
        assert_eq!(hq.healthy_mean, Some(0.5));
        assert_eq!(hq.diff_pct, Some(0.0));
        assert_eq!(hq.n_pairs, 1);
    }

    #[test]
    fn composite_sums_heads_with_missing_part_as_zero() {
        let ds = PhaseDataset::new(
            Phase::Week6,
            vec![rec(
                1,
                Side::Left,
                json!({
                    "kracht_adductoren_kort_l": 30, "kracht_adductoren_lang_l": 10,
                    "kracht_abductoren_kort_l": 20,
                    "kracht_adductoren_kort_r": 0, "kracht_adductoren_lang_r": 0,
                    "kracht_abductoren_kort_r": 20, "kracht_abductoren_lang_r": 20
                }),
            )],
        );
        let out = aggregate_ratios(&ds, STRENGTH_RATIOS, &AnalysisOptions::default());
        let add_abd = by_label(&out, "ADD/ABD");
        assert_eq!(add_abd.operated_mean, Some(2.0));
        // all-zero numerator is absent, not a ratio of 0
        assert_eq!(add_abd.healthy_mean, None);
        assert_eq!(add_abd.n_healthy, 0);
        assert_eq!(add_abd.diff_pct, None);
    }

    #[test]
    fn empty_ratio_is_still_listed() {
        let ds = PhaseDataset::new(Phase::Week6, vec![rec(1, Side::Left, json!({}))]);
        let out = aggregate_ratios(&ds, STRENGTH_RATIOS, &AnalysisOptions::default());
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|s| s.operated_mean.is_none() && s.n_operated == 0));
    }

    #[test]
    fn ratios_are_skipped_where_operands_are_not_recorded() {
        let ds = PhaseDataset::empty(Phase::Baseline);
        assert!(aggregate_ratios(&ds, STRENGTH_RATIOS, &AnalysisOptions::default()).is_empty());
    }
}
