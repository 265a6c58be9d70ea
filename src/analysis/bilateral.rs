use serde::Serialize;
use tracing::debug;

use super::catalog::TestDefinition;
use super::phase::FieldShape;
use super::record::PhaseDataset;
use super::stats::{rounded_mean, PairedSamples, SideSummary, MAGNITUDE_DIGITS};
use super::AnalysisOptions;

/// How a test is read on this phase, fixed before any record is visited.
#[derive(Debug, Clone, Copy)]
enum Accessor {
    /// `_l`/`_r` columns, mapped through the injury's side
    Sided,
    /// one column holding the operated limb's value
    OperatedOnly,
}

fn plan<'a>(
    dataset: &PhaseDataset,
    tests: &'a [TestDefinition],
) -> Vec<(&'a TestDefinition, Accessor)> {
    let schema = dataset.phase.schema();
    tests
        .iter()
        .filter_map(|t| match schema.shape(t.base) {
            Some(FieldShape::Bilateral) => Some((t, Accessor::Sided)),
            Some(FieldShape::Single) => Some((t, Accessor::OperatedOnly)),
            _ => {
                debug!(phase = %dataset.phase, test = t.base, "test not recorded in this phase");
                None
            }
        })
        .collect()
}

/// Operated versus healthy aggregate per test.
///
/// Tests the phase does not record are skipped; tests without a single valid value are
/// omitted from the output. Single-valued fields are the operated limb's value and are
/// reported without a healthy side.
pub fn aggregate_tests(
    dataset: &PhaseDataset,
    tests: &[TestDefinition],
    options: &AnalysisOptions,
) -> Vec<SideSummary> {
    let mut out = Vec::new();

    for (test, accessor) in plan(dataset, tests) {
        let mut samples = PairedSamples::default();

        for rec in &dataset.records {
            match accessor {
                Accessor::Sided => {
                    let Some(pair) = rec.sides() else { continue };
                    samples.record(
                        test.label,
                        rec.injury_id,
                        rec.bilateral(test.base, pair.operated),
                        rec.bilateral(test.base, pair.healthy),
                        options,
                    );
                }
                Accessor::OperatedOnly => {
                    samples.record(test.label, rec.injury_id, rec.single(test.base), None, options);
                }
            }
        }

        if samples.is_empty() {
            continue;
        }
        out.push(samples.summarize(test.label, MAGNITUDE_DIGITS));
    }

    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub label: String,
    pub mean: Option<f64>,
    pub n: usize,
}

/// Plain group mean of single-valued tests that belong to neither side (two-leg jumps).
/// `n` counts the values behind the mean, so a recorded 0 is not counted.
pub fn aggregate_group_means(dataset: &PhaseDataset, tests: &[TestDefinition]) -> Vec<GroupMean> {
    let schema = dataset.phase.schema();
    tests
        .iter()
        .filter(|t| schema.is_single(t.base))
        .map(|t| {
            let values: Vec<f64> = dataset.records.iter().filter_map(|r| r.single(t.base)).collect();
            GroupMean {
                label: t.label.to_string(),
                mean: rounded_mean(&values, MAGNITUDE_DIGITS),
                n: values.len(),
            }
        })
        .collect()
}
