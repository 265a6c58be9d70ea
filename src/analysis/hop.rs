use serde::Serialize;

use super::catalog::{TestDefinition, HOP_CLUSTER_TESTS};
use super::record::PhaseDataset;
use super::stats::{rounded_mean, PERCENT_DIGITS};

/// Limb symmetry index: operated as a percentage of healthy.
pub fn lsi(operated: Option<f64>, healthy: Option<f64>) -> Option<f64> {
    match (operated, healthy) {
        (Some(o), Some(h)) if h != 0.0 => {
            let v = o / h * 100.0;
            v.is_finite().then_some(v)
        }
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HopSubtest {
    pub key: String,
    pub label: String,
    pub mean_lsi: Option<f64>,
    pub n: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HopCluster {
    /// Mean over every subtest LSI of every patient.
    pub mean_lsi: Option<f64>,
    pub n: usize,
    pub subtests: Vec<HopSubtest>,
}

/// LSI cluster over the hop tests this phase records.
pub fn hop_cluster(dataset: &PhaseDataset) -> HopCluster {
    hop_cluster_of(dataset, HOP_CLUSTER_TESTS)
}

pub fn hop_cluster_of(dataset: &PhaseDataset, tests: &[TestDefinition]) -> HopCluster {
    let schema = dataset.phase.schema();
    let mut pooled = Vec::new();
    let mut subtests = Vec::new();

    for test in tests.iter().filter(|t| schema.is_bilateral(t.base)) {
        let values: Vec<f64> = dataset
            .records
            .iter()
            .filter_map(|rec| {
                let pair = rec.sides()?;
                lsi(
                    rec.bilateral(test.base, pair.operated),
                    rec.bilateral(test.base, pair.healthy),
                )
            })
            .collect();

        subtests.push(HopSubtest {
            key: test.base.to_string(),
            label: test.label.to_string(),
            mean_lsi: rounded_mean(&values, PERCENT_DIGITS),
            n: values.len(),
        });
        pooled.extend(values);
    }

    HopCluster {
        mean_lsi: rounded_mean(&pooled, PERCENT_DIGITS),
        n: pooled.len(),
        subtests,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::phase::Phase;
    use crate::analysis::record::PhaseRecord;
    use crate::analysis::side::Side;
    use serde_json::json;

    #[test]
    fn lsi_is_operated_over_healthy() {
        assert_eq!(lsi(Some(45.0), Some(50.0)), Some(90.0));
        assert_eq!(lsi(Some(45.0), None), None);
        assert_eq!(lsi(Some(45.0), Some(0.0)), None);
    }

    #[test]
    fn overall_mean_pools_all_subtests() {
        let row = json!({
            "cmj_hoogte_l": 45, "cmj_hoogte_r": 50,
            "single_hop_distance_l": 100, "single_hop_distance_r": 100,
            "sidehop_l": 0, "sidehop_r": 30
        });
        let ds = PhaseDataset::new(
            Phase::Month6,
            vec![PhaseRecord::from_row(Phase::Month6, 1, Side::Left, row.as_object().unwrap())],
        );
        let cluster = hop_cluster(&ds);
        assert_eq!(cluster.subtests.len(), 3);
        assert_eq!(cluster.subtests[0].mean_lsi, Some(90.0));
        assert_eq!(cluster.subtests[1].mean_lsi, Some(100.0));
        assert_eq!(cluster.subtests[2].mean_lsi, None);
        assert_eq!(cluster.subtests[2].n, 0);
        assert_eq!(cluster.mean_lsi, Some(95.0));
        assert_eq!(cluster.n, 2);
    }

    #[test]
    fn side_hop_is_left_out_before_month6() {
        let cluster = hop_cluster(&PhaseDataset::empty(Phase::Month45));
        let keys: Vec<_> = cluster.subtests.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["cmj_hoogte", "single_hop_distance"]);
        assert_eq!(cluster.mean_lsi, None);
    }
}
