use revo_sport_api::analysis::bilateral::aggregate_tests;
use revo_sport_api::analysis::catalog::{STRENGTH_RATIOS, STRENGTH_TESTS};
use revo_sport_api::analysis::hop::hop_cluster;
use revo_sport_api::analysis::ratio::aggregate_ratios;
use revo_sport_api::analysis::report::strength_report;
use revo_sport_api::analysis::{AnalysisOptions, Cohort, Phase, PhaseDataset, PhaseRecord, Side, SideSummary};
use serde_json::{json, Value};

fn record(phase: Phase, injury_id: i64, side: Side, row: Value) -> PhaseRecord {
    PhaseRecord::from_row(phase, injury_id, side, row.as_object().expect("object row"))
}

fn find<'a>(out: &'a [SideSummary], label: &str) -> &'a SideSummary {
    out.iter()
        .find(|s| s.label == label)
        .unwrap_or_else(|| panic!("{label} missing from {out:?}"))
}

#[test]
fn left_operated_quadriceps_through_the_phase_report() {
    let cohort = Cohort::new(vec![PhaseDataset::new(
        Phase::Week6,
        vec![record(
            Phase::Week6,
            1,
            Side::Left,
            json!({ "kracht_quadriceps_60_l": 80, "kracht_quadriceps_60_r": 100 }),
        )],
    )]);

    let report = strength_report(&cohort, &AnalysisOptions::default());
    let week6 = report.iter().find(|p| p.id.phase == Phase::Week6).expect("week 6 block");
    let quad = find(&week6.tests, "Quadriceps 60");

    assert_eq!(quad.operated_mean, Some(80.0));
    assert_eq!(quad.healthy_mean, Some(100.0));
    assert_eq!(quad.diff_pct, Some(-20.0));
    assert_eq!((quad.n_operated, quad.n_healthy, quad.n_pairs), (1, 1, 1));
}

#[test]
fn zero_healthy_value_is_absent() {
    let ds = PhaseDataset::new(
        Phase::Week6,
        vec![record(
            Phase::Week6,
            1,
            Side::Left,
            json!({ "kracht_quadriceps_60_l": 80, "kracht_quadriceps_60_r": 0 }),
        )],
    );

    let out = aggregate_tests(&ds, STRENGTH_TESTS, &AnalysisOptions::default());
    let quad = find(&out, "Quadriceps 60");

    assert_eq!(quad.operated_mean, Some(80.0));
    assert_eq!(quad.healthy_mean, None);
    assert_eq!(quad.diff_pct, None);
    assert_eq!((quad.n_operated, quad.n_healthy, quad.n_pairs), (1, 0, 0));
}

#[test]
fn hq_ratio_is_averaged_over_patients() {
    let ds = PhaseDataset::new(
        Phase::Week6,
        vec![
            record(
                Phase::Week6,
                1,
                Side::Left,
                json!({ "kracht_hamstrings_30_l": 30, "kracht_quadriceps_60_l": 60 }),
            ),
            record(
                Phase::Week6,
                2,
                Side::Left,
                json!({ "kracht_hamstrings_30_l": 40, "kracht_quadriceps_60_l": 50 }),
            ),
        ],
    );

    let out = aggregate_ratios(&ds, STRENGTH_RATIOS, &AnalysisOptions::default());
    let hq = find(&out, "H/Q");

    assert_eq!(hq.operated_mean, Some(0.65));
    assert_eq!(hq.n_operated, 2);
    assert_eq!(hq.healthy_mean, None);
}

#[test]
fn all_zero_composite_numerator_gives_no_ratio() {
    let ds = PhaseDataset::new(
        Phase::Week6,
        vec![record(
            Phase::Week6,
            1,
            Side::Left,
            json!({
                "kracht_adductoren_kort_l": 0, "kracht_adductoren_lang_l": 0,
                "kracht_abductoren_kort_l": 20, "kracht_abductoren_lang_l": 25
            }),
        )],
    );

    let out = aggregate_ratios(&ds, STRENGTH_RATIOS, &AnalysisOptions::default());
    let add_abd = find(&out, "ADD/ABD");

    assert_eq!(add_abd.operated_mean, None);
    assert_eq!(add_abd.n_operated, 0);
}

#[test]
fn hop_cluster_lsi_at_month_six() {
    let ds = PhaseDataset::new(
        Phase::Month6,
        vec![record(
            Phase::Month6,
            1,
            Side::Left,
            json!({
                "cmj_hoogte_l": 40, "cmj_hoogte_r": 50,
                "single_hop_distance_l": 90, "single_hop_distance_r": 100
            }),
        )],
    );

    let cluster = hop_cluster(&ds);
    let cmj = cluster.subtests.iter().find(|s| s.key == "cmj_hoogte").expect("cmj subtest");

    assert_eq!(cmj.label, "CMJ");
    assert_eq!(cmj.mean_lsi, Some(80.0));
    assert_eq!(cmj.n, 1);
    // pooled with the single hop LSI of 90
    assert_eq!(cluster.mean_lsi, Some(85.0));
    assert_eq!(cluster.n, 2);
}

#[test]
fn percent_difference_is_a_mean_of_per_patient_differences() {
    let ds = PhaseDataset::new(
        Phase::Week6,
        vec![
            // -20 %
            record(
                Phase::Week6,
                1,
                Side::Left,
                json!({ "kracht_soleus_l": 80, "kracht_soleus_r": 100 }),
            ),
            // +50 %
            record(
                Phase::Week6,
                2,
                Side::Right,
                json!({ "kracht_soleus_l": 60, "kracht_soleus_r": 90 }),
            ),
        ],
    );

    let out = aggregate_tests(&ds, STRENGTH_TESTS, &AnalysisOptions::default());
    let soleus = find(&out, "Soleus");

    assert_eq!(soleus.operated_mean, Some(85.0));
    assert_eq!(soleus.healthy_mean, Some(80.0));
    // the ratio of the two means would give 6.25 %
    assert_eq!(soleus.diff_pct, Some(15.0));
}

#[test]
fn tests_without_any_data_are_left_out() {
    let ds = PhaseDataset::new(
        Phase::Month45,
        vec![record(Phase::Month45, 1, Side::Right, json!({ "kracht_nordics_l": 0 }))],
    );

    assert!(aggregate_tests(&ds, STRENGTH_TESTS, &AnalysisOptions::default()).is_empty());
}

#[test]
fn tied_means_round_to_even() {
    let ds = PhaseDataset::new(
        Phase::Week6,
        vec![
            record(
                Phase::Week6,
                1,
                Side::Left,
                json!({ "kracht_soleus_l": 82.0, "kracht_soleus_r": 100 }),
            ),
            record(
                Phase::Week6,
                2,
                Side::Left,
                json!({ "kracht_soleus_l": 82.5, "kracht_soleus_r": 100 }),
            ),
        ],
    );

    let out = aggregate_tests(&ds, STRENGTH_TESTS, &AnalysisOptions::default());
    let soleus = find(&out, "Soleus");

    // 82.25 -> 82.2
    assert_eq!(soleus.operated_mean, Some(82.2));
    assert_eq!(soleus.healthy_mean, Some(100.0));
}
