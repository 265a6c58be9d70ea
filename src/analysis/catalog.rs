// Test and ratio definitions. These are candidates: each phase keeps only the ones its
// schema actually records.

/// One measurable quantity: display label and field base-name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestDefinition {
    pub label: &'static str,
    pub base: &'static str,
}

const fn test(label: &'static str, base: &'static str) -> TestDefinition {
    TestDefinition { label, base }
}

/// One side of a ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioOperand {
    /// a single test's value
    Test(&'static str),
    /// short + long head of a muscle group, missing parts counted as 0
    Sum(&'static str, &'static str),
}

impl RatioOperand {
    pub fn bases(&self) -> Vec<&'static str> {
        match *self {
            RatioOperand::Test(base) => vec![base],
            RatioOperand::Sum(short, long) => vec![short, long],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioDefinition {
    pub label: &'static str,
    pub numerator: RatioOperand,
    pub denominator: RatioOperand,
}

pub const STRENGTH_TESTS: &[TestDefinition] = &[
    test("Quadriceps 60", "kracht_quadriceps_60"),
    test("Hamstrings 30", "kracht_hamstrings_30"),
    test("Soleus", "kracht_soleus"),
    test("Abductoren kort", "kracht_abductoren_kort"),
    test("Abductoren lang", "kracht_abductoren_lang"),
    test("Adductoren kort", "kracht_adductoren_kort"),
    test("Adductoren lang", "kracht_adductoren_lang"),
    test("Hamstrings 90/90", "kracht_hamstrings_90_90"),
    test("Exorotatoren heup", "kracht_exorotatoren_heup"),
    test("Nordics", "kracht_nordics"),
];

pub const STRENGTH_RATIOS: &[RatioDefinition] = &[
    RatioDefinition {
        label: "H/Q",
        numerator: RatioOperand::Test("kracht_hamstrings_30"),
        denominator: RatioOperand::Test("kracht_quadriceps_60"),
    },
    RatioDefinition {
        label: "ADD/ABD",
        numerator: RatioOperand::Sum("kracht_adductoren_kort", "kracht_adductoren_lang"),
        denominator: RatioOperand::Sum("kracht_abductoren_kort", "kracht_abductoren_lang"),
    },
];

pub const GIRTH_TESTS: &[TestDefinition] = &[
    test("Omtrek 5 cm boven patella", "omtrek_5cm_boven_patella"),
    test("Omtrek 10 cm boven patella", "omtrek_10cm_boven_patella"),
    test("Omtrek 20 cm boven patella", "omtrek_20cm_boven_patella"),
];

pub const MOBILITY_TESTS: &[TestDefinition] = &[
    test("Knie flexie", "knie_flexie"),
    test("Knie extensie", "knie_extensie"),
];

pub const FUNCTIONAL_TESTS: &[TestDefinition] = &[
    test("Step Down – Valgus Score", "stepdown_valgus_score"),
    test("Step Down – Pelvis Controle", "stepdown_pelvische_controle"),
    test("Squat Forceplate", "squat_forceplate"),
    test("Single Hop Distance", "single_hop_distance"),
    test("Side Hop", "sidehop"),
];

pub const ONE_LEG_JUMP_TESTS: &[TestDefinition] = &[
    test("CMJ 2-benig Steunname Landing", "cmj_asymmetrie"),
    test("CMJ 1-been Hoogte", "cmj_hoogte"),
    test("Drop Jump 1-been Hoogte", "dropjump_hoogte"),
    test("Drop Jump 1-been RSI", "dropjump_rsi"),
    test("Drop Jump 2-benig Steunname Landing", "dropjump_steunname_landing"),
];

/// Two-leg jumps: one value per patient, reported as a plain group mean.
pub const TWO_LEG_JUMP_TESTS: &[TestDefinition] = &[
    test("CMJ 2-benig Hoogte", "cmj_hoogte_2benig"),
    test("Drop Jump 2-benig Hoogte", "dropjump_hoogte_2benig"),
];

/// Components of the limb-symmetry cluster. The base doubles as the subtest key.
pub const HOP_CLUSTER_TESTS: &[TestDefinition] = &[
    test("CMJ", "cmj_hoogte"),
    test("Single Hop Distance", "single_hop_distance"),
    test("Side Hop", "sidehop"),
];

/// Categorical screening items recorded at baseline.
pub const BASELINE_SCREENING: &[TestDefinition] = &[
    test("Lag test", "lag_test"),
    test("VMO activatie", "vmo_activatie"),
];
