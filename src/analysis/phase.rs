use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The five fixed clinical checkpoints, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "baseline")]
    Baseline,
    #[serde(rename = "week6")]
    Week6,
    #[serde(rename = "maand3")]
    Month3,
    #[serde(rename = "maand45")]
    Month45,
    #[serde(rename = "maand6")]
    Month6,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Baseline,
        Phase::Week6,
        Phase::Month3,
        Phase::Month45,
        Phase::Month6,
    ];

    /// Phases after surgery, where strength and functional batteries are recorded.
    pub const FOLLOW_UP: [Phase; 4] = [Phase::Week6, Phase::Month3, Phase::Month45, Phase::Month6];

    /// The last checkpoint; the hop cluster is only computed here.
    pub const TERMINAL: Phase = Phase::Month6;

    /// Table holding this phase's records. Also the route segment.
    pub fn table(self) -> &'static str {
        match self {
            Phase::Baseline => "baseline",
            Phase::Week6 => "week6",
            Phase::Month3 => "maand3",
            Phase::Month45 => "maand45",
            Phase::Month6 => "maand6",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Baseline => "Baseline",
            Phase::Week6 => "Week 6",
            Phase::Month3 => "Maand 3",
            Phase::Month45 => "Maand 4.5",
            Phase::Month6 => "Maand 6",
        }
    }

    pub fn schema(self) -> &'static PhaseSchema {
        &SCHEMAS[self as usize]
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown phase: {0}")]
pub struct UnknownPhase(pub String);

impl FromStr for Phase {
    type Err = UnknownPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|p| p.table() == s)
            .ok_or_else(|| UnknownPhase(s.to_string()))
    }
}

/// How a field is persisted in a phase table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// `<base>_l` and `<base>_r` numeric columns.
    Bilateral,
    /// One numeric column without side suffix.
    Single,
    /// Enumerated text column.
    Category,
    Date,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub base: &'static str,
    pub shape: FieldShape,
}

const fn bi(base: &'static str) -> FieldSpec {
    FieldSpec { base, shape: FieldShape::Bilateral }
}

const fn single(base: &'static str) -> FieldSpec {
    FieldSpec { base, shape: FieldShape::Single }
}

const fn cat(base: &'static str) -> FieldSpec {
    FieldSpec { base, shape: FieldShape::Category }
}

const fn date(base: &'static str) -> FieldSpec {
    FieldSpec { base, shape: FieldShape::Date }
}

pub const EXAMINATION_DATE: &str = "datum_onderzoek";

const EXAMINED: &[FieldSpec] = &[date(EXAMINATION_DATE)];

const MOBILITY_BOTH_KNEES: &[FieldSpec] = &[bi("knie_flexie"), bi("knie_extensie")];

// After surgery only the operated knee is measured
const MOBILITY_OPERATED_KNEE: &[FieldSpec] = &[single("knie_flexie"), single("knie_extensie")];

const GIRTH: &[FieldSpec] = &[
    bi("omtrek_5cm_boven_patella"),
    bi("omtrek_10cm_boven_patella"),
    bi("omtrek_20cm_boven_patella"),
];

const BASELINE_SCREENING: &[FieldSpec] = &[cat("lag_test"), cat("vmo_activatie")];

const STRENGTH_COMMON: &[FieldSpec] = &[
    bi("kracht_quadriceps_60"),
    bi("kracht_hamstrings_30"),
    bi("kracht_soleus"),
    bi("kracht_abductoren_kort"),
    bi("kracht_abductoren_lang"),
    bi("kracht_adductoren_kort"),
    bi("kracht_adductoren_lang"),
];

const STRENGTH_FROM_MONTH3: &[FieldSpec] =
    &[bi("kracht_hamstrings_90_90"), bi("kracht_exorotatoren_heup")];

const STRENGTH_FROM_MONTH45: &[FieldSpec] = &[bi("kracht_nordics")];

const MOVEMENT_CONTROL: &[FieldSpec] = &[
    bi("stepdown_valgus_score"),
    bi("stepdown_pelvische_controle"),
    bi("squat_forceplate"),
];

const DRIVING: &[FieldSpec] = &[cat("autorijden"), cat("autorijden_schakelen")];

const CMJ_FROM_MONTH3: &[FieldSpec] = &[bi("cmj_asymmetrie"), single("cmj_hoogte_2benig")];

const JUMPS_FROM_MONTH45: &[FieldSpec] = &[
    bi("cmj_hoogte"),
    single("cmj_lsi"),
    bi("dropjump_hoogte"),
    bi("dropjump_rsi"),
    single("dropjump_lsi"),
    bi("dropjump_steunname_landing"),
    single("dropjump_hoogte_2benig"),
    bi("single_hop_distance"),
];

const SIDE_HOP: &[FieldSpec] = &[bi("sidehop")];

const DRIVING_DATE: &[FieldSpec] = &[date("autorijden_datum")];

const WALKING_DATE: &[FieldSpec] = &[date("lopen_opstartdatum")];

const SESSIONS: &[FieldSpec] = &[single("aantal_sessies")];

fn layout(phase: Phase) -> Vec<&'static [FieldSpec]> {
    match phase {
        Phase::Baseline => vec![EXAMINED, MOBILITY_BOTH_KNEES, GIRTH, BASELINE_SCREENING],
        Phase::Week6 => vec![
            EXAMINED,
            MOBILITY_OPERATED_KNEE,
            GIRTH,
            STRENGTH_COMMON,
            MOVEMENT_CONTROL,
            DRIVING,
            DRIVING_DATE,
            SESSIONS,
        ],
        Phase::Month3 => vec![
            EXAMINED,
            MOBILITY_OPERATED_KNEE,
            GIRTH,
            STRENGTH_COMMON,
            STRENGTH_FROM_MONTH3,
            MOVEMENT_CONTROL,
            CMJ_FROM_MONTH3,
            DRIVING,
            SESSIONS,
        ],
        Phase::Month45 => vec![
            EXAMINED,
            WALKING_DATE,
            MOBILITY_OPERATED_KNEE,
            GIRTH,
            STRENGTH_COMMON,
            STRENGTH_FROM_MONTH3,
            STRENGTH_FROM_MONTH45,
            CMJ_FROM_MONTH3,
            JUMPS_FROM_MONTH45,
            SESSIONS,
        ],
        Phase::Month6 => vec![
            EXAMINED,
            MOBILITY_OPERATED_KNEE,
            GIRTH,
            STRENGTH_COMMON,
            STRENGTH_FROM_MONTH3,
            STRENGTH_FROM_MONTH45,
            CMJ_FROM_MONTH3,
            JUMPS_FROM_MONTH45,
            SIDE_HOP,
            SESSIONS,
        ],
    }
}

/// Column catalogue of one phase table.
///
/// Built once per phase; all "does this phase measure X" questions are answered here
/// instead of by probing records.
#[derive(Debug)]
pub struct PhaseSchema {
    phase: Phase,
    fields: Vec<FieldSpec>,
    by_base: HashMap<&'static str, FieldShape>,
}

static SCHEMAS: Lazy<[PhaseSchema; 5]> = Lazy::new(|| Phase::ALL.map(PhaseSchema::build));

impl PhaseSchema {
    fn build(phase: Phase) -> Self {
        let fields: Vec<FieldSpec> = layout(phase).into_iter().flatten().copied().collect();
        let by_base = fields.iter().map(|f| (f.base, f.shape)).collect();
        Self { phase, fields, by_base }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn shape(&self, base: &str) -> Option<FieldShape> {
        self.by_base.get(base).copied()
    }

    pub fn is_bilateral(&self, base: &str) -> bool {
        self.shape(base) == Some(FieldShape::Bilateral)
    }

    pub fn is_single(&self, base: &str) -> bool {
        self.shape(base) == Some(FieldShape::Single)
    }

    /// Physical column names, including the `_l`/`_r` expansion of bilateral fields.
    pub fn columns(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.fields.len() * 2);
        for f in &self.fields {
            match f.shape {
                FieldShape::Bilateral => {
                    out.push(format!("{}_l", f.base));
                    out.push(format!("{}_r", f.base));
                }
                _ => out.push(f.base.to_string()),
            }
        }
        out
    }

    pub fn has_column(&self, column: &str) -> bool {
        if self.by_base.contains_key(column) {
            return !self.is_bilateral(column);
        }
        match column.rsplit_once('_') {
            Some((base, "l")) | Some((base, "r")) => self.is_bilateral(base),
            _ => false,
        }
    }
}
