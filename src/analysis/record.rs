use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::phase::{FieldShape, Phase, EXAMINATION_DATE};
use super::side::{Side, SidePair, Suffix};
use super::value::Measurement;

/// One test value as found on a phase record, already coerced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure {
    Bilateral { left: Option<f64>, right: Option<f64> },
    Single(Option<f64>),
}

impl Measure {
    pub fn side(&self, suffix: Suffix) -> Option<f64> {
        match (self, suffix) {
            (Measure::Bilateral { left, .. }, Suffix::L) => *left,
            (Measure::Bilateral { right, .. }, Suffix::R) => *right,
            (Measure::Single(_), _) => None,
        }
    }
}

/// A phase record in the shape shared by every phase: test base-name to measure.
#[derive(Debug, Clone)]
pub struct PhaseRecord {
    pub phase: Phase,
    pub injury_id: i64,
    pub side: Side,
    pub examined_on: Option<NaiveDate>,
    sides: Option<SidePair>,
    measures: HashMap<&'static str, Measure>,
    categories: HashMap<&'static str, String>,
}

impl PhaseRecord {
    /// Build from a stored row (column name to raw value). Only columns the phase schema
    /// defines are read; anything else on the row is ignored.
    pub fn from_row(phase: Phase, injury_id: i64, side: Side, row: &Map<String, Value>) -> Self {
        let schema = phase.schema();
        let mut measures = HashMap::new();
        let mut categories = HashMap::new();
        let mut examined_on = None;

        for field in schema.fields() {
            match field.shape {
                FieldShape::Bilateral => {
                    let left = row.get(&format!("{}_l", field.base)).measurement();
                    let right = row.get(&format!("{}_r", field.base)).measurement();
                    measures.insert(field.base, Measure::Bilateral { left, right });
                }
                FieldShape::Single => {
                    let value = row.get(field.base).measurement();
                    measures.insert(field.base, Measure::Single(value));
                }
                FieldShape::Category => {
                    if let Some(v) = row.get(field.base).and_then(Value::as_str) {
                        if !v.trim().is_empty() {
                            categories.insert(field.base, v.to_string());
                        }
                    }
                }
                FieldShape::Date if field.base == EXAMINATION_DATE => {
                    examined_on = row
                        .get(field.base)
                        .and_then(Value::as_str)
                        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
                }
                FieldShape::Date => {}
            }
        }

        Self {
            phase,
            injury_id,
            side,
            examined_on,
            sides: side.resolve(),
            measures,
            categories,
        }
    }

    /// Operated/healthy suffixes, resolved once from the injury's side.
    pub fn sides(&self) -> Option<SidePair> {
        self.sides
    }

    pub fn measure(&self, base: &str) -> Option<&Measure> {
        self.measures.get(base)
    }

    /// Value of a bilateral test on the given side.
    pub fn bilateral(&self, base: &str, suffix: Suffix) -> Option<f64> {
        self.measure(base).and_then(|m| m.side(suffix))
    }

    /// Value of a single-valued test.
    pub fn single(&self, base: &str) -> Option<f64> {
        match self.measure(base) {
            Some(Measure::Single(v)) => *v,
            _ => None,
        }
    }

    pub fn category(&self, name: &str) -> Option<&str> {
        self.categories.get(name).map(String::as_str)
    }
}

/// All records of one phase, as read for one request.
#[derive(Debug, Clone)]
pub struct PhaseDataset {
    pub phase: Phase,
    pub records: Vec<PhaseRecord>,
}

impl PhaseDataset {
    pub fn new(phase: Phase, records: Vec<PhaseRecord>) -> Self {
        Self { phase, records }
    }

    pub fn empty(phase: Phase) -> Self {
        Self::new(phase, Vec::new())
    }

    pub fn for_injuries(&self, injury_ids: &[i64]) -> Self {
        let records = self
            .records
            .iter()
            .filter(|r| injury_ids.contains(&r.injury_id))
            .cloned()
            .collect();
        Self::new(self.phase, records)
    }
}
