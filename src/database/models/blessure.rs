use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::analysis::Side;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Blessure {
    pub blessure_id: i64,
    pub patient_id: i64,
    pub zijde: Option<String>,
    pub datum_ongeval: Option<NaiveDate>,
    pub datum_operatie: Option<NaiveDate>,
    pub datum_intake: Option<NaiveDate>,
    pub arts: Option<String>,
    pub therapeut: Option<String>,
    pub etiologie: Option<String>,
    pub operatie: Option<String>,
    pub monoloop: Option<String>,
    pub bijkomende_letsels: Option<String>,
    pub sport: Option<String>,
    pub sportniveau: Option<String>,
}

impl Blessure {
    pub fn side(&self) -> Side {
        Side::parse(self.zijde.as_deref())
    }
}

/// Injury listing row, joined with its patient.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BlessureSummary {
    pub blessure_id: i64,
    pub patient_id: i64,
    pub naam: Option<String>,
    pub geslacht: Option<String>,
    pub geboortedatum: Option<NaiveDate>,
    pub zijde: Option<String>,
    pub operatie: Option<String>,
    pub datum_operatie: Option<NaiveDate>,
    pub sport: Option<String>,
    pub sportniveau: Option<String>,
}

/// Body of POST and PUT. `patient_id` is required on create and ignored on update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlessureInput {
    pub patient_id: Option<i64>,
    pub zijde: Option<String>,
    pub datum_ongeval: Option<NaiveDate>,
    pub datum_operatie: Option<NaiveDate>,
    pub datum_intake: Option<NaiveDate>,
    pub arts: Option<String>,
    pub therapeut: Option<String>,
    pub etiologie: Option<String>,
    pub operatie: Option<String>,
    pub monoloop: Option<String>,
    pub bijkomende_letsels: Option<String>,
    pub sport: Option<String>,
    pub sportniveau: Option<String>,
}

/// Allowed values of every categorical injury field, in form order.
pub const BLESSURE_OPTIONS: &[(&str, &[&str])] = &[
    ("zijde", &["Links", "Rechts"]),
    ("etiologie", &["Contact", "Non-contact"]),
    (
        "operatie",
        &["Hamstring pees", "Quadriceps pees", "Donorpees", "Patellapees", "Niet gekend"],
    ),
    (
        "therapeut",
        &["Annelien", "Frederic", "Jasper", "Maité", "Pepijn", "Robbe", "Ruben", "Sander"],
    ),
    (
        "arts",
        &[
            "Dr. Byn",
            "Dr. Dobbelaere",
            "Dr. De Neve",
            "Dr. Moens",
            "Dr. Schepens",
            "Dr. Van Onsem",
            "Dr. Vansintjan",
        ],
    ),
    (
        "sport",
        &[
            "Basketbal",
            "Handbal",
            "Hockey",
            "Korfbal",
            "Rugby",
            "Skiën",
            "Turnen",
            "Voetbal",
            "Volleybal",
            "Ander",
            "Niet Van Toepassing",
        ],
    ),
    (
        "sportniveau",
        &["Sedentair", "Recreatief", "Competitief", "Topsport", "Niet Van Toepassing"],
    ),
    ("monoloop", &["Ja", "Nee"]),
    (
        "bijkomende_letsels",
        &["Meniscushechting", "Meniscus dissectie", "Mediale band", "Kraakbeen revise", "Nvt"],
    ),
];

pub fn options_for(field: &str) -> Option<&'static [&'static str]> {
    BLESSURE_OPTIONS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, values)| *values)
}

impl BlessureInput {
    fn categorical(&self) -> [(&'static str, Option<&str>); 9] {
        [
            ("zijde", self.zijde.as_deref()),
            ("etiologie", self.etiologie.as_deref()),
            ("operatie", self.operatie.as_deref()),
            ("therapeut", self.therapeut.as_deref()),
            ("arts", self.arts.as_deref()),
            ("sport", self.sport.as_deref()),
            ("sportniveau", self.sportniveau.as_deref()),
            ("monoloop", self.monoloop.as_deref()),
            ("bijkomende_letsels", self.bijkomende_letsels.as_deref()),
        ]
    }

    /// Per-field problems; empty when the input is acceptable.
    pub fn validate(&self, creating: bool) -> HashMap<String, String> {
        let mut errors = HashMap::new();
        if creating && self.patient_id.is_none() {
            errors.insert("patient_id".to_string(), "This field is required".to_string());
        }
        for (field, value) in self.categorical() {
            let (Some(value), Some(allowed)) = (value, options_for(field)) else { continue };
            if !allowed.contains(&value) {
                errors.insert(field.to_string(), format!("Must be one of: {}", allowed.join(", ")));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_categorical_field_has_options() {
        for (field, _) in BlessureInput::default().categorical() {
            assert!(options_for(field).is_some(), "{field}");
        }
    }

    #[test]
    fn invalid_enum_values_are_reported_per_field() {
        let input = BlessureInput {
            patient_id: Some(1),
            zijde: Some("Left".into()),
            sport: Some("Voetbal".into()),
            arts: Some("Dr. Who".into()),
            ..Default::default()
        };
        let errors = input.validate(true);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("zijde"));
        assert!(errors.contains_key("arts"));
    }

    #[test]
    fn patient_is_required_on_create() {
        assert!(BlessureInput::default().validate(true).contains_key("patient_id"));
        assert!(BlessureInput::default().validate(false).is_empty());
    }
}
