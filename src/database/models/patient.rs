use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::blessure::Blessure;

pub const GESLACHT_OPTIONS: &[&str] = &["Man", "Vrouw", "X"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Patient {
    pub patient_id: i64,
    pub naam: String,
    pub geslacht: Option<String>,
    pub geboortedatum: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientWithBlessures {
    #[serde(flatten)]
    pub patient: Patient,
    pub blessures: Vec<Blessure>,
}

/// Body of POST and PUT. On update, absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientInput {
    pub naam: Option<String>,
    pub geslacht: Option<String>,
    pub geboortedatum: Option<NaiveDate>,
}

impl PatientInput {
    /// Per-field problems; empty when the input is acceptable.
    pub fn validate(&self, creating: bool) -> HashMap<String, String> {
        let mut errors = HashMap::new();
        match self.naam.as_deref().map(str::trim) {
            None if creating => {
                errors.insert("naam".to_string(), "This field is required".to_string());
            }
            Some("") => {
                errors.insert("naam".to_string(), "Must not be empty".to_string());
            }
            Some(n) if n.chars().count() > 50 => {
                errors.insert("naam".to_string(), "At most 50 characters".to_string());
            }
            _ => {}
        }
        if let Some(g) = self.geslacht.as_deref() {
            if !GESLACHT_OPTIONS.contains(&g) {
                errors.insert(
                    "geslacht".to_string(),
                    format!("Must be one of: {}", GESLACHT_OPTIONS.join(", ")),
                );
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_required_on_create_only() {
        let input = PatientInput::default();
        assert!(input.validate(true).contains_key("naam"));
        assert!(input.validate(false).is_empty());
    }

    #[test]
    fn unknown_sex_is_rejected() {
        let input = PatientInput {
            naam: Some("Jan Peeters".into()),
            geslacht: Some("M".into()),
            ..Default::default()
        };
        let errors = input.validate(true);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key("geslacht"));
    }
}
