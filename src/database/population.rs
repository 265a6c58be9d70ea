use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::analysis::stats::{round_to, MAGNITUDE_DIGITS, PERCENT_DIGITS};

use super::manager::DatabaseError;

/// Mean number of days between the milestones of an injury. Only positive intervals count.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IntervalAverages {
    pub accident_to_surgery: Option<f64>,
    pub surgery_to_intake: Option<f64>,
    pub surgery_to_walk: Option<f64>,
    pub surgery_to_drive: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub value: i64,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCounts {
    pub geslacht: Vec<CategoryCount>,
    pub sport: Vec<CategoryCount>,
    pub sportniveau: Vec<CategoryCount>,
    pub etiologie: Vec<CategoryCount>,
    pub operatie: Vec<CategoryCount>,
    pub arts: Vec<CategoryCount>,
    pub letsel: Vec<CategoryCount>,
    pub monoloop: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PopulationSummary {
    pub total_patients: i64,
    pub avg: IntervalAverages,
    pub counts: CategoryCounts,
}

/// One injury with the patient name, as shown on the population page.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InjuryProfile {
    pub blessure_id: i64,
    pub patient_id: i64,
    pub naam: Option<String>,
    pub zijde: Option<String>,
    pub sport: Option<String>,
    pub sportniveau: Option<String>,
    pub etiologie: Option<String>,
    pub operatie: Option<String>,
    pub arts: Option<String>,
    pub monoloop: Option<String>,
    pub datum_ongeval: Option<NaiveDate>,
    pub datum_operatie: Option<NaiveDate>,
    pub datum_intake: Option<NaiveDate>,
}

const INTERVALS_SQL: &str = "\
    WITH momenten AS ( \
        SELECT b.datum_ongeval, b.datum_operatie, b.datum_intake, \
               m45.lopen_opstartdatum AS lopen_datum, \
               NULLIF(w6.autorijden_datum, DATE '9999-12-31') AS autorijden_datum \
        FROM blessures b \
        LEFT JOIN maand45 m45 ON m45.blessure_id = b.blessure_id \
        LEFT JOIN week6 w6 ON w6.blessure_id = b.blessure_id \
    ) \
    SELECT \
        (AVG(datum_operatie - datum_ongeval) FILTER (WHERE datum_operatie - datum_ongeval > 0))::float8 \
            AS accident_to_surgery, \
        (AVG(datum_intake - datum_operatie) FILTER (WHERE datum_intake - datum_operatie > 0))::float8 \
            AS surgery_to_intake, \
        (AVG(lopen_datum - datum_operatie) FILTER (WHERE lopen_datum - datum_operatie > 0))::float8 \
            AS surgery_to_walk, \
        (AVG(autorijden_datum - datum_operatie) FILTER (WHERE autorijden_datum - datum_operatie > 0))::float8 \
            AS surgery_to_drive \
    FROM momenten";

pub struct PopulationRepository {
    pool: PgPool,
}

impl PopulationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn summary(&self) -> Result<PopulationSummary, DatabaseError> {
        let (total_patients,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM patienten")
            .fetch_one(&self.pool)
            .await?;

        let raw = sqlx::query_as::<_, IntervalAverages>(INTERVALS_SQL)
            .fetch_one(&self.pool)
            .await?;
        let round = |v: Option<f64>| v.map(|d| round_to(d, MAGNITUDE_DIGITS));
        let avg = IntervalAverages {
            accident_to_surgery: round(raw.accident_to_surgery),
            surgery_to_intake: round(raw.surgery_to_intake),
            surgery_to_walk: round(raw.surgery_to_walk),
            surgery_to_drive: round(raw.surgery_to_drive),
        };

        let counts = CategoryCounts {
            geslacht: self.count("patienten", "geslacht").await?,
            sport: self.count("blessures", "sport").await?,
            sportniveau: self.count("blessures", "sportniveau").await?,
            etiologie: self.count("blessures", "etiologie").await?,
            operatie: self.count("blessures", "operatie").await?,
            arts: self.count("blessures", "arts").await?,
            letsel: self.count("blessures", "bijkomende_letsels").await?,
            monoloop: self.count("blessures", "monoloop").await?,
        };

        Ok(PopulationSummary { total_patients, avg, counts })
    }

    // table and column are compile-time constants, never request input
    async fn count(&self, table: &'static str, column: &'static str) -> Result<Vec<CategoryCount>, DatabaseError> {
        let sql = format!(
            "SELECT {column} AS name, COUNT(*) AS value FROM {table} \
             WHERE {column} IS NOT NULL AND {column} <> '' GROUP BY {column}"
        );
        let rows: Vec<(String, i64)> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(shares(rows))
    }

    pub async fn injury_profile(&self, blessure_id: i64) -> Result<InjuryProfile, DatabaseError> {
        sqlx::query_as::<_, InjuryProfile>(
            "SELECT b.blessure_id, b.patient_id, p.naam, b.zijde, b.sport, b.sportniveau, \
                    b.etiologie, b.operatie, b.arts, b.monoloop, \
                    b.datum_ongeval, b.datum_operatie, b.datum_intake \
             FROM blessures b LEFT JOIN patienten p ON p.patient_id = b.patient_id \
             WHERE b.blessure_id = $1",
        )
        .bind(blessure_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("Blessure {} not found", blessure_id)))
    }
}

/// Percent of the total per category, largest first.
pub fn shares(counts: Vec<(String, i64)>) -> Vec<CategoryCount> {
    let total: i64 = counts.iter().map(|(_, n)| n).sum();
    let mut out: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(name, value)| CategoryCount {
            percent: if total > 0 {
                round_to(value as f64 * 100.0 / total as f64, PERCENT_DIGITS)
            } else {
                0.0
            },
            name,
            value,
        })
        .collect();
    out.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    out
}
