use std::collections::HashMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use sqlx::{PgPool, Row};
use tracing::debug;

use crate::analysis::phase::FieldShape;
use crate::analysis::{Cohort, Phase, PhaseDataset, PhaseRecord, Side};

use super::manager::{quote_identifier, DatabaseError};

/// Rows of one phase table, keyed by `blessure_id`.
#[derive(Clone, Debug)]
pub struct PhaseStore {
    phase: Phase,
    pool: PgPool,
}

impl PhaseStore {
    pub fn new(phase: Phase, pool: PgPool) -> Self {
        Self { phase, pool }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn table(&self) -> String {
        quote_identifier(self.phase.table())
    }

    pub async fn select_all(&self) -> Result<Vec<Value>, DatabaseError> {
        let sql = format!(
            "SELECT row_to_json(t) AS row FROM (SELECT * FROM {} ORDER BY blessure_id) t",
            self.table()
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|r| r.try_get::<Value, _>("row").map_err(DatabaseError::from))
            .collect()
    }

    pub async fn select_one(&self, blessure_id: i64) -> Result<Option<Value>, DatabaseError> {
        let sql = format!(
            "SELECT row_to_json(t) AS row FROM (SELECT * FROM {} WHERE blessure_id = $1) t",
            self.table()
        );
        let row = sqlx::query(&sql)
            .bind(blessure_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| r.try_get::<Value, _>("row").map_err(DatabaseError::from))
            .transpose()
    }

    pub async fn select_404(&self, blessure_id: i64) -> Result<Value, DatabaseError> {
        self.select_one(blessure_id).await?.ok_or_else(|| {
            DatabaseError::NotFound(format!(
                "No {} record for blessure {}",
                self.phase.label(),
                blessure_id
            ))
        })
    }

    /// Insert the record, or update only the supplied columns of the existing one.
    /// Columns must already have passed [`validate_values`].
    pub async fn upsert(&self, blessure_id: i64, values: &Map<String, Value>) -> Result<Value, DatabaseError> {
        let exists = sqlx::query("SELECT 1 FROM blessures WHERE blessure_id = $1")
            .bind(blessure_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(DatabaseError::NotFound(format!("Blessure {} not found", blessure_id)));
        }

        let columns: Vec<String> = values.keys().map(|c| quote_identifier(c)).collect();
        let table = self.table();

        let sql = if columns.is_empty() {
            format!(
                "INSERT INTO {table} (blessure_id) VALUES ($1) ON CONFLICT (blessure_id) DO NOTHING"
            )
        } else {
            let selected: Vec<String> = columns.iter().map(|c| format!("r.{c}")).collect();
            let assignments: Vec<String> = columns.iter().map(|c| format!("{c} = EXCLUDED.{c}")).collect();
            format!(
                "INSERT INTO {table} (blessure_id, {cols}) \
                 SELECT $1, {selected} FROM jsonb_populate_record(NULL::{table}, $2) r \
                 ON CONFLICT (blessure_id) DO UPDATE SET {assignments}",
                cols = columns.join(", "),
                selected = selected.join(", "),
                assignments = assignments.join(", "),
            )
        };

        sqlx::query(&sql)
            .bind(blessure_id)
            .bind(Value::Object(values.clone()))
            .execute(&self.pool)
            .await?;

        debug!("[PHASE] upserted {} columns into {}", values.len(), self.phase);
        self.select_404(blessure_id).await
    }

    pub async fn delete(&self, blessure_id: i64) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE blessure_id = $1", self.table());
        let result = sqlx::query(&sql).bind(blessure_id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "No {} record for blessure {}",
                self.phase.label(),
                blessure_id
            )));
        }
        Ok(())
    }
}

/// Check a phase payload against the phase's columns. Returns per-column problems.
pub fn validate_values(phase: Phase, values: &Map<String, Value>) -> HashMap<String, String> {
    let schema = phase.schema();
    let mut errors = HashMap::new();

    for (column, value) in values {
        if !schema.has_column(column) {
            errors.insert(column.clone(), format!("Unknown column for {}", phase.label()));
            continue;
        }
        if value.is_null() {
            continue;
        }
        let base = column
            .strip_suffix("_l")
            .or_else(|| column.strip_suffix("_r"))
            .filter(|b| schema.is_bilateral(b))
            .unwrap_or(column.as_str());
        let ok = match schema.shape(base) {
            Some(FieldShape::Bilateral) | Some(FieldShape::Single) => value.is_number(),
            Some(FieldShape::Category) => value.is_string(),
            Some(FieldShape::Date) => value
                .as_str()
                .is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
            None => false,
        };
        if !ok {
            let expected = match schema.shape(base) {
                Some(FieldShape::Category) => "Expected text",
                Some(FieldShape::Date) => "Expected a date (YYYY-MM-DD)",
                _ => "Expected a number",
            };
            errors.insert(column.clone(), expected.to_string());
        }
    }

    errors
}

/// Read every phase's records, optionally limited to some injuries, in the engine's shape.
///
/// The operated side of each injury is resolved once and shared by all its phase records.
pub async fn load_cohort(pool: &PgPool, injury_ids: Option<&[i64]>) -> Result<Cohort, DatabaseError> {
    let filter: Option<Vec<i64>> = injury_ids.map(<[i64]>::to_vec);

    let sides: HashMap<i64, Side> = sqlx::query_as::<_, (i64, Option<String>)>(
        "SELECT blessure_id, zijde FROM blessures WHERE ($1::bigint[] IS NULL OR blessure_id = ANY($1))",
    )
    .bind(&filter)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|(id, zijde)| (id, Side::parse(zijde.as_deref())))
    .collect();

    let mut datasets = Vec::with_capacity(Phase::ALL.len());
    for phase in Phase::ALL {
        let sql = format!(
            "SELECT row_to_json(t) AS row FROM {} t \
             WHERE ($1::bigint[] IS NULL OR t.blessure_id = ANY($1)) ORDER BY t.blessure_id",
            quote_identifier(phase.table())
        );
        let rows = sqlx::query(&sql).bind(&filter).fetch_all(pool).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let value: Value = row.try_get("row")?;
            let Value::Object(map) = value else { continue };
            let Some(id) = map.get("blessure_id").and_then(Value::as_i64) else { continue };
            let side = sides.get(&id).copied().unwrap_or(Side::Unknown);
            records.push(PhaseRecord::from_row(phase, id, side, &map));
        }
        debug!("[ANALYSIS] loaded {} {} records", records.len(), phase);
        datasets.push(PhaseDataset::new(phase, records));
    }

    Ok(Cohort::new(datasets))
}
