use std::collections::HashMap;

use sqlx::PgPool;

use super::manager::DatabaseError;
use super::models::{Blessure, BlessureInput, BlessureSummary, Patient, PatientInput, PatientWithBlessures};

const BLESSURE_COLUMNS: &str = "blessure_id, patient_id, zijde, datum_ongeval, datum_operatie, datum_intake, \
     arts, therapeut, etiologie, operatie, monoloop, bijkomende_letsels, sport, sportniveau";

pub struct PatientRepository {
    pool: PgPool,
}

impl PatientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn select_all(&self) -> Result<Vec<PatientWithBlessures>, DatabaseError> {
        let patients = sqlx::query_as::<_, Patient>(
            "SELECT patient_id, naam, geslacht, geboortedatum FROM patienten ORDER BY patient_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let sql = format!("SELECT {BLESSURE_COLUMNS} FROM blessures ORDER BY blessure_id");
        let mut by_patient: HashMap<i64, Vec<Blessure>> = HashMap::new();
        for b in sqlx::query_as::<_, Blessure>(&sql).fetch_all(&self.pool).await? {
            by_patient.entry(b.patient_id).or_default().push(b);
        }

        Ok(patients
            .into_iter()
            .map(|patient| PatientWithBlessures {
                blessures: by_patient.remove(&patient.patient_id).unwrap_or_default(),
                patient,
            })
            .collect())
    }

    pub async fn select_one(&self, patient_id: i64) -> Result<Option<Patient>, DatabaseError> {
        Ok(sqlx::query_as::<_, Patient>(
            "SELECT patient_id, naam, geslacht, geboortedatum FROM patienten WHERE patient_id = $1",
        )
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    pub async fn select_404(&self, patient_id: i64) -> Result<Patient, DatabaseError> {
        self.select_one(patient_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Patient {} not found", patient_id)))
    }

    pub async fn select_with_blessures(&self, patient_id: i64) -> Result<PatientWithBlessures, DatabaseError> {
        let patient = self.select_404(patient_id).await?;
        let blessures = BlessureRepository::new(self.pool.clone())
            .select_for_patient(patient_id)
            .await?;
        Ok(PatientWithBlessures { patient, blessures })
    }

    pub async fn insert(&self, input: &PatientInput) -> Result<Patient, DatabaseError> {
        Ok(sqlx::query_as::<_, Patient>(
            "INSERT INTO patienten (naam, geslacht, geboortedatum) VALUES ($1, $2, $3) \
             RETURNING patient_id, naam, geslacht, geboortedatum",
        )
        .bind(input.naam.as_deref().map(str::trim))
        .bind(&input.geslacht)
        .bind(input.geboortedatum)
        .fetch_one(&self.pool)
        .await?)
    }

    /// Partial update: fields absent from the input keep their stored value.
    pub async fn update(&self, patient_id: i64, input: &PatientInput) -> Result<Patient, DatabaseError> {
        sqlx::query_as::<_, Patient>(
            "UPDATE patienten SET \
               naam = COALESCE($2, naam), \
               geslacht = COALESCE($3, geslacht), \
               geboortedatum = COALESCE($4, geboortedatum) \
             WHERE patient_id = $1 \
             RETURNING patient_id, naam, geslacht, geboortedatum",
        )
        .bind(patient_id)
        .bind(input.naam.as_deref().map(str::trim))
        .bind(&input.geslacht)
        .bind(input.geboortedatum)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("Patient {} not found", patient_id)))
    }

    /// Removes the patient; injuries and phase records go with it (ON DELETE CASCADE).
    pub async fn delete(&self, patient_id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM patienten WHERE patient_id = $1")
            .bind(patient_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Patient {} not found", patient_id)));
        }
        Ok(())
    }
}

pub struct BlessureRepository {
    pool: PgPool,
}

impl BlessureRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn select_summaries(&self) -> Result<Vec<BlessureSummary>, DatabaseError> {
        Ok(sqlx::query_as::<_, BlessureSummary>(
            "SELECT b.blessure_id, b.patient_id, \
                    COALESCE(p.naam, 'Patiënt #' || b.patient_id) AS naam, \
                    p.geslacht, p.geboortedatum, b.zijde, b.operatie, b.datum_operatie, \
                    b.sport, b.sportniveau \
             FROM blessures b LEFT JOIN patienten p ON p.patient_id = b.patient_id \
             ORDER BY b.blessure_id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn select_one(&self, blessure_id: i64) -> Result<Option<Blessure>, DatabaseError> {
        let sql = format!("SELECT {BLESSURE_COLUMNS} FROM blessures WHERE blessure_id = $1");
        Ok(sqlx::query_as::<_, Blessure>(&sql)
            .bind(blessure_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn select_404(&self, blessure_id: i64) -> Result<Blessure, DatabaseError> {
        self.select_one(blessure_id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Blessure {} not found", blessure_id)))
    }

    pub async fn select_for_patient(&self, patient_id: i64) -> Result<Vec<Blessure>, DatabaseError> {
        let sql = format!("SELECT {BLESSURE_COLUMNS} FROM blessures WHERE patient_id = $1 ORDER BY blessure_id");
        Ok(sqlx::query_as::<_, Blessure>(&sql)
            .bind(patient_id)
            .fetch_all(&self.pool)
            .await?)
    }

    /// The owning patient must exist.
    pub async fn insert(&self, patient_id: i64, input: &BlessureInput) -> Result<Blessure, DatabaseError> {
        PatientRepository::new(self.pool.clone()).select_404(patient_id).await?;

        let sql = format!(
            "INSERT INTO blessures (patient_id, zijde, datum_ongeval, datum_operatie, datum_intake, \
               arts, therapeut, etiologie, operatie, monoloop, bijkomende_letsels, sport, sportniveau) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {BLESSURE_COLUMNS}"
        );
        Ok(bind_fields(sqlx::query_as::<_, Blessure>(&sql).bind(patient_id), input)
            .fetch_one(&self.pool)
            .await?)
    }

    /// Partial update: fields absent from the input keep their stored value.
    pub async fn update(&self, blessure_id: i64, input: &BlessureInput) -> Result<Blessure, DatabaseError> {
        let sql = format!(
            "UPDATE blessures SET \
               zijde = COALESCE($2, zijde), \
               datum_ongeval = COALESCE($3, datum_ongeval), \
               datum_operatie = COALESCE($4, datum_operatie), \
               datum_intake = COALESCE($5, datum_intake), \
               arts = COALESCE($6, arts), \
               therapeut = COALESCE($7, therapeut), \
               etiologie = COALESCE($8, etiologie), \
               operatie = COALESCE($9, operatie), \
               monoloop = COALESCE($10, monoloop), \
               bijkomende_letsels = COALESCE($11, bijkomende_letsels), \
               sport = COALESCE($12, sport), \
               sportniveau = COALESCE($13, sportniveau) \
             WHERE blessure_id = $1 \
             RETURNING {BLESSURE_COLUMNS}"
        );
        bind_fields(sqlx::query_as::<_, Blessure>(&sql).bind(blessure_id), input)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Blessure {} not found", blessure_id)))
    }

    pub async fn delete(&self, blessure_id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM blessures WHERE blessure_id = $1")
            .bind(blessure_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Blessure {} not found", blessure_id)));
        }
        Ok(())
    }
}

type BlessureQuery<'q> = sqlx::query::QueryAs<'q, sqlx::Postgres, Blessure, sqlx::postgres::PgArguments>;

// Binds $2..$13 in column order.
fn bind_fields<'q>(query: BlessureQuery<'q>, input: &'q BlessureInput) -> BlessureQuery<'q> {
    query
        .bind(&input.zijde)
        .bind(input.datum_ongeval)
        .bind(input.datum_operatie)
        .bind(input.datum_intake)
        .bind(&input.arts)
        .bind(&input.therapeut)
        .bind(&input.etiologie)
        .bind(&input.operatie)
        .bind(&input.monoloop)
        .bind(&input.bijkomende_letsels)
        .bind(&input.sport)
        .bind(&input.sportniveau)
}
