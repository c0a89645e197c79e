use sqlx::{FromRow, PgConnection, Row, postgres::PgRow};

use crate::pkg::internal::adaptors::master::spec::{
    BOBOT_COLUMNS, BobotNilaiEntry, KonversiEntry, PERUSAHAAN_COLUMNS, PerusahaanEntry,
    PerusahaanFields,
};
use crate::pkg::internal::grading::Weights;
use crate::prelude::Result;

/// Result of an insert-or-update, remembering which one happened.
#[derive(Debug)]
pub struct Upserted<T> {
    pub entry: T,
    pub inserted: bool,
}

impl<T> Upserted<T>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    fn from_row(row: &PgRow) -> Result<Self> {
        Ok(Upserted {
            entry: T::from_row(row)?,
            inserted: row.try_get("inserted")?,
        })
    }
}

pub struct BobotMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> BobotMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        BobotMutator { pool }
    }

    pub async fn upsert(&mut self, prodi_id: i64, weights: &Weights) -> Result<Upserted<BobotNilaiEntry>> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO bobot_nilai (id_program_studi, bobot_nilai_perusahaan, bobot_nilai_pembimbing,
                bobot_nilai_penguji)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id_program_studi) DO UPDATE SET
                bobot_nilai_perusahaan = EXCLUDED.bobot_nilai_perusahaan,
                bobot_nilai_pembimbing = EXCLUDED.bobot_nilai_pembimbing,
                bobot_nilai_penguji = EXCLUDED.bobot_nilai_penguji,
                updated_at = NOW()
            RETURNING {}, (xmax = 0) AS inserted
            "#,
            BOBOT_COLUMNS
        ))
        .bind(prodi_id)
        .bind(weights.company)
        .bind(weights.lecturer)
        .bind(weights.examiner)
        .fetch_one(&mut *self.pool)
        .await?;
        Upserted::from_row(&row)
    }
}

const KONVERSI_RETURNING: &str = "SELECT k.id, k.apply_job_id, k.matkul_id, k.grade, k.score, \
    m.kode_matkul, m.nama_matkul, m.sks, k.created_at, k.updated_at";

pub struct KonversiMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> KonversiMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        KonversiMutator { pool }
    }

    /// One conversion per course and application; a second submission overwrites it.
    pub async fn upsert(
        &mut self,
        apply_job_id: i64,
        matkul_id: i64,
        grade: &str,
        score: f64,
    ) -> Result<Upserted<KonversiEntry>> {
        let row = sqlx::query(&format!(
            r#"
            WITH k AS (
                INSERT INTO konversi_nilai (apply_job_id, matkul_id, grade, score)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (apply_job_id, matkul_id) DO UPDATE SET
                    grade = EXCLUDED.grade, score = EXCLUDED.score, updated_at = NOW()
                RETURNING *, (xmax = 0) AS inserted
            )
            {}, k.inserted FROM k LEFT JOIN mata_kuliah m ON m.id = k.matkul_id
            "#,
            KONVERSI_RETURNING
        ))
        .bind(apply_job_id)
        .bind(matkul_id)
        .bind(grade)
        .bind(score)
        .fetch_one(&mut *self.pool)
        .await?;
        Upserted::from_row(&row)
    }

    pub async fn update(
        &mut self,
        id: i64,
        grade: Option<&str>,
        score: Option<f64>,
    ) -> Result<Option<KonversiEntry>> {
        let row = sqlx::query_as::<_, KonversiEntry>(&format!(
            r#"
            WITH k AS (
                UPDATE konversi_nilai SET grade = COALESCE($2, grade), score = COALESCE($3, score),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {} FROM k LEFT JOIN mata_kuliah m ON m.id = k.matkul_id
            "#,
            KONVERSI_RETURNING
        ))
        .bind(id)
        .bind(grade)
        .bind(score)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM konversi_nilai WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PerusahaanMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> PerusahaanMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        PerusahaanMutator { pool }
    }

    pub async fn create(&mut self, fields: &PerusahaanFields) -> Result<PerusahaanEntry> {
        let row = sqlx::query_as::<_, PerusahaanEntry>(&format!(
            r#"
            INSERT INTO perusahaans (nama_perusahaan, alamat_perusahaan, email_perusahaan,
                website_perusahaan, facebook, instagram, tiktok, linkedin, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            PERUSAHAAN_COLUMNS
        ))
        .bind(fields.nama_perusahaan.as_deref().unwrap_or_default())
        .bind(&fields.alamat_perusahaan)
        .bind(&fields.email_perusahaan)
        .bind(&fields.website_perusahaan)
        .bind(&fields.facebook)
        .bind(&fields.instagram)
        .bind(&fields.tiktok)
        .bind(&fields.linkedin)
        .bind(fields.user_id)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&mut self, id: i64, fields: &PerusahaanFields) -> Result<Option<PerusahaanEntry>> {
        let row = sqlx::query_as::<_, PerusahaanEntry>(&format!(
            r#"
            UPDATE perusahaans SET
                nama_perusahaan = COALESCE($2, nama_perusahaan),
                alamat_perusahaan = COALESCE($3, alamat_perusahaan),
                email_perusahaan = COALESCE($4, email_perusahaan),
                website_perusahaan = COALESCE($5, website_perusahaan),
                facebook = COALESCE($6, facebook),
                instagram = COALESCE($7, instagram),
                tiktok = COALESCE($8, tiktok),
                linkedin = COALESCE($9, linkedin),
                user_id = COALESCE($10, user_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PERUSAHAAN_COLUMNS
        ))
        .bind(id)
        .bind(&fields.nama_perusahaan)
        .bind(&fields.alamat_perusahaan)
        .bind(&fields.email_perusahaan)
        .bind(&fields.website_perusahaan)
        .bind(&fields.facebook)
        .bind(&fields.instagram)
        .bind(&fields.tiktok)
        .bind(&fields.linkedin)
        .bind(fields.user_id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM perusahaans WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
