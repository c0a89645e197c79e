use sqlx::PgConnection;

use crate::pkg::internal::adaptors::jobs::spec::{JOB_COLUMNS, JobEntry};
use crate::pkg::internal::workflow::{JobReview, JobStatus};
use crate::pkg::server::handlers::jobs::JobInput;
use crate::prelude::Result;

pub struct JobMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobMutator { pool }
    }

    pub async fn create(
        &mut self,
        job: &JobInput,
        created_by_id: i64,
        company_id: Option<i64>,
    ) -> Result<JobEntry> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            r#"
            INSERT INTO jobs (title, company, location, duration, description, benefits, job_type,
                salary, vacancy_type, mata_kuliah, deadline, status, created_by_id, company_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(job.title.as_deref().unwrap_or_default())
        .bind(job.company.as_deref().unwrap_or_default())
        .bind(job.location.as_deref().unwrap_or_default())
        .bind(&job.duration)
        .bind(&job.description)
        .bind(&job.benefits)
        .bind(&job.job_type)
        .bind(&job.salary)
        .bind(&job.vacancy_type)
        .bind(&job.mata_kuliah)
        .bind(job.deadline)
        .bind(JobStatus::PendingReview.as_str())
        .bind(created_by_id)
        .bind(company_id)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Empty strings count as "not provided" and keep the stored value.
    pub async fn update(&mut self, id: i64, job: &JobInput) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            r#"
            UPDATE jobs SET
                title = COALESCE(NULLIF($2, ''), title),
                company = COALESCE(NULLIF($3, ''), company),
                location = COALESCE(NULLIF($4, ''), location),
                duration = COALESCE(NULLIF($5, ''), duration),
                description = COALESCE(NULLIF($6, ''), description),
                benefits = COALESCE(NULLIF($7, ''), benefits),
                job_type = COALESCE(NULLIF($8, ''), job_type),
                salary = COALESCE(NULLIF($9, ''), salary),
                vacancy_type = COALESCE(NULLIF($10, ''), vacancy_type),
                mata_kuliah = COALESCE(NULLIF($11, ''), mata_kuliah),
                deadline = COALESCE($12, deadline),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        ))
        .bind(id)
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.duration)
        .bind(&job.description)
        .bind(&job.benefits)
        .bind(&job.job_type)
        .bind(&job.salary)
        .bind(&job.vacancy_type)
        .bind(&job.mata_kuliah)
        .bind(job.deadline)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Moves the posting along its review lifecycle. Returns false when the
    /// posting was not in the required status.
    pub async fn review(&mut self, id: i64, review: JobReview) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE jobs SET status = $3, updated_at = NOW() WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(review.from().as_str())
        .bind(review.to().as_str())
        .execute(&mut *self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
