use sqlx::PgConnection;

use crate::pkg::internal::adaptors::reports::spec::{ActivityEntry, REPORT_COLUMNS, ReportEntry};
use crate::prelude::Result;

pub struct ReportSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ReportSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ReportSelector { pool }
    }

    pub async fn get_by_apply_job(&mut self, apply_job_id: i64) -> Result<Option<ReportEntry>> {
        let row = sqlx::query_as::<_, ReportEntry>(&format!(
            "SELECT {} FROM reports WHERE apply_job_id = $1",
            REPORT_COLUMNS
        ))
        .bind(apply_job_id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(&mut self, status: Option<&str>, limit: i64, offset: i64) -> Result<Vec<ReportEntry>> {
        let rows = sqlx::query_as::<_, ReportEntry>(&format!(
            "SELECT {} FROM reports WHERE ($1::text IS NULL OR status = $1)
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
            REPORT_COLUMNS
        ))
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count(&mut self, status: Option<&str>) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reports WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(count)
    }
}

pub struct ActivitySelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ActivitySelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ActivitySelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<ActivityEntry>> {
        let row = sqlx::query_as::<_, ActivityEntry>(
            "SELECT id, report_job_id, date, activity, description, created_at, updated_at
             FROM activity_details WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(
        &mut self,
        report_job_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityEntry>> {
        let rows = sqlx::query_as::<_, ActivityEntry>(
            "SELECT id, report_job_id, date, activity, description, created_at, updated_at
             FROM activity_details WHERE ($1::bigint IS NULL OR report_job_id = $1)
             ORDER BY date DESC NULLS LAST, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(report_job_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count(&mut self, report_job_id: Option<i64>) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM activity_details WHERE ($1::bigint IS NULL OR report_job_id = $1)",
        )
        .bind(report_job_id)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(count)
    }

    pub async fn for_report(&mut self, report_job_id: i64) -> Result<Vec<ActivityEntry>> {
        let rows = sqlx::query_as::<_, ActivityEntry>(
            "SELECT id, report_job_id, date, activity, description, created_at, updated_at
             FROM activity_details WHERE report_job_id = $1 ORDER BY date NULLS LAST, id",
        )
        .bind(report_job_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}
