use sqlx::PgConnection;

use crate::pkg::internal::adaptors::jobs::spec::{JOB_COLUMNS, JobEntry, JobScope};
use crate::prelude::Result;

pub struct JobSelector<'a> {
    pool: &'a mut PgConnection,
}

const SCOPED_FILTER: &str = "(status = ANY($1) OR ($2::bigint IS NOT NULL AND created_by_id = $2))
    AND ($3::bigint IS NULL OR company_id = $3)
    AND ($4::text IS NULL OR status = $4)";

impl<'a> JobSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {} FROM jobs WHERE id = $1",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(
        &mut self,
        scope: &JobScope,
        company_id: Option<i64>,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<JobEntry>> {
        let rows = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {} FROM jobs WHERE {} ORDER BY updated_at DESC, id DESC LIMIT $5 OFFSET $6",
            JOB_COLUMNS, SCOPED_FILTER
        ))
        .bind(&scope.statuses)
        .bind(scope.owner)
        .bind(company_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count(
        &mut self,
        scope: &JobScope,
        company_id: Option<i64>,
        status: Option<&str>,
    ) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM jobs WHERE {}",
            SCOPED_FILTER
        ))
        .bind(&scope.statuses)
        .bind(scope.owner)
        .bind(company_id)
        .bind(status)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(count)
    }

    pub async fn latest(&mut self, statuses: &[String], limit: i64) -> Result<Vec<JobEntry>> {
        let rows = sqlx::query_as::<_, JobEntry>(&format!(
            "SELECT {} FROM jobs WHERE status = ANY($1) ORDER BY created_at DESC, id DESC LIMIT $2",
            JOB_COLUMNS
        ))
        .bind(statuses)
        .bind(limit)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_all(&mut self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs")
            .fetch_one(&mut *self.pool)
            .await?;
        Ok(count)
    }
}
