use sqlx::PgConnection;

use crate::pkg::internal::adaptors::apply_jobs::spec::{
    APPLY_JOB_COLUMNS, ApplyJobEntry, ApplyJobView, MonthlyCount, VIEW_SELECT,
};
use crate::prelude::Result;

pub struct ApplyJobSelector<'a> {
    pool: &'a mut PgConnection,
}

const LIST_FILTER: &str = "($1::text IS NULL OR aj.status = $1)
    AND ($2::bigint IS NULL OR EXISTS (
        SELECT 1 FROM apply_job_job f JOIN jobs fj ON fj.id = f.job_id
        WHERE f.apply_job_id = aj.id AND fj.company_id = $2
    ))";

impl<'a> ApplyJobSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ApplyJobSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<ApplyJobEntry>> {
        let row = sqlx::query_as::<_, ApplyJobEntry>(&format!(
            "SELECT {} FROM apply_jobs WHERE id = $1",
            APPLY_JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn view_by_id(&mut self, id: i64) -> Result<Option<ApplyJobView>> {
        let row = sqlx::query_as::<_, ApplyJobView>(&format!("{} WHERE aj.id = $1", VIEW_SELECT))
            .bind(id)
            .fetch_optional(&mut *self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list(
        &mut self,
        status: Option<&str>,
        company_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ApplyJobView>> {
        let rows = sqlx::query_as::<_, ApplyJobView>(&format!(
            "{} WHERE {} ORDER BY aj.created_at DESC, aj.id DESC LIMIT $3 OFFSET $4",
            VIEW_SELECT, LIST_FILTER
        ))
        .bind(status)
        .bind(company_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count(&mut self, status: Option<&str>, company_id: Option<i64>) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM apply_jobs aj WHERE {}",
            LIST_FILTER
        ))
        .bind(status)
        .bind(company_id)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(count)
    }

    pub async fn by_user(&mut self, user_id: i64) -> Result<Vec<ApplyJobView>> {
        let rows = sqlx::query_as::<_, ApplyJobView>(&format!(
            "{} WHERE EXISTS (SELECT 1 FROM apply_job_user x WHERE x.apply_job_id = aj.id AND x.user_id = $1)
             ORDER BY aj.created_at DESC, aj.id DESC",
            VIEW_SELECT
        ))
        .bind(user_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn by_job(&mut self, job_id: i64) -> Result<Vec<ApplyJobView>> {
        let rows = sqlx::query_as::<_, ApplyJobView>(&format!(
            "{} WHERE EXISTS (SELECT 1 FROM apply_job_job x WHERE x.apply_job_id = aj.id AND x.job_id = $1)
             ORDER BY aj.created_at DESC, aj.id DESC",
            VIEW_SELECT
        ))
        .bind(job_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    /// Most recent application the user submitted.
    pub async fn latest_by_creator(&mut self, user_id: i64) -> Result<Option<ApplyJobView>> {
        let row = sqlx::query_as::<_, ApplyJobView>(&format!(
            "{} WHERE aj.created_by_id = $1 ORDER BY aj.created_at DESC, aj.id DESC LIMIT 1",
            VIEW_SELECT
        ))
        .bind(user_id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn latest(&mut self, limit: i64) -> Result<Vec<ApplyJobView>> {
        let rows = sqlx::query_as::<_, ApplyJobView>(&format!(
            "{} ORDER BY aj.created_at DESC, aj.id DESC LIMIT $1",
            VIEW_SELECT
        ))
        .bind(limit)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_by_status(&mut self, status: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM apply_jobs WHERE status = $1")
            .bind(status)
            .fetch_one(&mut *self.pool)
            .await?;
        Ok(count)
    }

    /// Applications created in `year`, grouped by status and month.
    pub async fn monthly_counts(&mut self, year: i32) -> Result<Vec<MonthlyCount>> {
        let rows = sqlx::query_as::<_, MonthlyCount>(
            "SELECT status, EXTRACT(MONTH FROM created_at)::int AS month, COUNT(*) AS count
             FROM apply_jobs
             WHERE EXTRACT(YEAR FROM created_at)::int = $1
             GROUP BY status, EXTRACT(MONTH FROM created_at)::int",
        )
        .bind(year)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}
