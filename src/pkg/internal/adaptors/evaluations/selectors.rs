use sqlx::PgConnection;

use crate::pkg::internal::adaptors::evaluations::spec::{EVALUATION_COLUMNS, EvaluationEntry};
use crate::prelude::Result;

pub struct EvaluationSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> EvaluationSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        EvaluationSelector { pool }
    }

    pub async fn get_by_apply_job(&mut self, apply_job_id: i64) -> Result<Option<EvaluationEntry>> {
        let row = sqlx::query_as::<_, EvaluationEntry>(&format!(
            "SELECT {} FROM evaluations WHERE apply_job_id = $1",
            EVALUATION_COLUMNS
        ))
        .bind(apply_job_id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(
        &mut self,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EvaluationEntry>> {
        let rows = sqlx::query_as::<_, EvaluationEntry>(&format!(
            "SELECT {} FROM evaluations WHERE ($1::text IS NULL OR status = $1)
             ORDER BY updated_at DESC, id DESC LIMIT $2 OFFSET $3",
            EVALUATION_COLUMNS
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
            "SELECT COUNT(*) FROM evaluations WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(count)
    }
}
