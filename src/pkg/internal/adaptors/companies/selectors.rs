use sqlx::PgConnection;

use crate::pkg::internal::adaptors::companies::spec::{COMPANY_COLUMNS, CompanyEntry};
use crate::prelude::Result;

pub struct CompanySelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> CompanySelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        CompanySelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<CompanyEntry>> {
        let row = sqlx::query_as::<_, CompanyEntry>(&format!(
            "SELECT {} FROM companies WHERE id = $1",
            COMPANY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_by_owner(&mut self, user_id: i64) -> Result<Option<CompanyEntry>> {
        let row = sqlx::query_as::<_, CompanyEntry>(&format!(
            "SELECT {} FROM companies WHERE user_id = $1 ORDER BY id LIMIT 1",
            COMPANY_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(&mut self, limit: i64, offset: i64) -> Result<Vec<CompanyEntry>> {
        let rows = sqlx::query_as::<_, CompanyEntry>(&format!(
            "SELECT {} FROM companies ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
            COMPANY_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count(&mut self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM companies")
            .fetch_one(&mut *self.pool)
            .await?;
        Ok(count)
    }
}
