use sqlx::PgConnection;

use crate::pkg::internal::adaptors::articles::spec::ArticleEntry;
use crate::prelude::Result;

pub struct ArticleSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ArticleSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ArticleSelector { pool }
    }

    pub async fn list(&mut self, limit: i64, offset: i64) -> Result<Vec<ArticleEntry>> {
        let rows = sqlx::query_as::<_, ArticleEntry>(
            "SELECT id, title, content, views, created_at, updated_at
             FROM articles ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count(&mut self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM articles")
            .fetch_one(&mut *self.pool)
            .await?;
        Ok(count)
    }
}
