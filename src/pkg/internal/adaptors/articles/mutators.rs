use sqlx::PgConnection;

use crate::pkg::internal::adaptors::articles::spec::ArticleEntry;
use crate::prelude::Result;

pub struct ArticleMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ArticleMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ArticleMutator { pool }
    }

    pub async fn create(&mut self, title: &str, content: Option<&str>) -> Result<ArticleEntry> {
        let row = sqlx::query_as::<_, ArticleEntry>(
            "INSERT INTO articles (title, content) VALUES ($1, $2)
             RETURNING id, title, content, views, created_at, updated_at",
        )
        .bind(title)
        .bind(content)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(
        &mut self,
        id: i64,
        title: Option<&str>,
        content: Option<&str>,
    ) -> Result<Option<ArticleEntry>> {
        let row = sqlx::query_as::<_, ArticleEntry>(
            "UPDATE articles SET title = COALESCE($2, title), content = COALESCE($3, content),
                updated_at = NOW()
             WHERE id = $1
             RETURNING id, title, content, views, created_at, updated_at",
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Reading an article counts as a view.
    pub async fn view(&mut self, id: i64) -> Result<Option<ArticleEntry>> {
        let row = sqlx::query_as::<_, ArticleEntry>(
            "UPDATE articles SET views = views + 1 WHERE id = $1
             RETURNING id, title, content, views, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
