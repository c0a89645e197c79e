use sqlx::PgConnection;

use crate::pkg::internal::adaptors::roles::spec::RoleEntry;
use crate::pkg::internal::adaptors::users::spec::{LecturerEntry, USER_COLUMNS, UserEntry};
use crate::prelude::Result;

pub struct UserSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> UserSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        UserSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<UserEntry>> {
        let row = sqlx::query_as::<_, UserEntry>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_by_username(&mut self, username: &str) -> Result<Option<UserEntry>> {
        let row = sqlx::query_as::<_, UserEntry>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// First user already holding either the email or the username.
    pub async fn find_conflict(&mut self, email: &str, username: &str) -> Result<Option<UserEntry>> {
        let row = sqlx::query_as::<_, UserEntry>(&format!(
            "SELECT {} FROM users WHERE email = $1 OR username = $2 LIMIT 1",
            USER_COLUMNS
        ))
        .bind(email)
        .bind(username)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn role_ids(&mut self, user_id: i64) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT role_id FROM role_user WHERE user_id = $1 ORDER BY role_id",
        )
        .bind(user_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(ids)
    }

    pub async fn roles(&mut self, user_id: i64) -> Result<Vec<RoleEntry>> {
        let rows = sqlx::query_as::<_, RoleEntry>(
            "SELECT r.id, r.title, r.created_at, r.updated_at
             FROM roles r JOIN role_user ru ON ru.role_id = r.id
             WHERE ru.user_id = $1 ORDER BY r.id",
        )
        .bind(user_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list(&mut self, limit: i64, offset: i64) -> Result<Vec<UserEntry>> {
        let rows = sqlx::query_as::<_, UserEntry>(&format!(
            "SELECT {} FROM users ORDER BY id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count(&mut self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *self.pool)
            .await?;
        Ok(count)
    }

    /// Users by role string, optionally narrowed to one status.
    pub async fn list_by_role(
        &mut self,
        role: &str,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserEntry>> {
        let rows = sqlx::query_as::<_, UserEntry>(&format!(
            "SELECT {} FROM users
             WHERE role = $1 AND ($2::text IS NULL OR status = $2)
             ORDER BY id LIMIT $3 OFFSET $4",
            USER_COLUMNS
        ))
        .bind(role)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count_by_role(&mut self, role: &str, status: Option<&str>) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE role = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(role)
        .bind(status)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(count)
    }

    /// Lecturers, flagged when they are the responsible lecturer of `apply_job_id`.
    pub async fn lecturers(
        &mut self,
        status: Option<&str>,
        apply_job_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LecturerEntry>> {
        let rows = sqlx::query_as::<_, LecturerEntry>(
            "SELECT u.id, u.name, u.email, u.status,
                    COALESCE(u.id = (SELECT responsible_lecturer_id FROM apply_jobs WHERE id = $2), false)
                        AS lecturer_can_approve
             FROM users u
             WHERE u.role = 'dosen' AND ($1::text IS NULL OR u.status = $1)
             ORDER BY u.id LIMIT $3 OFFSET $4",
        )
        .bind(status)
        .bind(apply_job_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}
