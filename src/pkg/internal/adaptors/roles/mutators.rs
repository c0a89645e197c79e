use sqlx::PgConnection;

use crate::pkg::internal::adaptors::roles::spec::{PermissionEntry, RoleEntry};
use crate::prelude::Result;

pub struct RoleMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> RoleMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        RoleMutator { pool }
    }

    pub async fn create(&mut self, title: &str) -> Result<RoleEntry> {
        let row = sqlx::query_as::<_, RoleEntry>(
            "INSERT INTO roles (title) VALUES ($1) RETURNING id, title, created_at, updated_at",
        )
        .bind(title)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&mut self, id: i64, title: &str) -> Result<Option<RoleEntry>> {
        let row = sqlx::query_as::<_, RoleEntry>(
            "UPDATE roles SET title = $2, updated_at = NOW() WHERE id = $1
             RETURNING id, title, created_at, updated_at",
        )
        .bind(id)
        .bind(title)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replaces the permission set of a role. Unknown permission ids are ignored.
    pub async fn sync_permissions(&mut self, role_id: i64, permission_ids: &[i64]) -> Result<()> {
        sqlx::query("DELETE FROM permission_role WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *self.pool)
            .await?;
        sqlx::query(
            "INSERT INTO permission_role (role_id, permission_id)
             SELECT $1, id FROM permissions WHERE id = ANY($2)
             ON CONFLICT DO NOTHING",
        )
        .bind(role_id)
        .bind(permission_ids)
        .execute(&mut *self.pool)
        .await?;
        Ok(())
    }
}

pub struct PermissionMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> PermissionMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        PermissionMutator { pool }
    }

    pub async fn create(&mut self, title: &str) -> Result<PermissionEntry> {
        let row = sqlx::query_as::<_, PermissionEntry>(
            "INSERT INTO permissions (title) VALUES ($1) RETURNING id, title, created_at, updated_at",
        )
        .bind(title)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&mut self, id: i64, title: &str) -> Result<Option<PermissionEntry>> {
        let row = sqlx::query_as::<_, PermissionEntry>(
            "UPDATE permissions SET title = $2, updated_at = NOW() WHERE id = $1
             RETURNING id, title, created_at, updated_at",
        )
        .bind(id)
        .bind(title)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
