use sqlx::PgConnection;

use crate::pkg::internal::adaptors::roles::spec::{PermissionEntry, RoleEntry};
use crate::prelude::Result;

pub struct RoleSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> RoleSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        RoleSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<RoleEntry>> {
        let row = sqlx::query_as::<_, RoleEntry>(
            "SELECT id, title, created_at, updated_at FROM roles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(&mut self, limit: i64, offset: i64) -> Result<Vec<RoleEntry>> {
        let rows = sqlx::query_as::<_, RoleEntry>(
            "SELECT id, title, created_at, updated_at FROM roles ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count(&mut self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM roles")
            .fetch_one(&mut *self.pool)
            .await?;
        Ok(count)
    }

    pub async fn permissions_of(&mut self, role_id: i64) -> Result<Vec<PermissionEntry>> {
        let rows = sqlx::query_as::<_, PermissionEntry>(
            "SELECT p.id, p.title, p.created_at, p.updated_at
             FROM permissions p JOIN permission_role pr ON pr.permission_id = p.id
             WHERE pr.role_id = $1 ORDER BY p.id",
        )
        .bind(role_id)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}

pub struct PermissionSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> PermissionSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        PermissionSelector { pool }
    }

    pub async fn list(&mut self, limit: i64, offset: i64) -> Result<Vec<PermissionEntry>> {
        let rows = sqlx::query_as::<_, PermissionEntry>(
            "SELECT id, title, created_at, updated_at FROM permissions ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count(&mut self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM permissions")
            .fetch_one(&mut *self.pool)
            .await?;
        Ok(count)
    }
}
