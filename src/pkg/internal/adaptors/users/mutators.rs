use chrono::NaiveDate;
use sqlx::PgConnection;

use crate::pkg::internal::adaptors::users::spec::{USER_COLUMNS, UserEntry};
use crate::prelude::Result;

/// Columns written when a user is created. `password` is already hashed.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: String,
    pub nim: Option<String>,
    pub program_study: Option<String>,
    pub faculty: Option<String>,
    pub semester: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub profile_description: Option<String>,
    pub position: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub status: Option<String>,
    pub team_id: Option<i64>,
    pub id_program_studi: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub status: Option<String>,
    pub id_program_studi: Option<i64>,
}

pub struct UserMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> UserMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        UserMutator { pool }
    }

    pub async fn create(&mut self, user: &NewUser) -> Result<UserEntry> {
        let row = sqlx::query_as::<_, UserEntry>(&format!(
            r#"
            INSERT INTO users (name, email, username, password, role, nim, program_study, faculty,
                semester, phone_number, address, profile_description, position, birthdate, status,
                team_id, id_program_studi)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.role)
        .bind(&user.nim)
        .bind(&user.program_study)
        .bind(&user.faculty)
        .bind(&user.semester)
        .bind(&user.phone_number)
        .bind(&user.address)
        .bind(&user.profile_description)
        .bind(&user.position)
        .bind(user.birthdate)
        .bind(&user.status)
        .bind(user.team_id)
        .bind(user.id_program_studi)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&mut self, id: i64, patch: UserPatch) -> Result<Option<UserEntry>> {
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut param_count = 1;

        for (column, present) in [
            ("name", patch.name.is_some()),
            ("email", patch.email.is_some()),
            ("password", patch.password.is_some()),
            ("status", patch.status.is_some()),
            ("id_program_studi", patch.id_program_studi.is_some()),
        ] {
            if present {
                param_count += 1;
                query.push_str(&format!(", {} = ${}", column, param_count));
            }
        }
        query.push_str(&format!(" WHERE id = $1 RETURNING {}", USER_COLUMNS));

        let mut q = sqlx::query_as::<_, UserEntry>(&query).bind(id);
        if let Some(name) = patch.name {
            q = q.bind(name);
        }
        if let Some(email) = patch.email {
            q = q.bind(email);
        }
        if let Some(password) = patch.password {
            q = q.bind(password);
        }
        if let Some(status) = patch.status {
            q = q.bind(status);
        }
        if let Some(prodi) = patch.id_program_studi {
            q = q.bind(prodi);
        }
        let row = q.fetch_optional(&mut *self.pool).await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_role_name(&mut self, id: i64, role: &str) -> Result<()> {
        sqlx::query("UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(role)
            .execute(&mut *self.pool)
            .await?;
        Ok(())
    }

    pub async fn attach_role(&mut self, user_id: i64, role_id: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO role_user (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&mut *self.pool)
        .await?;
        Ok(())
    }

    /// Replaces every role link of the user. Unknown role ids are ignored.
    pub async fn replace_roles(&mut self, user_id: i64, role_ids: &[i64]) -> Result<()> {
        sqlx::query("DELETE FROM role_user WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *self.pool)
            .await?;
        sqlx::query(
            "INSERT INTO role_user (user_id, role_id)
             SELECT $1, id FROM roles WHERE id = ANY($2)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(role_ids)
        .execute(&mut *self.pool)
        .await?;
        Ok(())
    }

    pub async fn create_team(&mut self, owner_id: i64, name: &str) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO teams (name, owner_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(owner_id)
        .fetch_one(&mut *self.pool)
        .await?;
        sqlx::query("UPDATE users SET team_id = $2 WHERE id = $1")
            .bind(owner_id)
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(id)
    }
}
