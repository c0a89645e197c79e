use sqlx::PgConnection;

use crate::pkg::internal::adaptors::companies::spec::{COMPANY_COLUMNS, CompanyEntry, CompanyProfile};
use crate::prelude::Result;

pub struct CompanyMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> CompanyMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        CompanyMutator { pool }
    }

    pub async fn create(
        &mut self,
        profile: &CompanyProfile,
        user_id: Option<i64>,
        created_by_id: i64,
    ) -> Result<CompanyEntry> {
        let row = sqlx::query_as::<_, CompanyEntry>(&format!(
            r#"
            INSERT INTO companies (company_name, business_fields, company_size, company_website,
                company_profile_description, company_phone_number, company_address, user_id, created_by_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        ))
        .bind(profile.company_name.as_deref().unwrap_or_default())
        .bind(&profile.business_fields)
        .bind(&profile.company_size)
        .bind(&profile.company_website)
        .bind(&profile.company_profile_description)
        .bind(&profile.company_phone_number)
        .bind(&profile.company_address)
        .bind(user_id)
        .bind(created_by_id)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Absent fields keep their stored value.
    pub async fn update(&mut self, id: i64, profile: &CompanyProfile) -> Result<Option<CompanyEntry>> {
        let row = sqlx::query_as::<_, CompanyEntry>(&format!(
            r#"
            UPDATE companies SET
                company_name = COALESCE($2, company_name),
                business_fields = COALESCE($3, business_fields),
                company_size = COALESCE($4, company_size),
                company_website = COALESCE($5, company_website),
                company_profile_description = COALESCE($6, company_profile_description),
                company_phone_number = COALESCE($7, company_phone_number),
                company_address = COALESCE($8, company_address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        ))
        .bind(id)
        .bind(&profile.company_name)
        .bind(&profile.business_fields)
        .bind(&profile.company_size)
        .bind(&profile.company_website)
        .bind(&profile.company_profile_description)
        .bind(&profile.company_phone_number)
        .bind(&profile.company_address)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
