use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgConnection;

use crate::pkg::internal::adaptors::reports::spec::{
    ActivityEntry, REPORT_COLUMNS, REPORT_DRAFT, ReportEntry,
};
use crate::pkg::internal::policy::Slot;
use crate::prelude::Result;

pub struct ReportMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ReportMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ReportMutator { pool }
    }

    pub async fn create(
        &mut self,
        apply_job_id: i64,
        report_job_user: Option<&str>,
        start_date: DateTime<Utc>,
    ) -> Result<ReportEntry> {
        let row = sqlx::query_as::<_, ReportEntry>(&format!(
            "INSERT INTO reports (apply_job_id, report_job_user, start_date, status)
             VALUES ($1, $2, $3, $4) RETURNING {}",
            REPORT_COLUMNS
        ))
        .bind(apply_job_id)
        .bind(report_job_user)
        .bind(start_date)
        .bind(REPORT_DRAFT)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn set_file(&mut self, id: i64, path: &str) -> Result<ReportEntry> {
        let row = sqlx::query_as::<_, ReportEntry>(&format!(
            "UPDATE reports SET file_laporan = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            REPORT_COLUMNS
        ))
        .bind(id)
        .bind(path)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Records `user_id` as signer of every slot, stamped with the current time.
    pub async fn sign(&mut self, id: i64, slots: &[Slot], user_id: i64) -> Result<ReportEntry> {
        let mut query = String::from("UPDATE reports SET updated_at = NOW()");
        for slot in slots {
            let prefix = slot.column_prefix();
            query.push_str(&format!(
                ", {prefix}_checked_id = $2, {prefix}_checked_at = NOW()"
            ));
        }
        query.push_str(&format!(" WHERE id = $1 RETURNING {}", REPORT_COLUMNS));
        let row = sqlx::query_as::<_, ReportEntry>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_one(&mut *self.pool)
            .await?;
        Ok(row)
    }

    pub async fn set_status(&mut self, id: i64, status: &str) -> Result<ReportEntry> {
        let row = sqlx::query_as::<_, ReportEntry>(&format!(
            "UPDATE reports SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            REPORT_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct ActivityMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ActivityMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ActivityMutator { pool }
    }

    pub async fn create(
        &mut self,
        report_job_id: i64,
        date: Option<NaiveDate>,
        activity: Option<&str>,
        description: Option<&str>,
    ) -> Result<ActivityEntry> {
        let row = sqlx::query_as::<_, ActivityEntry>(
            "INSERT INTO activity_details (report_job_id, date, activity, description)
             VALUES ($1, $2, $3, $4)
             RETURNING id, report_job_id, date, activity, description, created_at, updated_at",
        )
        .bind(report_job_id)
        .bind(date)
        .bind(activity)
        .bind(description)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(
        &mut self,
        id: i64,
        date: Option<NaiveDate>,
        activity: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<ActivityEntry>> {
        let row = sqlx::query_as::<_, ActivityEntry>(
            "UPDATE activity_details SET
                date = COALESCE($2, date),
                activity = COALESCE($3, activity),
                description = COALESCE($4, description),
                updated_at = NOW()
             WHERE id = $1
             RETURNING id, report_job_id, date, activity, description, created_at, updated_at",
        )
        .bind(id)
        .bind(date)
        .bind(activity)
        .bind(description)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM activity_details WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
