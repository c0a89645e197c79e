use sqlx::PgConnection;

use crate::pkg::internal::adaptors::apply_jobs::spec::{APPLY_JOB_COLUMNS, ApplyJobEntry};
use crate::pkg::internal::workflow::{ApplicationStatus, Transition};
use crate::prelude::Result;

pub struct ApplyJobMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ApplyJobMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ApplyJobMutator { pool }
    }

    pub async fn create(&mut self, job_user: &str, created_by_id: i64) -> Result<ApplyJobEntry> {
        let row = sqlx::query_as::<_, ApplyJobEntry>(&format!(
            "INSERT INTO apply_jobs (job_user, status, created_by_id) VALUES ($1, $2, $3) RETURNING {}",
            APPLY_JOB_COLUMNS
        ))
        .bind(job_user)
        .bind(ApplicationStatus::Melamar.as_str())
        .bind(created_by_id)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn link_user(&mut self, apply_job_id: i64, user_id: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO apply_job_user (apply_job_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(apply_job_id)
        .bind(user_id)
        .execute(&mut *self.pool)
        .await?;
        Ok(())
    }

    pub async fn link_job(&mut self, apply_job_id: i64, job_id: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO apply_job_job (apply_job_id, job_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(apply_job_id)
        .bind(job_id)
        .execute(&mut *self.pool)
        .await?;
        Ok(())
    }

    /// Sets the lecturer assignments without touching the status.
    pub async fn assign_lecturers(
        &mut self,
        id: i64,
        lecturer_id: Option<i64>,
        examiner_id: Option<i64>,
    ) -> Result<Option<ApplyJobEntry>> {
        let row = sqlx::query_as::<_, ApplyJobEntry>(&format!(
            "UPDATE apply_jobs SET
                responsible_lecturer_id = COALESCE($2, responsible_lecturer_id),
                examiner_lecturer_id = COALESCE($3, examiner_lecturer_id),
                updated_at = NOW()
             WHERE id = $1 RETURNING {}",
            APPLY_JOB_COLUMNS
        ))
        .bind(id)
        .bind(lecturer_id)
        .bind(examiner_id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Assigns lecturers and activates an approved application in the same statement.
    pub async fn set_lecturer(
        &mut self,
        id: i64,
        lecturer_id: Option<i64>,
        examiner_id: Option<i64>,
    ) -> Result<Option<ApplyJobEntry>> {
        let activate = Transition::Activate;
        let row = sqlx::query_as::<_, ApplyJobEntry>(&format!(
            "UPDATE apply_jobs SET
                responsible_lecturer_id = COALESCE($2, responsible_lecturer_id),
                examiner_lecturer_id = COALESCE($3, examiner_lecturer_id),
                status = CASE WHEN status = $4 THEN $5 ELSE status END,
                updated_at = NOW()
             WHERE id = $1 RETURNING {}",
            APPLY_JOB_COLUMNS
        ))
        .bind(id)
        .bind(lecturer_id)
        .bind(examiner_id)
        .bind(activate.from().as_str())
        .bind(activate.to().as_str())
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Applies the transition only when the stored status is its predecessor.
    /// `None` means no row matched: either the id is unknown or the status was wrong.
    pub async fn transition(&mut self, id: i64, transition: Transition) -> Result<Option<ApplyJobEntry>> {
        let row = sqlx::query_as::<_, ApplyJobEntry>(&format!(
            "UPDATE apply_jobs SET status = $3, updated_at = NOW()
             WHERE id = $1 AND status = $2 RETURNING {}",
            APPLY_JOB_COLUMNS
        ))
        .bind(id)
        .bind(transition.from().as_str())
        .bind(transition.to().as_str())
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Runs the transition and explains a miss from the status stored afterwards.
    pub async fn advance(&mut self, id: i64, transition: Transition) -> Result<ApplyJobEntry> {
        if let Some(row) = self.transition(id, transition).await? {
            return Ok(row);
        }
        let current: Option<String> = sqlx::query_scalar("SELECT status FROM apply_jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.pool)
            .await?;
        Err(transition.refusal(current.as_deref()))
    }

    pub async fn delete(&mut self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM apply_jobs WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;
    use crate::prelude::AppError;

    async fn applicant(pool: &PgPool) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO users (name, email, username, password)
             VALUES ('Siti', 'siti@example.com', 'siti', 'x') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn stored_status(pool: &PgPool, id: i64) -> String {
        sqlx::query_scalar("SELECT status FROM apply_jobs WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn approving_twice_succeeds_once(pool: PgPool) {
        let user_id = applicant(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut applications = ApplyJobMutator::new(&mut conn);
        let created = applications.create("job-user", user_id).await.unwrap();

        let approved = applications.advance(created.id, Transition::Approve).await.unwrap();
        assert_eq!(approved.status, "Disetujui");

        let err = applications
            .advance(created.id, Transition::Approve)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
        drop(applications);
        assert_eq!(stored_status(&pool, created.id).await, "Disetujui");
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn rejected_application_cannot_be_activated(pool: PgPool) {
        let user_id = applicant(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut applications = ApplyJobMutator::new(&mut conn);
        let created = applications.create("job-user", user_id).await.unwrap();

        applications.advance(created.id, Transition::Reject).await.unwrap();
        let err = applications
            .advance(created.id, Transition::Activate)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition(_)));
        drop(applications);
        assert_eq!(stored_status(&pool, created.id).await, "Ditolak");
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn unknown_application_is_not_found(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let err = ApplyJobMutator::new(&mut conn)
            .advance(9999, Transition::Complete)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[sqlx::test]
    #[ignore = "needs DATABASE_URL pointing at a Postgres server"]
    async fn full_lifecycle_reaches_selesai(pool: PgPool) {
        let user_id = applicant(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut applications = ApplyJobMutator::new(&mut conn);
        let created = applications.create("job-user", user_id).await.unwrap();
        for step in [Transition::Approve, Transition::Activate, Transition::Complete] {
            let row = applications.advance(created.id, step).await.unwrap();
            assert_eq!(row.status, step.to().as_str());
        }
    }
}
