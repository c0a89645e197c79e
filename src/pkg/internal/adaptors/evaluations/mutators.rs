use sqlx::PgConnection;

use crate::pkg::internal::adaptors::evaluations::spec::{
    EVALUATION_COLUMNS, EVALUATION_GRADED, EVALUATION_PENDING, EvaluationEntry, GradeSubmission,
};
use crate::pkg::internal::policy::Slot;
use crate::prelude::Result;

pub struct EvaluationMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> EvaluationMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        EvaluationMutator { pool }
    }

    /// Creates the ungraded record for an application if it does not exist yet.
    pub async fn ensure_stub(&mut self, apply_job_id: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO evaluations (apply_job_id, status) VALUES ($1, $2)
             ON CONFLICT (apply_job_id) DO NOTHING",
        )
        .bind(apply_job_id)
        .bind(EVALUATION_PENDING)
        .execute(&mut *self.pool)
        .await?;
        Ok(())
    }

    /// Writes the submission into every slot and marks the evaluation graded.
    pub async fn grade(
        &mut self,
        apply_job_id: i64,
        slots: &[Slot],
        submission: &GradeSubmission,
    ) -> Result<EvaluationEntry> {
        let mut query = String::from("UPDATE evaluations SET status = $2, updated_at = NOW()");
        for slot in slots {
            let prefix = slot.column_prefix();
            query.push_str(&format!(
                ", {grader} = $3, {prefix}_grade = $4, {prefix}_grade_score = $5, \
                 {prefix}_grade_description = $6, {prefix}_grade_date = NOW()",
                grader = slot.grader_column(),
            ));
        }
        query.push_str(&format!(" WHERE apply_job_id = $1 RETURNING {}", EVALUATION_COLUMNS));

        let row = sqlx::query_as::<_, EvaluationEntry>(&query)
            .bind(apply_job_id)
            .bind(EVALUATION_GRADED)
            .bind(submission.grader_id)
            .bind(&submission.grade)
            .bind(submission.score)
            .bind(&submission.description)
            .fetch_one(&mut *self.pool)
            .await?;
        Ok(row)
    }

    pub async fn set_final_grade(&mut self, id: i64, grade: &str) -> Result<EvaluationEntry> {
        let row = sqlx::query_as::<_, EvaluationEntry>(&format!(
            "UPDATE evaluations SET grade = $2 WHERE id = $1 RETURNING {}",
            EVALUATION_COLUMNS
        ))
        .bind(id)
        .bind(grade)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
