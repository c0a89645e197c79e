use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const APPLY_JOB_COLUMNS: &str = "id, job_user, status, responsible_lecturer_id, \
    examiner_lecturer_id, created_by_id, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplyJobEntry {
    pub id: i64,
    pub job_user: Option<String>,
    pub status: String,
    pub responsible_lecturer_id: Option<i64>,
    pub examiner_lecturer_id: Option<i64>,
    pub created_by_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An application joined with its applicant, posting and assigned lecturers.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplyJobView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub apply_job: ApplyJobEntry,
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub nim: Option<String>,
    pub program_study: Option<String>,
    pub faculty: Option<String>,
    pub job_id: Option<i64>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub company_id: Option<i64>,
    pub responsible_lecturer_name: Option<String>,
    pub examiner_lecturer_name: Option<String>,
}

pub(super) const VIEW_SELECT: &str = r#"
    SELECT aj.id, aj.job_user, aj.status, aj.responsible_lecturer_id, aj.examiner_lecturer_id,
        aj.created_by_id, aj.created_at, aj.updated_at,
        u.id AS user_id, u.name AS user_name, u.email AS user_email, u.nim, u.program_study, u.faculty,
        j.id AS job_id, j.title AS job_title, j.company, j.company_id,
        rl.name AS responsible_lecturer_name, el.name AS examiner_lecturer_name
    FROM apply_jobs aj
    LEFT JOIN LATERAL (
        SELECT user_id FROM apply_job_user WHERE apply_job_id = aj.id ORDER BY user_id LIMIT 1
    ) aju ON true
    LEFT JOIN users u ON u.id = aju.user_id
    LEFT JOIN LATERAL (
        SELECT job_id FROM apply_job_job WHERE apply_job_id = aj.id ORDER BY job_id LIMIT 1
    ) ajj ON true
    LEFT JOIN jobs j ON j.id = ajj.job_id
    LEFT JOIN users rl ON rl.id = aj.responsible_lecturer_id
    LEFT JOIN users el ON el.id = aj.examiner_lecturer_id
"#;

#[derive(Debug, Clone, FromRow)]
pub struct MonthlyCount {
    pub status: String,
    pub month: i32,
    pub count: i64,
}
