use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::pkg::internal::grading::ComponentScores;

pub const EVALUATION_PENDING: &str = "Belum Dinilai";
pub const EVALUATION_GRADED: &str = "Sudah Dinilai";

pub const EVALUATION_COLUMNS: &str = "id, apply_job_id, status, grade, \
    company_personnel_id, company_grade, company_grade_score, company_grade_description, company_grade_date, \
    lecturer_id, lecturer_grade, lecturer_grade_score, lecturer_grade_description, lecturer_grade_date, \
    examiner_id, examiner_grade, examiner_grade_score, examiner_grade_description, examiner_grade_date, \
    prodi_id, prodi_grade, prodi_grade_score, prodi_grade_description, prodi_grade_date, \
    created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EvaluationEntry {
    pub id: i64,
    pub apply_job_id: i64,
    pub status: String,
    pub grade: Option<String>,
    pub company_personnel_id: Option<i64>,
    pub company_grade: Option<String>,
    pub company_grade_score: Option<f64>,
    pub company_grade_description: Option<String>,
    pub company_grade_date: Option<DateTime<Utc>>,
    pub lecturer_id: Option<i64>,
    pub lecturer_grade: Option<String>,
    pub lecturer_grade_score: Option<f64>,
    pub lecturer_grade_description: Option<String>,
    pub lecturer_grade_date: Option<DateTime<Utc>>,
    pub examiner_id: Option<i64>,
    pub examiner_grade: Option<String>,
    pub examiner_grade_score: Option<f64>,
    pub examiner_grade_description: Option<String>,
    pub examiner_grade_date: Option<DateTime<Utc>>,
    pub prodi_id: Option<i64>,
    pub prodi_grade: Option<String>,
    pub prodi_grade_score: Option<f64>,
    pub prodi_grade_description: Option<String>,
    pub prodi_grade_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EvaluationEntry {
    pub fn scores(&self) -> ComponentScores {
        ComponentScores {
            company: self.company_grade_score,
            lecturer: self.lecturer_grade_score,
            examiner: self.examiner_grade_score,
        }
    }
}

/// One grader's submission for their slot.
#[derive(Debug, Clone)]
pub struct GradeSubmission {
    pub grader_id: i64,
    pub grade: String,
    pub score: f64,
    pub description: Option<String>,
}
