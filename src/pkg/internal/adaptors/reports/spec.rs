use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const REPORT_DRAFT: &str = "Draft";
pub const REPORT_IN_PROGRESS: &str = "Berjalan";
pub const REPORT_DONE: &str = "Selesai";

pub const REPORT_COLUMNS: &str = "id, apply_job_id, report_job_user, start_date, end_date, status, \
    file_laporan, company_checked_id, company_checked_at, lecturer_checked_id, lecturer_checked_at, \
    examiner_checked_id, examiner_checked_at, prodi_checked_id, prodi_checked_at, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportEntry {
    pub id: i64,
    pub apply_job_id: i64,
    pub report_job_user: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: String,
    pub file_laporan: Option<String>,
    pub company_checked_id: Option<i64>,
    pub company_checked_at: Option<DateTime<Utc>>,
    pub lecturer_checked_id: Option<i64>,
    pub lecturer_checked_at: Option<DateTime<Utc>>,
    pub examiner_checked_id: Option<i64>,
    pub examiner_checked_at: Option<DateTime<Utc>>,
    pub prodi_checked_id: Option<i64>,
    pub prodi_checked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReportEntry {
    /// A report is done once the company, the supervising lecturer and the
    /// examiner have all signed it. Prodi sign-off is recorded but not required.
    pub fn sign_off_status(&self) -> &'static str {
        if self.company_checked_id.is_some()
            && self.lecturer_checked_id.is_some()
            && self.examiner_checked_id.is_some()
        {
            REPORT_DONE
        } else {
            REPORT_IN_PROGRESS
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityEntry {
    pub id: i64,
    pub report_job_id: i64,
    pub date: Option<NaiveDate>,
    pub activity: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ReportEntry {
        ReportEntry {
            id: 1,
            apply_job_id: 1,
            report_job_user: None,
            start_date: None,
            end_date: None,
            status: REPORT_DRAFT.into(),
            file_laporan: None,
            company_checked_id: None,
            company_checked_at: None,
            lecturer_checked_id: None,
            lecturer_checked_at: None,
            examiner_checked_id: None,
            examiner_checked_at: None,
            prodi_checked_id: None,
            prodi_checked_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn unsigned_report_is_in_progress() {
        assert_eq!(report().sign_off_status(), REPORT_IN_PROGRESS);
    }

    #[test]
    fn prodi_alone_does_not_finish_a_report() {
        let r = ReportEntry {
            prodi_checked_id: Some(4),
            company_checked_id: Some(2),
            lecturer_checked_id: Some(3),
            ..report()
        };
        assert_eq!(r.sign_off_status(), REPORT_IN_PROGRESS);
    }

    #[test]
    fn three_signatures_finish_a_report() {
        let r = ReportEntry {
            company_checked_id: Some(2),
            lecturer_checked_id: Some(3),
            examiner_checked_id: Some(5),
            ..report()
        };
        assert_eq!(r.sign_off_status(), REPORT_DONE);
    }
}
