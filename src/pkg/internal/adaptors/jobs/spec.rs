use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::pkg::internal::{
    policy::{self, Capability},
    workflow::JobStatus,
};

pub const JOB_COLUMNS: &str = "id, title, company, location, duration, description, benefits, \
    job_type, salary, vacancy_type, status, mata_kuliah, deadline, company_id, created_by_id, \
    created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobEntry {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub location: String,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub benefits: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<String>,
    pub vacancy_type: Option<String>,
    pub status: String,
    pub mata_kuliah: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub company_id: Option<i64>,
    pub created_by_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Which postings a viewer may list.
#[derive(Debug, Clone, PartialEq)]
pub struct JobScope {
    pub statuses: Vec<String>,
    pub owner: Option<i64>,
}

impl JobScope {
    pub fn anonymous() -> Self {
        JobScope {
            statuses: vec![JobStatus::Available.as_str().to_string()],
            owner: None,
        }
    }

    /// Reviewers see everything under review; everyone else sees open
    /// postings plus their own.
    pub fn for_user(user_id: i64, role_ids: &[i64]) -> Self {
        if policy::any_can(role_ids, Capability::ReviewJobs) {
            JobScope {
                statuses: JobStatus::reviewable(),
                owner: None,
            }
        } else {
            JobScope {
                statuses: vec![JobStatus::Available.as_str().to_string()],
                owner: Some(user_id),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_viewers_see_open_postings() {
        let scope = JobScope::anonymous();
        assert_eq!(scope.statuses, vec!["Tersedia".to_string()]);
        assert_eq!(scope.owner, None);
    }

    #[test]
    fn reviewers_see_the_review_queue() {
        for roles in [vec![1], vec![3], vec![2, 3]] {
            let scope = JobScope::for_user(9, &roles);
            assert_eq!(scope.statuses, vec!["Perlu Ditinjau", "Tersedia", "Ditolak"]);
            assert_eq!(scope.owner, None);
        }
    }

    #[test]
    fn members_also_see_their_own_postings() {
        let scope = JobScope::for_user(9, &[4]);
        assert_eq!(scope.statuses, vec!["Tersedia".to_string()]);
        assert_eq!(scope.owner, Some(9));
    }
}
