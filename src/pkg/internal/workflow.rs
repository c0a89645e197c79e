//! Status lifecycles for applications and job postings.
//!
//! Transitions are only legal from one predecessor. Persisting them goes
//! through a conditional update keyed on that predecessor, so the check and
//! the write happen in the same statement.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::prelude::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Melamar,
    Disetujui,
    Aktif,
    Selesai,
    Ditolak,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Melamar,
        ApplicationStatus::Disetujui,
        ApplicationStatus::Aktif,
        ApplicationStatus::Selesai,
        ApplicationStatus::Ditolak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Melamar => "Melamar",
            ApplicationStatus::Disetujui => "Disetujui",
            ApplicationStatus::Aktif => "Aktif",
            ApplicationStatus::Selesai => "Selesai",
            ApplicationStatus::Ditolak => "Ditolak",
        }
    }

    pub fn apply(self, transition: Transition) -> Result<ApplicationStatus, AppError> {
        if self == transition.from() {
            Ok(transition.to())
        } else {
            Err(transition.rejection())
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::invalid("status", &format!("unknown application status '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Approve,
    Reject,
    Activate,
    Complete,
}

impl Transition {
    pub fn from(&self) -> ApplicationStatus {
        match self {
            Transition::Approve | Transition::Reject => ApplicationStatus::Melamar,
            Transition::Activate => ApplicationStatus::Disetujui,
            Transition::Complete => ApplicationStatus::Aktif,
        }
    }

    pub fn to(&self) -> ApplicationStatus {
        match self {
            Transition::Approve => ApplicationStatus::Disetujui,
            Transition::Reject => ApplicationStatus::Ditolak,
            Transition::Activate => ApplicationStatus::Aktif,
            Transition::Complete => ApplicationStatus::Selesai,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Transition::Approve => "approve",
            Transition::Reject => "reject",
            Transition::Activate => "activate",
            Transition::Complete => "complete",
        }
    }

    /// Response message after a successful transition.
    pub fn outcome(&self) -> &'static str {
        match self {
            Transition::Approve => "Application approved",
            Transition::Reject => "Application rejected",
            Transition::Activate => "Application activated",
            Transition::Complete => "Application completed",
        }
    }

    pub fn rejection(&self) -> AppError {
        AppError::InvalidTransition(format!(
            "Can only {} applications with status '{}'",
            self.verb(),
            self.from()
        ))
    }

    /// Error for a conditional update that matched no row, given the status
    /// stored afterwards (`None` when the application does not exist).
    pub fn refusal(&self, current: Option<&str>) -> AppError {
        let Some(raw) = current else {
            return AppError::not_found("Application");
        };
        match raw.parse::<ApplicationStatus>() {
            Ok(status) => status.apply(*self).err().unwrap_or_else(|| self.rejection()),
            Err(_) => self.rejection(),
        }
    }
}

/// Review lifecycle of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    PendingReview,
    Available,
    Rejected,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::PendingReview => "Perlu Ditinjau",
            JobStatus::Available => "Tersedia",
            JobStatus::Rejected => "Ditolak",
            JobStatus::Closed => "Ditutup",
        }
    }

    /// Statuses a reviewer sees in listings.
    pub fn reviewable() -> Vec<String> {
        [JobStatus::PendingReview, JobStatus::Available, JobStatus::Rejected]
            .iter()
            .map(|s| s.as_str().to_string())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobReview {
    Approve,
    Reject,
    Close,
}

impl JobReview {
    pub fn from(&self) -> JobStatus {
        match self {
            JobReview::Approve | JobReview::Reject => JobStatus::PendingReview,
            JobReview::Close => JobStatus::Available,
        }
    }

    pub fn to(&self) -> JobStatus {
        match self {
            JobReview::Approve => JobStatus::Available,
            JobReview::Reject => JobStatus::Rejected,
            JobReview::Close => JobStatus::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    #[test]
    fn happy_path_walks_the_lifecycle() {
        let status = Melamar.apply(Transition::Approve).unwrap();
        assert_eq!(status, Disetujui);
        let status = status.apply(Transition::Activate).unwrap();
        assert_eq!(status, Aktif);
        let status = status.apply(Transition::Complete).unwrap();
        assert_eq!(status, Selesai);
    }

    #[test]
    fn approve_only_from_melamar() {
        for status in ApplicationStatus::ALL {
            let result = status.apply(Transition::Approve);
            if status == Melamar {
                assert_eq!(result.unwrap(), Disetujui);
            } else {
                assert!(matches!(result, Err(AppError::InvalidTransition(_))));
            }
        }
    }

    #[test]
    fn approving_twice_fails_the_second_time() {
        let first = Melamar.apply(Transition::Approve).unwrap();
        let second = first.apply(Transition::Approve);
        assert!(matches!(second, Err(AppError::InvalidTransition(_))));
        assert_eq!(first, Disetujui);
    }

    #[test]
    fn rejected_cannot_be_activated() {
        let rejected = Melamar.apply(Transition::Reject).unwrap();
        assert_eq!(rejected, Ditolak);
        assert!(rejected.apply(Transition::Activate).is_err());
    }

    #[test]
    fn refusal_of_unknown_application_is_not_found() {
        assert!(matches!(
            Transition::Approve.refusal(None),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn refusal_names_the_required_status() {
        let err = Transition::Approve.refusal(Some("Disetujui"));
        assert!(matches!(err, AppError::InvalidTransition(_)));
        assert_eq!(
            err.to_string(),
            "Can only approve applications with status 'Melamar'"
        );
        let err = Transition::Activate.refusal(Some("Ditolak"));
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[test]
    fn refusal_after_a_lost_race_is_still_a_bad_transition() {
        let err = Transition::Approve.refusal(Some("Melamar"));
        assert!(matches!(err, AppError::InvalidTransition(_)));
        let err = Transition::Complete.refusal(Some("garbage"));
        assert!(matches!(err, AppError::InvalidTransition(_)));
    }

    #[test]
    fn no_skipping_or_going_back() {
        assert!(Melamar.apply(Transition::Activate).is_err());
        assert!(Melamar.apply(Transition::Complete).is_err());
        assert!(Aktif.apply(Transition::Approve).is_err());
        assert!(Selesai.apply(Transition::Activate).is_err());
    }

    #[test]
    fn rejection_message_names_the_required_status() {
        let err = Transition::Activate.rejection();
        assert_eq!(
            err.to_string(),
            "Can only activate applications with status 'Disetujui'"
        );
    }

    #[test]
    fn status_parses_from_its_label() {
        assert_eq!("Aktif".parse::<ApplicationStatus>().unwrap(), Aktif);
        assert!("aktif".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn job_review_edges() {
        assert_eq!(JobReview::Approve.from(), JobStatus::PendingReview);
        assert_eq!(JobReview::Approve.to().as_str(), "Tersedia");
        assert_eq!(JobReview::Close.from().as_str(), "Tersedia");
        assert_eq!(JobReview::Close.to().as_str(), "Ditutup");
        assert_eq!(JobStatus::reviewable().len(), 3);
    }
}
