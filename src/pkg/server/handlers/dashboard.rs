use axum::extract::State;
use chrono::{Datelike, Utc};
use serde::Serialize;
use serde_json::{Value, json};

use crate::pkg::server::extract::Json;
use crate::{
    pkg::{
        internal::{
            adaptors::{
                apply_jobs::{selectors::ApplyJobSelector, spec::MonthlyCount},
                companies::selectors::CompanySelector,
                jobs::selectors::JobSelector,
                users::selectors::UserSelector,
            },
            policy::Role,
            workflow::{ApplicationStatus, JobStatus},
        },
        server::state::AppState,
    },
    prelude::Result,
};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

const LATEST: i64 = 5;

#[derive(Debug, Serialize, PartialEq)]
pub struct Series {
    pub label: &'static str,
    pub data: [i64; 12],
}

/// One series per application status, zero-filled for months without applications.
pub fn monthly_series(counts: &[MonthlyCount]) -> Vec<Series> {
    ApplicationStatus::ALL
        .iter()
        .map(|status| {
            let mut data = [0; 12];
            for row in counts.iter().filter(|r| r.status == status.as_str()) {
                if let Some(slot) = usize::try_from(row.month - 1).ok().and_then(|i| data.get_mut(i)) {
                    *slot += row.count;
                }
            }
            Series {
                label: status.as_str(),
                data,
            }
        })
        .collect()
}

pub async fn overview(State(state): State<AppState>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let companies = CompanySelector::new(&mut conn).count().await?;
    let jobs = JobSelector::new(&mut conn).count_all().await?;
    let students = UserSelector::new(&mut conn)
        .count_by_role(Role::Student.name(), None)
        .await?;
    let mut applications = ApplyJobSelector::new(&mut conn);
    let active = applications
        .count_by_status(ApplicationStatus::Aktif.as_str())
        .await?;
    let year = Utc::now().year();
    let monthly = applications.monthly_counts(year).await?;
    let latest_applications = applications.latest(LATEST).await?;

    let latest_jobs = JobSelector::new(&mut conn)
        .latest(&[JobStatus::Available.as_str().to_string()], LATEST)
        .await?;
    let latest_companies = CompanySelector::new(&mut conn).list(LATEST, 0).await?;

    Ok(Json(json!({
        "totals": {
            "companies": companies,
            "jobs": jobs,
            "students": students,
            "active_placements": active,
        },
        "chart": {
            "year": year,
            "labels": MONTH_LABELS,
            "series": monthly_series(&monthly),
        },
        "latest": {
            "jobs": latest_jobs,
            "companies": latest_companies,
            "applications": latest_applications,
        },
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(status: &str, month: i32, count: i64) -> MonthlyCount {
        MonthlyCount {
            status: status.to_string(),
            month,
            count,
        }
    }

    #[test]
    fn every_status_gets_twelve_months() {
        let series = monthly_series(&[]);
        assert_eq!(series.len(), ApplicationStatus::ALL.len());
        assert!(series.iter().all(|s| s.data == [0; 12]));
        assert_eq!(series[0].label, "Melamar");
    }

    #[test]
    fn counts_land_in_their_month() {
        let series = monthly_series(&[
            count("Melamar", 1, 3),
            count("Melamar", 12, 2),
            count("Aktif", 6, 4),
            count("Unknown", 2, 9),
            count("Aktif", 13, 1),
        ]);
        let melamar = series.iter().find(|s| s.label == "Melamar").unwrap();
        assert_eq!(melamar.data[0], 3);
        assert_eq!(melamar.data[11], 2);
        let aktif = series.iter().find(|s| s.label == "Aktif").unwrap();
        assert_eq!(aktif.data[5], 4);
        assert_eq!(aktif.data.iter().sum::<i64>(), 4);
    }
}
