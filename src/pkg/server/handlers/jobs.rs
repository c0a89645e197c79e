use std::sync::Arc;

use axum::{Extension, extract::State, http::StatusCode};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::pkg::server::extract::{Json, Path, Query};
use crate::{
    pkg::{
        internal::{
            adaptors::{
                apply_jobs::selectors::ApplyJobSelector,
                companies::selectors::CompanySelector,
                jobs::{
                    mutators::JobMutator,
                    selectors::JobSelector,
                    spec::{JobEntry, JobScope},
                },
            },
            auth::CurrentUser,
            policy::Capability,
            workflow::JobReview,
        },
        server::{
            handlers::{Page, found, listing},
            middlewares::authn::Viewer,
            state::{AppState, GetTxn},
        },
    },
    prelude::{AppError, Result},
};

/// Posting fields accepted on create and update. On update, absent or empty
/// fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobInput {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub benefits: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<String>,
    pub vacancy_type: Option<String>,
    pub mata_kuliah: Option<String>,
    pub deadline: Option<NaiveDate>,
}

impl JobInput {
    fn require(value: &Option<String>, field: &str) -> Result<()> {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Ok(()),
            _ => Err(AppError::invalid(field, &format!("{} is required", field))),
        }
    }

    pub fn validate_new(&self) -> Result<()> {
        Self::require(&self.title, "title")?;
        Self::require(&self.company, "company")?;
        Self::require(&self.location, "location")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct JobFilter {
    pub company_id: Option<i64>,
    pub status: Option<String>,
}

pub async fn index(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Query(page): Query<Page>,
    Query(filter): Query<JobFilter>,
) -> Result<Json<Value>> {
    let scope = match viewer.user() {
        Some(user) => JobScope::for_user(user.id(), &user.role_ids),
        None => JobScope::anonymous(),
    };
    let mut conn = state.db_pool.acquire().await?;
    let mut jobs = JobSelector::new(&mut conn);
    let status = filter.status.as_deref();
    let data = jobs
        .list(&scope, filter.company_id, status, page.limit(), page.offset())
        .await?;
    let count = jobs.count(&scope, filter.company_id, status).await?;
    Ok(listing(data, count))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let job = found(JobSelector::new(&mut conn).get_by_id(id).await?, "Job")?;
    Ok(Json(json!({ "data": job })))
}

pub async fn store(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<CurrentUser>>,
    Json(mut input): Json<JobInput>,
) -> Result<(StatusCode, Json<JobEntry>)> {
    let mut tx = state.db_pool.begin_txn().await?;
    let mut company_id = None;
    if !user.can(Capability::ReviewJobs) {
        if let Some(company) = CompanySelector::new(&mut tx).get_by_owner(user.id()).await? {
            input.company = Some(company.company_name.clone());
            if company.company_address.is_some() {
                input.location = company.company_address.clone();
            }
            company_id = Some(company.id);
        }
    }
    input.validate_new()?;
    let job = JobMutator::new(&mut tx)
        .create(&input, user.id(), company_id)
        .await?;
    tx.commit().await?;
    tracing::info!(job_id = job.id, user_id = user.id(), "job posted for review");
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<JobInput>,
) -> Result<Json<JobEntry>> {
    let mut conn = state.db_pool.acquire().await?;
    let job = found(JobMutator::new(&mut conn).update(id, &input).await?, "Job")?;
    Ok(Json(job))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    if !JobMutator::new(&mut conn).delete(id).await? {
        return Err(AppError::not_found("Job"));
    }
    tracing::info!(job_id = id, "job deleted");
    Ok(Json(json!({ "message": "Job deleted" })))
}

async fn review(state: AppState, id: i64, review: JobReview) -> Result<Json<Value>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let applied = JobMutator::new(&mut tx).review(id, review).await?;
    let job = found(JobSelector::new(&mut tx).get_by_id(id).await?, "Job")?;
    tx.commit().await?;
    if applied {
        tracing::info!(job_id = id, status = review.to().as_str(), "job reviewed");
    }
    Ok(Json(json!({ "status": applied, "data": job })))
}

pub async fn approve(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    review(state, id, JobReview::Approve).await
}

pub async fn reject(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    review(state, id, JobReview::Reject).await
}

pub async fn close(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    review(state, id, JobReview::Close).await
}

/// Applicants of a posting as `{user, apply_job}` pairs.
pub async fn candidates(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    found(JobSelector::new(&mut conn).get_by_id(id).await?, "Job")?;
    let data: Vec<Value> = ApplyJobSelector::new(&mut conn)
        .by_job(id)
        .await?
        .into_iter()
        .map(|view| {
            json!({
                "user": {
                    "id": view.user_id,
                    "name": view.user_name,
                    "email": view.user_email,
                    "nim": view.nim,
                    "program_study": view.program_study,
                    "faculty": view.faculty,
                },
                "apply_job": view.apply_job,
            })
        })
        .collect();
    let count = data.len() as i64;
    Ok(listing(data, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_postings_need_title_company_and_location() {
        let mut input = JobInput {
            title: Some("Backend Intern".into()),
            company: Some("PT Pos".into()),
            location: Some("Bandung".into()),
            ..JobInput::default()
        };
        assert!(input.validate_new().is_ok());

        input.location = Some("   ".into());
        let err = input.validate_new().unwrap_err();
        assert_eq!(err.to_string(), "validation failed");

        input.location = Some("Bandung".into());
        input.title = None;
        assert!(matches!(input.validate_new(), Err(AppError::Validation(_))));
    }

    #[test]
    fn deadline_parses_as_plain_date() {
        let input: JobInput =
            serde_json::from_str(r#"{"title":"x","deadline":"2025-03-01"}"#).unwrap();
        assert_eq!(input.deadline, NaiveDate::from_ymd_opt(2025, 3, 1));
    }
}
