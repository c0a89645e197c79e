use std::sync::Arc;

use axum::{Extension, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::pkg::server::extract::{Json, Path, Query};
use crate::{
    pkg::{
        internal::{
            adaptors::{
                apply_jobs::{
                    mutators::ApplyJobMutator,
                    selectors::ApplyJobSelector,
                    spec::{ApplyJobEntry, ApplyJobView},
                },
                jobs::selectors::JobSelector,
            },
            auth::CurrentUser,
            workflow::{ApplicationStatus, Transition},
        },
        server::{
            handlers::{Page, found, listing},
            state::{AppState, GetTxn},
        },
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Default, Deserialize)]
pub struct ApplyJobFilter {
    pub status: Option<String>,
    pub company_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyInput {
    pub jobs: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LecturerInput {
    pub responsible_lecturer_id: Option<i64>,
    pub examiner_lecturer_id: Option<i64>,
}

/// Clients send the posting id as a number, a numeric string or a list whose
/// first element is used.
pub fn job_id_from(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(items) => items.first().and_then(job_id_from),
        _ => None,
    }
}

pub async fn index(
    State(state): State<AppState>,
    Query(page): Query<Page>,
    Query(filter): Query<ApplyJobFilter>,
) -> Result<Json<Value>> {
    let status = match filter.status.as_deref() {
        Some(raw) => Some(raw.parse::<ApplicationStatus>()?),
        None => None,
    };
    let status = status.as_ref().map(ApplicationStatus::as_str);
    let mut conn = state.db_pool.acquire().await?;
    let mut applications = ApplyJobSelector::new(&mut conn);
    let data = applications
        .list(status, filter.company_id, page.limit(), page.offset())
        .await?;
    let count = applications.count(status, filter.company_id).await?;
    Ok(listing(data, count))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<ApplyJobView>> {
    let mut conn = state.db_pool.acquire().await?;
    let view = found(ApplyJobSelector::new(&mut conn).view_by_id(id).await?, "Application")?;
    Ok(Json(view))
}

pub async fn by_user(State(state): State<AppState>, Path(user_id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let data = ApplyJobSelector::new(&mut conn).by_user(user_id).await?;
    let count = data.len() as i64;
    Ok(listing(data, count))
}

pub async fn store(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<CurrentUser>>,
    Json(input): Json<ApplyInput>,
) -> Result<(StatusCode, Json<ApplyJobView>)> {
    let job_id = input
        .jobs
        .as_ref()
        .and_then(job_id_from)
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::invalid("jobs", "a job id is required"))?;

    let mut tx = state.db_pool.begin_txn().await?;
    found(JobSelector::new(&mut tx).get_by_id(job_id).await?, "Job")?;
    let mut applications = ApplyJobMutator::new(&mut tx);
    let created = applications
        .create(&Uuid::new_v4().to_string(), user.id())
        .await?;
    applications.link_user(created.id, user.id()).await?;
    applications.link_job(created.id, job_id).await?;
    let view = found(
        ApplyJobSelector::new(&mut tx).view_by_id(created.id).await?,
        "Application",
    )?;
    tx.commit().await?;
    tracing::info!(apply_job_id = created.id, job_id, user_id = user.id(), "application submitted");
    Ok((StatusCode::CREATED, Json(view)))
}

/// Reassigns lecturers. The status only moves through the transition routes.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<LecturerInput>,
) -> Result<Json<ApplyJobEntry>> {
    let mut conn = state.db_pool.acquire().await?;
    let row = ApplyJobMutator::new(&mut conn)
        .assign_lecturers(id, input.responsible_lecturer_id, input.examiner_lecturer_id)
        .await?;
    Ok(Json(found(row, "Application")?))
}

pub async fn set_lecturer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<LecturerInput>,
) -> Result<Json<Value>> {
    if input.responsible_lecturer_id.is_none() && input.examiner_lecturer_id.is_none() {
        return Err(AppError::invalid(
            "responsible_lecturer_id",
            "a lecturer or examiner is required",
        ));
    }
    let mut conn = state.db_pool.acquire().await?;
    let row = ApplyJobMutator::new(&mut conn)
        .set_lecturer(id, input.responsible_lecturer_id, input.examiner_lecturer_id)
        .await?;
    let application = found(row, "Application")?;
    tracing::info!(apply_job_id = id, status = %application.status, "lecturers assigned");
    Ok(Json(json!({ "message": "Lecturer assigned", "data": application })))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    if !ApplyJobMutator::new(&mut conn).delete(id).await? {
        return Err(AppError::not_found("Application"));
    }
    tracing::info!(apply_job_id = id, "application deleted");
    Ok(Json(json!({ "message": "Application deleted" })))
}

/// Runs one lifecycle step as a single conditional update.
async fn transition(state: AppState, id: i64, transition: Transition) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let application = ApplyJobMutator::new(&mut conn).advance(id, transition).await?;
    tracing::info!(
        apply_job_id = id,
        action = transition.verb(),
        status = %application.status,
        "application status changed"
    );
    Ok(Json(json!({ "message": transition.outcome(), "data": application })))
}

pub async fn approve(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    transition(state, id, Transition::Approve).await
}

pub async fn reject(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    transition(state, id, Transition::Reject).await
}

pub async fn activate(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    transition(state, id, Transition::Activate).await
}

pub async fn done(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    transition(state, id, Transition::Complete).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_accepts_number_string_and_list() {
        assert_eq!(job_id_from(&json!(12)), Some(12));
        assert_eq!(job_id_from(&json!("12")), Some(12));
        assert_eq!(job_id_from(&json!([7, 8])), Some(7));
        assert_eq!(job_id_from(&json!(["9"])), Some(9));
    }

    #[test]
    fn job_id_rejects_everything_else() {
        assert_eq!(job_id_from(&json!("abc")), None);
        assert_eq!(job_id_from(&json!([])), None);
        assert_eq!(job_id_from(&json!(null)), None);
        assert_eq!(job_id_from(&json!({"id": 1})), None);
        assert_eq!(job_id_from(&json!(1.5)), None);
    }
}
