use axum::{extract::State, http::StatusCode};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::pkg::server::extract::{Json, Path, Query};
use crate::{
    pkg::{
        internal::adaptors::reports::{
            mutators::ActivityMutator, selectors::ActivitySelector, spec::ActivityEntry,
        },
        server::{
            handlers::{Page, found, listing},
            state::AppState,
        },
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Default, Deserialize)]
pub struct ActivityFilter {
    pub report_job_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActivityInput {
    pub report_job_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub activity: Option<String>,
    pub description: Option<String>,
}

pub async fn index(
    State(state): State<AppState>,
    Query(page): Query<Page>,
    Query(filter): Query<ActivityFilter>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let mut activities = ActivitySelector::new(&mut conn);
    let data = activities
        .list(filter.report_job_id, page.limit(), page.offset())
        .await?;
    let count = activities.count(filter.report_job_id).await?;
    Ok(listing(data, count))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<ActivityEntry>> {
    let mut conn = state.db_pool.acquire().await?;
    let activity = found(ActivitySelector::new(&mut conn).get_by_id(id).await?, "Activity")?;
    Ok(Json(activity))
}

pub async fn store(
    State(state): State<AppState>,
    Json(input): Json<ActivityInput>,
) -> Result<(StatusCode, Json<ActivityEntry>)> {
    let report_job_id = input
        .report_job_id
        .ok_or_else(|| AppError::invalid("report_job_id", "report_job_id is required"))?;
    let mut conn = state.db_pool.acquire().await?;
    let activity = ActivityMutator::new(&mut conn)
        .create(
            report_job_id,
            input.date,
            input.activity.as_deref(),
            input.description.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ActivityInput>,
) -> Result<Json<ActivityEntry>> {
    let mut conn = state.db_pool.acquire().await?;
    let row = ActivityMutator::new(&mut conn)
        .update(
            id,
            input.date,
            input.activity.as_deref(),
            input.description.as_deref(),
        )
        .await?;
    Ok(Json(found(row, "Activity")?))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    if !ActivityMutator::new(&mut conn).delete(id).await? {
        return Err(AppError::not_found("Activity"));
    }
    Ok(Json(json!({ "message": "Activity deleted" })))
}
