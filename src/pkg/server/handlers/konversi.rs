use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::pkg::server::extract::{Json, Path, Query};
use crate::{
    pkg::{
        internal::adaptors::master::{
            mutators::KonversiMutator, selectors::KonversiSelector, spec::KonversiEntry,
        },
        server::{
            handlers::{found, listing},
            state::AppState,
        },
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Default, Deserialize)]
pub struct KonversiFilter {
    pub apply_job_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct KonversiInput {
    pub apply_job_id: i64,
    pub matkul_id: i64,
    #[validate(length(min = 1, max = 2, message = "must be a letter grade"))]
    pub grade: String,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub score: f64,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct KonversiPatch {
    #[validate(length(min = 1, max = 2, message = "must be a letter grade"))]
    pub grade: Option<String>,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub score: Option<f64>,
}

pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<KonversiFilter>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let data = KonversiSelector::new(&mut conn).list(filter.apply_job_id).await?;
    let count = data.len() as i64;
    Ok(listing(data, count))
}

/// Creates or overwrites the conversion for a course. 201 on first write, 200 after.
pub async fn store(
    State(state): State<AppState>,
    Json(input): Json<KonversiInput>,
) -> Result<(StatusCode, Json<KonversiEntry>)> {
    input.validate()?;
    let mut conn = state.db_pool.acquire().await?;
    let saved = KonversiMutator::new(&mut conn)
        .upsert(input.apply_job_id, input.matkul_id, &input.grade, input.score)
        .await?;
    let status = if saved.inserted { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(saved.entry)))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<KonversiEntry>> {
    let mut conn = state.db_pool.acquire().await?;
    let row = KonversiSelector::new(&mut conn).get_by_id(id).await?;
    Ok(Json(found(row, "Konversi nilai")?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<KonversiPatch>,
) -> Result<Json<KonversiEntry>> {
    patch.validate()?;
    let mut conn = state.db_pool.acquire().await?;
    let row = KonversiMutator::new(&mut conn)
        .update(id, patch.grade.as_deref(), patch.score)
        .await?;
    Ok(Json(found(row, "Konversi nilai")?))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    if !KonversiMutator::new(&mut conn).delete(id).await? {
        return Err(AppError::not_found("Konversi nilai"));
    }
    Ok(Json(json!({ "message": "Konversi nilai deleted" })))
}
