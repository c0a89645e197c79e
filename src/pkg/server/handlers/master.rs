use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::pkg::server::extract::{Json, Path, Query};
use crate::{
    pkg::{
        internal::adaptors::master::{
            mutators::PerusahaanMutator,
            selectors::{AcademicSelector, PerusahaanSelector},
            spec::{PerusahaanEntry, PerusahaanFields},
        },
        server::{
            handlers::{Page, found, listing},
            state::AppState,
        },
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Default, Deserialize)]
pub struct ProgramFilter {
    pub fakultas_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CourseFilter {
    pub prodi_id: Option<i64>,
}

pub async fn fakultas(State(state): State<AppState>, Query(page): Query<Page>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let (data, count) = AcademicSelector::new(&mut conn)
        .fakultas(page.limit(), page.offset())
        .await?;
    Ok(listing(data, count))
}

pub async fn program_studi(
    State(state): State<AppState>,
    Query(page): Query<Page>,
    Query(filter): Query<ProgramFilter>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let (data, count) = AcademicSelector::new(&mut conn)
        .program_studi(filter.fakultas_id, page.limit(), page.offset())
        .await?;
    Ok(listing(data, count))
}

pub async fn mata_kuliah(
    State(state): State<AppState>,
    Query(page): Query<Page>,
    Query(filter): Query<CourseFilter>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let (data, count) = AcademicSelector::new(&mut conn)
        .mata_kuliah(filter.prodi_id, page.limit(), page.offset())
        .await?;
    Ok(listing(data, count))
}

pub async fn perusahaan_index(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let (data, count) = PerusahaanSelector::new(&mut conn)
        .list(page.limit(), page.offset())
        .await?;
    Ok(listing(data, count))
}

pub async fn perusahaan_show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PerusahaanEntry>> {
    let mut conn = state.db_pool.acquire().await?;
    let row = PerusahaanSelector::new(&mut conn).get_by_id(id).await?;
    Ok(Json(found(row, "Perusahaan")?))
}

pub async fn perusahaan_store(
    State(state): State<AppState>,
    Json(fields): Json<PerusahaanFields>,
) -> Result<(StatusCode, Json<PerusahaanEntry>)> {
    if fields.nama_perusahaan.as_deref().map(str::trim).unwrap_or_default().is_empty() {
        return Err(AppError::invalid("nama_perusahaan", "nama_perusahaan is required"));
    }
    let mut conn = state.db_pool.acquire().await?;
    let row = PerusahaanMutator::new(&mut conn).create(&fields).await?;
    tracing::info!(perusahaan_id = row.id, "perusahaan created");
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn perusahaan_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(fields): Json<PerusahaanFields>,
) -> Result<Json<PerusahaanEntry>> {
    let mut conn = state.db_pool.acquire().await?;
    let row = PerusahaanMutator::new(&mut conn).update(id, &fields).await?;
    Ok(Json(found(row, "Perusahaan")?))
}

pub async fn perusahaan_destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    if !PerusahaanMutator::new(&mut conn).delete(id).await? {
        return Err(AppError::not_found("Perusahaan"));
    }
    Ok(Json(json!({ "message": "Perusahaan deleted" })))
}
