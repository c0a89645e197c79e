use std::sync::Arc;

use axum::{Extension, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::pkg::server::extract::{Json, Path, Query};
use crate::{
    pkg::{
        internal::{
            adaptors::companies::{
                mutators::CompanyMutator,
                selectors::CompanySelector,
                spec::{CompanyEntry, CompanyProfile},
            },
            auth::CurrentUser,
        },
        server::{
            handlers::{Page, found, listing},
            state::AppState,
        },
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct CompanyInput {
    pub user_id: Option<i64>,
    #[serde(flatten)]
    pub profile: CompanyProfile,
}

pub async fn index(State(state): State<AppState>, Query(page): Query<Page>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let mut companies = CompanySelector::new(&mut conn);
    let data = companies.list(page.limit(), page.offset()).await?;
    let count = companies.count().await?;
    Ok(listing(data, count))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<CompanyEntry>> {
    let mut conn = state.db_pool.acquire().await?;
    let row = CompanySelector::new(&mut conn).get_by_id(id).await?;
    Ok(Json(found(row, "Company")?))
}

pub async fn store(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<CurrentUser>>,
    Json(input): Json<CompanyInput>,
) -> Result<(StatusCode, Json<CompanyEntry>)> {
    if input.profile.company_name.as_deref().map(str::trim).unwrap_or_default().is_empty() {
        return Err(AppError::invalid("company_name", "company_name is required"));
    }
    let mut conn = state.db_pool.acquire().await?;
    let company = CompanyMutator::new(&mut conn)
        .create(&input.profile, input.user_id, user.id())
        .await?;
    tracing::info!(company_id = company.id, user_id = user.id(), "company created");
    Ok((StatusCode::CREATED, Json(company)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CompanyInput>,
) -> Result<Json<CompanyEntry>> {
    let mut conn = state.db_pool.acquire().await?;
    let row = CompanyMutator::new(&mut conn).update(id, &input.profile).await?;
    Ok(Json(found(row, "Company")?))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    if !CompanyMutator::new(&mut conn).delete(id).await? {
        return Err(AppError::not_found("Company"));
    }
    tracing::info!(company_id = id, "company deleted");
    Ok(Json(json!({ "message": "Company deleted" })))
}
