use axum::extract::State;
use serde_json::{Value, json};
use sqlx::query;

use crate::pkg::server::extract::Json;
use crate::{
    pkg::server::state::AppState,
    prelude::{AppError, Result},
};

pub async fn livez() -> Result<()> {
    tracing::debug!("service is live");
    Ok(())
}

pub async fn healthz(State(state): State<AppState>) -> Result<()> {
    query("select 1").execute(&*state.db_pool).await?;
    tracing::debug!("service is healthy");
    Ok(())
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "app": state.service_name.as_str(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn test() -> Json<Value> {
    Json(json!({ "code": 200, "message": "ok" }))
}

pub async fn fallback() -> AppError {
    AppError::NotFound("Route not found".into())
}
