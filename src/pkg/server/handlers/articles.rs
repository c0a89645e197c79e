use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::pkg::server::extract::{Json, Path, Query};
use crate::{
    pkg::{
        internal::adaptors::articles::{
            mutators::ArticleMutator, selectors::ArticleSelector, spec::ArticleEntry,
        },
        server::{
            handlers::{Page, found, listing},
            state::AppState,
        },
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Deserialize, Validate)]
pub struct ArticleInput {
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

pub async fn index(State(state): State<AppState>, Query(page): Query<Page>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let mut articles = ArticleSelector::new(&mut conn);
    let data = articles.list(page.limit(), page.offset()).await?;
    let count = articles.count().await?;
    Ok(listing(data, count))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<ArticleEntry>> {
    let mut conn = state.db_pool.acquire().await?;
    let row = ArticleMutator::new(&mut conn).view(id).await?;
    Ok(Json(found(row, "Article")?))
}

pub async fn store(
    State(state): State<AppState>,
    Json(input): Json<ArticleInput>,
) -> Result<(StatusCode, Json<ArticleEntry>)> {
    input.validate()?;
    let mut conn = state.db_pool.acquire().await?;
    let article = ArticleMutator::new(&mut conn)
        .create(&input.title, input.content.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<ArticlePatch>,
) -> Result<Json<ArticleEntry>> {
    let mut conn = state.db_pool.acquire().await?;
    let row = ArticleMutator::new(&mut conn)
        .update(id, patch.title.as_deref(), patch.content.as_deref())
        .await?;
    Ok(Json(found(row, "Article")?))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    if !ArticleMutator::new(&mut conn).delete(id).await? {
        return Err(AppError::not_found("Article"));
    }
    Ok(Json(json!({ "message": "Article deleted" })))
}
