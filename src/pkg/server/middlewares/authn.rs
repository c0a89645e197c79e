use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::{
    pkg::{
        internal::auth::{CurrentUser, bearer_token},
        server::state::AppState,
    },
    prelude::Result,
};

/// Caller identity on routes that also serve anonymous visitors.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<Arc<CurrentUser>>);

impl Viewer {
    pub fn user(&self) -> Option<&CurrentUser> {
        self.0.as_deref()
    }
}

async fn resolve(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser> {
    let claims = state.tokens.verify(bearer_token(headers)?)?;
    let mut conn = state.db_pool.acquire().await?;
    CurrentUser::load(&mut conn, claims).await
}

pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    match resolve(&state, &headers).await {
        Ok(user) => {
            request.extensions_mut().insert(Arc::new(user));
            Ok(next.run(request).await)
        }
        Err(err) => {
            tracing::warn!(error = %err, path = %request.uri().path(), "authentication denied");
            Err(err)
        }
    }
}

pub async fn authenticate_optional(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    let viewer = if headers.contains_key(axum::http::header::AUTHORIZATION) {
        match resolve(&state, &headers).await {
            Ok(user) => Viewer(Some(Arc::new(user))),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring unusable credentials");
                Viewer::default()
            }
        }
    } else {
        Viewer::default()
    };
    request.extensions_mut().insert(viewer);
    next.run(request).await
}
