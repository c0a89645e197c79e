use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::pkg::server::extract::{Json, Path, Query};
use crate::{
    pkg::{
        internal::{
            adaptors::{
                roles::{
                    mutators::{PermissionMutator, RoleMutator},
                    selectors::{PermissionSelector, RoleSelector},
                    spec::{PermissionEntry, RoleEntry},
                },
                users::{mutators::UserMutator, selectors::UserSelector},
            },
            policy::Role,
        },
        server::{
            handlers::{Page, found, listing},
            state::{AppState, GetTxn},
        },
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Deserialize, Validate)]
pub struct RoleInput {
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
    pub permissions: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PermissionInput {
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignInput {
    pub user_id: i64,
    pub role_id: i64,
}

pub async fn index(State(state): State<AppState>, Query(page): Query<Page>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let mut roles = RoleSelector::new(&mut conn);
    let data = roles.list(page.limit(), page.offset()).await?;
    let count = roles.count().await?;
    Ok(listing(data, count))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let mut roles = RoleSelector::new(&mut conn);
    let role = found(roles.get_by_id(id).await?, "Role")?;
    let permissions = roles.permissions_of(id).await?;
    Ok(Json(json!({ "data": role, "permissions": permissions })))
}

pub async fn store(
    State(state): State<AppState>,
    Json(input): Json<RoleInput>,
) -> Result<(StatusCode, Json<RoleEntry>)> {
    input.validate()?;
    let mut tx = state.db_pool.begin_txn().await?;
    let mut roles = RoleMutator::new(&mut tx);
    let role = roles.create(&input.title).await?;
    if let Some(permissions) = &input.permissions {
        roles.sync_permissions(role.id, permissions).await?;
    }
    tx.commit().await?;
    Ok((StatusCode::CREATED, Json(role)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<RoleInput>,
) -> Result<Json<RoleEntry>> {
    input.validate()?;
    let mut tx = state.db_pool.begin_txn().await?;
    let mut roles = RoleMutator::new(&mut tx);
    let role = found(roles.update(id, &input.title).await?, "Role")?;
    if let Some(permissions) = &input.permissions {
        roles.sync_permissions(role.id, permissions).await?;
    }
    tx.commit().await?;
    Ok(Json(role))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    if !RoleMutator::new(&mut conn).delete(id).await? {
        return Err(AppError::not_found("Role"));
    }
    Ok(Json(json!({ "message": "Role deleted" })))
}

/// Gives a user exactly one role, keeping the role string in step.
pub async fn assign(
    State(state): State<AppState>,
    Json(input): Json<AssignInput>,
) -> Result<Json<Value>> {
    let role = Role::from_id(input.role_id)
        .ok_or_else(|| AppError::invalid("role_id", "unknown role"))?;
    let mut tx = state.db_pool.begin_txn().await?;
    found(UserSelector::new(&mut tx).get_by_id(input.user_id).await?, "User")?;
    let mut users = UserMutator::new(&mut tx);
    users.set_role_name(input.user_id, role.name()).await?;
    users.replace_roles(input.user_id, &[role.id()]).await?;
    tx.commit().await?;
    tracing::info!(user_id = input.user_id, role = role.name(), "role assigned");
    Ok(Json(json!({ "message": "Role assigned", "role": role })))
}

pub async fn permissions_index(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let mut permissions = PermissionSelector::new(&mut conn);
    let data = permissions.list(page.limit(), page.offset()).await?;
    let count = permissions.count().await?;
    Ok(listing(data, count))
}

pub async fn permissions_store(
    State(state): State<AppState>,
    Json(input): Json<PermissionInput>,
) -> Result<(StatusCode, Json<PermissionEntry>)> {
    input.validate()?;
    let mut conn = state.db_pool.acquire().await?;
    let permission = PermissionMutator::new(&mut conn).create(&input.title).await?;
    Ok((StatusCode::CREATED, Json(permission)))
}

pub async fn permissions_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<PermissionInput>,
) -> Result<Json<PermissionEntry>> {
    input.validate()?;
    let mut conn = state.db_pool.acquire().await?;
    let row = PermissionMutator::new(&mut conn).update(id, &input.title).await?;
    Ok(Json(found(row, "Permission")?))
}

pub async fn permissions_destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    if !PermissionMutator::new(&mut conn).delete(id).await? {
        return Err(AppError::not_found("Permission"));
    }
    Ok(Json(json!({ "message": "Permission deleted" })))
}
