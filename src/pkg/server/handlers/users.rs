use axum::{extract::State, http::StatusCode};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::pkg::server::extract::{Json, Path, Query};
use crate::{
    pkg::{
        internal::{
            adaptors::users::{
                mutators::{NewUser, UserMutator, UserPatch},
                selectors::UserSelector,
                spec::UserEntry,
            },
            auth::hash_password,
            policy::{self, Role},
        },
        server::{
            handlers::{Page, found, listing},
            state::{AppState, GetTxn},
        },
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Deserialize, Validate)]
pub struct UserInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub roles: Vec<i64>,
    pub nim: Option<String>,
    pub program_study: Option<String>,
    pub faculty: Option<String>,
    pub phone_number: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub status: Option<String>,
    pub id_program_studi: Option<i64>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserUpdate {
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: Option<String>,
    pub status: Option<String>,
    pub id_program_studi: Option<i64>,
    pub roles: Option<Vec<i64>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LecturerFilter {
    pub status: Option<String>,
    pub apply_job_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StudentFilter {
    pub status: Option<String>,
}

/// Role string stored on the user: the first recognised role, student otherwise.
pub fn primary_role(role_ids: &[i64]) -> Role {
    policy::roles_of(role_ids)
        .into_iter()
        .next()
        .unwrap_or(Role::Student)
}

/// Academic status filters use short labels; the registrar stores longer ones.
pub fn student_status_label(filter: &str) -> &str {
    match filter {
        "Lulus" => "Tidak Aktif",
        "Drop Out" => "Drop Out / Dikeluarkan",
        "Mengundurkan Diri" => "Mengundurkan Diri / Keluar",
        other => other,
    }
}

pub async fn index(State(state): State<AppState>, Query(page): Query<Page>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let mut users = UserSelector::new(&mut conn);
    let data = users.list(page.limit(), page.offset()).await?;
    let count = users.count().await?;
    Ok(listing(data, count))
}

pub async fn show(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let mut users = UserSelector::new(&mut conn);
    let user = found(users.get_by_id(id).await?, "User")?;
    let roles = users.roles(id).await?;
    Ok(Json(json!({ "data": user, "roles": roles })))
}

pub async fn store(
    State(state): State<AppState>,
    Json(input): Json<UserInput>,
) -> Result<(StatusCode, Json<UserEntry>)> {
    input.validate()?;
    let mut tx = state.db_pool.begin_txn().await?;
    if UserSelector::new(&mut tx)
        .find_conflict(&input.email, &input.username)
        .await?
        .is_some()
    {
        return Err(AppError::invalid("email", "Email or username already exists"));
    }
    let role_ids = if input.roles.is_empty() {
        vec![Role::Student.id()]
    } else {
        input.roles.clone()
    };
    let password = hash_password(input.password.clone(), state.bcrypt_cost).await?;
    let mut users = UserMutator::new(&mut tx);
    let user = users
        .create(&NewUser {
            name: input.name,
            email: input.email,
            username: input.username,
            password,
            role: primary_role(&role_ids).name().to_string(),
            nim: input.nim,
            program_study: input.program_study,
            faculty: input.faculty,
            phone_number: input.phone_number,
            birthdate: input.birthdate,
            status: input.status,
            id_program_studi: input.id_program_studi,
            ..NewUser::default()
        })
        .await?;
    users.replace_roles(user.id, &role_ids).await?;
    tx.commit().await?;
    tracing::info!(user_id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UserUpdate>,
) -> Result<Json<UserEntry>> {
    input.validate()?;
    let password = match input.password {
        Some(password) => Some(hash_password(password, state.bcrypt_cost).await?),
        None => None,
    };
    let mut tx = state.db_pool.begin_txn().await?;
    let mut users = UserMutator::new(&mut tx);
    let mut user = found(
        users
            .update(
                id,
                UserPatch {
                    name: input.name,
                    email: input.email,
                    password,
                    status: input.status,
                    id_program_studi: input.id_program_studi,
                },
            )
            .await?,
        "User",
    )?;
    if let Some(role_ids) = input.roles {
        let role = primary_role(&role_ids);
        users.replace_roles(id, &role_ids).await?;
        users.set_role_name(id, role.name()).await?;
        user.role = role.name().to_string();
    }
    tx.commit().await?;
    Ok(Json(user))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    if !UserMutator::new(&mut conn).delete(id).await? {
        return Err(AppError::not_found("User"));
    }
    tracing::info!(user_id = id, "user deleted");
    Ok(Json(json!({ "message": "User deleted" })))
}

pub async fn lecturers(
    State(state): State<AppState>,
    Query(page): Query<Page>,
    Query(filter): Query<LecturerFilter>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let mut users = UserSelector::new(&mut conn);
    let status = filter.status.as_deref();
    let data = users
        .lecturers(status, filter.apply_job_id, page.limit(), page.offset())
        .await?;
    let count = users.count_by_role(Role::Dosen.name(), status).await?;
    Ok(listing(data, count))
}

pub async fn students(
    State(state): State<AppState>,
    Query(page): Query<Page>,
    Query(filter): Query<StudentFilter>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let mut users = UserSelector::new(&mut conn);
    let status = filter.status.as_deref().map(student_status_label);
    let role = Role::Student.name();
    let data = users
        .list_by_role(role, status, page.limit(), page.offset())
        .await?;
    let count = users.count_by_role(role, status).await?;
    Ok(listing(data, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_map_to_stored_values() {
        assert_eq!(student_status_label("Lulus"), "Tidak Aktif");
        assert_eq!(student_status_label("Drop Out"), "Drop Out / Dikeluarkan");
        assert_eq!(
            student_status_label("Mengundurkan Diri"),
            "Mengundurkan Diri / Keluar"
        );
        assert_eq!(student_status_label("Aktif"), "Aktif");
        assert_eq!(student_status_label("Transfer"), "Transfer");
    }

    #[test]
    fn primary_role_skips_unknown_ids() {
        assert_eq!(primary_role(&[]), Role::Student);
        assert_eq!(primary_role(&[99, 5]), Role::Dosen);
        assert_eq!(primary_role(&[4, 2]), Role::Company);
    }
}
