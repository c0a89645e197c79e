use std::sync::Arc;

use axum::{Extension, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::pkg::server::extract::Json;
use crate::{
    pkg::{
        internal::{
            adaptors::{
                apply_jobs::selectors::ApplyJobSelector,
                companies::{mutators::CompanyMutator, spec::CompanyProfile},
                jobs::selectors::JobSelector,
                reports::selectors::ReportSelector,
                users::{
                    mutators::{NewUser, UserMutator},
                    selectors::UserSelector,
                },
            },
            auth::{CurrentUser, hash_password, verify_password},
            policy::Role,
        },
        server::state::{AppState, GetTxn},
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    pub role: Option<String>,
    pub team: Option<i64>,
    pub nim: Option<String>,
    pub program_study: Option<String>,
    pub faculty: Option<String>,
    pub semester: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub position: Option<String>,
    pub id_program_studi: Option<i64>,
    #[serde(flatten)]
    pub company: CompanyProfile,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<Value>)> {
    input.validate()?;
    let mut tx = state.db_pool.begin_txn().await?;
    if UserSelector::new(&mut tx)
        .find_conflict(&input.email, &input.username)
        .await?
        .is_some()
    {
        return Err(AppError::invalid("email", "Email or username already exists"));
    }

    let role = Role::for_registration(input.role.as_deref());
    let password = hash_password(input.password.clone(), state.bcrypt_cost).await?;
    let mut user = UserMutator::new(&mut tx)
        .create(&NewUser {
            name: input.name.clone(),
            email: input.email.clone(),
            username: input.username.clone(),
            password,
            role: role.name().to_string(),
            nim: input.nim.clone(),
            program_study: input.program_study.clone(),
            faculty: input.faculty.clone(),
            semester: input.semester.clone(),
            phone_number: input.phone_number.clone(),
            address: input.address.clone(),
            position: input.position.clone(),
            team_id: input.team,
            id_program_studi: input.id_program_studi,
            ..NewUser::default()
        })
        .await?;
    UserMutator::new(&mut tx).attach_role(user.id, role.id()).await?;

    if Role::owns_company(input.role.as_deref()) {
        let mut profile = input.company.clone();
        if profile.company_name.is_none() {
            profile.company_name = Some(input.name.clone());
        }
        CompanyMutator::new(&mut tx)
            .create(&profile, Some(user.id), user.id)
            .await?;
    }
    if input.team.is_none() {
        let team_id = UserMutator::new(&mut tx)
            .create_team(user.id, &input.email)
            .await?;
        user.team_id = Some(team_id);
    }
    tx.commit().await?;

    let token = state.tokens.issue(&user)?;
    tracing::info!(user_id = user.id, role = role.name(), "user registered");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "token": token, "role": user.role, "user": user })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<Value>> {
    input.validate()?;
    let mut conn = state.db_pool.acquire().await?;
    let user = UserSelector::new(&mut conn)
        .get_by_username(&input.username)
        .await?
        .ok_or_else(|| AppError::invalid("username", "User not found"))?;
    if !verify_password(input.password, user.password.clone()).await? {
        tracing::warn!(username = %input.username, "login with wrong password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }
    let token = state.tokens.issue(&user)?;
    tracing::info!(user_id = user.id, "user logged in");
    Ok(Json(json!({ "token": token, "role": user.role, "user": user })))
}

pub async fn logout(Extension(user): Extension<Arc<CurrentUser>>) -> Json<Value> {
    tracing::info!(user_id = user.id(), "user logged out");
    Json(json!({ "message": "Logged out" }))
}

/// The caller with their most recent application, its report and posting.
pub async fn profile(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<CurrentUser>>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let latest = ApplyJobSelector::new(&mut conn)
        .latest_by_creator(user.id())
        .await?;
    let (report, job) = match &latest {
        Some(application) => {
            let report = ReportSelector::new(&mut conn)
                .get_by_apply_job(application.apply_job.id)
                .await?;
            let job = match application.job_id {
                Some(job_id) => JobSelector::new(&mut conn).get_by_id(job_id).await?,
                None => None,
            };
            (report, job)
        }
        None => (None, None),
    };
    Ok(Json(json!({ "user": user.user, "report": report, "job": job })))
}
