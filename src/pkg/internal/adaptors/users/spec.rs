use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const USER_COLUMNS: &str = "id, name, email, username, password, nim, program_study, faculty, \
    semester, phone_number, address, profile_description, position, birthdate, role, status, \
    team_id, id_program_studi, created_at, updated_at";

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct UserEntry {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub nim: Option<String>,
    pub program_study: Option<String>,
    pub faculty: Option<String>,
    pub semester: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub profile_description: Option<String>,
    pub position: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub role: String,
    pub status: Option<String>,
    pub team_id: Option<i64>,
    pub id_program_studi: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact user shape embedded in other listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserBrief {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub nim: Option<String>,
    pub program_study: Option<String>,
    pub faculty: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LecturerEntry {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub status: Option<String>,
    pub lecturer_can_approve: bool,
}
