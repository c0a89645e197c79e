use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const COMPANY_COLUMNS: &str = "id, company_name, business_fields, company_size, company_website, \
    company_profile_description, company_phone_number, company_address, user_id, created_by_id, \
    created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyEntry {
    pub id: i64,
    pub company_name: String,
    pub business_fields: Option<String>,
    pub company_size: Option<String>,
    pub company_website: Option<String>,
    pub company_profile_description: Option<String>,
    pub company_phone_number: Option<String>,
    pub company_address: Option<String>,
    pub user_id: Option<i64>,
    pub created_by_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile fields shared by create and update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyProfile {
    pub company_name: Option<String>,
    pub business_fields: Option<String>,
    pub company_size: Option<String>,
    pub company_website: Option<String>,
    pub company_profile_description: Option<String>,
    pub company_phone_number: Option<String>,
    pub company_address: Option<String>,
}
