use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("validation failed")]
    Validation(Value),
    #[error("{0}")]
    InvalidTransition(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Single-field validation failure, rendered as `{"errors": {field: message}}`.
    pub fn invalid(field: &str, message: &str) -> Self {
        AppError::Validation(json!({ field: message }))
    }

    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{} not found", what))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) | AppError::InvalidTransition(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Database(sqlx::Error::Database(db))
                if db.is_unique_violation() || db.is_foreign_key_violation() =>
            {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "ERR-REQ-001",
            AppError::Validation(_) => "ERR-REQ-002",
            AppError::InvalidTransition(_) => "ERR-STATE-001",
            AppError::Unauthorized(_) => "ERR-AUTH-001",
            AppError::NotFound(_) => "ERR-NOTFOUND-001",
            AppError::Database(sqlx::Error::RowNotFound) => "ERR-NOTFOUND-001",
            AppError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                "ERR-DB-409"
            }
            AppError::Database(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                "ERR-DB-422"
            }
            AppError::Database(_) | AppError::Migrate(_) => "ERR-DB-000",
            AppError::Io(_) => "ERR-IO-000",
            AppError::Config(_) => "ERR-CONF-000",
            AppError::Token(_) => "ERR-AUTH-000",
            AppError::Hash(_) => "ERR-AUTH-002",
            AppError::Internal(_) => "ERR-INTERNAL-000",
        }
    }

    fn public_message(&self) -> String {
        match self.status_code() {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".into(),
            StatusCode::NOT_FOUND if matches!(self, AppError::Database(_)) => {
                "Resource not found".into()
            }
            StatusCode::BAD_REQUEST if self.code() == "ERR-DB-409" => "Resource already exists".into(),
            StatusCode::BAD_REQUEST if matches!(self, AppError::Database(_)) => {
                "Referenced resource does not exist".into()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = self.code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.code(), status = %status, error = %self, "request rejected");
        }
        let mut body = json!({
            "success": false,
            "code": self.code(),
            "message": self.public_message(),
        });
        if let AppError::Validation(errors) = &self {
            body["errors"] = errors.clone();
        }
        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(serde_json::to_value(&errors).unwrap_or(Value::Null))
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::BadRequest(format!("invalid csv: {}", err))
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_errors_carry_field_map() {
        let (status, body) = body_json(AppError::invalid("status", "bad status")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"]["status"], "bad status");
    }

    #[tokio::test]
    async fn internal_failures_hide_details() {
        let (status, body) = body_json(AppError::Internal("pool exploded".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn missing_rows_map_to_not_found() {
        let (status, body) = body_json(AppError::Database(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ERR-NOTFOUND-001");
    }

    #[test]
    fn transition_errors_are_bad_requests() {
        let err = AppError::InvalidTransition("cannot approve".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "ERR-STATE-001");
    }
}
