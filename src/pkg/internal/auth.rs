use std::fmt;

use axum::http::{HeaderMap, header::AUTHORIZATION};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

use crate::{
    pkg::internal::{
        adaptors::users::{selectors::UserSelector, spec::UserEntry},
        policy::{self, Capability, Slot},
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub user_id: i64,
    pub username: String,
    pub role: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

/// Signs and checks HS256 bearer tokens with the shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    expiry_hours: i64,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("expiry_hours", &self.expiry_hours)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        TokenIssuer {
            secret: secret.to_string(),
            expiry_hours,
        }
    }

    pub fn issue(&self, user: &UserEntry) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
            iat: now,
            nbf: now,
            exp: now + self.expiry_hours * 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|err| AppError::Unauthorized(format!("invalid token: {}", err)))?;
        Ok(data.claims)
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing Authorization header".into()))?;
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("expected Bearer token".into()))
}

/// The authenticated caller, resolved once per request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: UserEntry,
    pub role_ids: Vec<i64>,
    pub claims: Claims,
}

impl CurrentUser {
    /// Loads the token's user and role ids. The token must already be verified.
    pub async fn load(conn: &mut PgConnection, claims: Claims) -> Result<Self> {
        let mut users = UserSelector::new(conn);
        let user = users
            .get_by_id(claims.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("user no longer exists".into()))?;
        let role_ids = users.role_ids(user.id).await?;
        Ok(CurrentUser {
            user,
            role_ids,
            claims,
        })
    }

    pub fn id(&self) -> i64 {
        self.user.id
    }

    pub fn can(&self, capability: Capability) -> bool {
        policy::any_can(&self.role_ids, capability)
    }

    pub fn slots(&self, as_examiner: bool) -> Vec<Slot> {
        policy::signing_slots(&self.role_ids, as_examiner)
    }
}

pub async fn hash_password(password: String, cost: u32) -> Result<String> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

pub async fn verify_password(password: String, hashed: String) -> Result<bool> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed)).await??;
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn user() -> UserEntry {
        UserEntry {
            id: 7,
            name: "Siti".into(),
            email: "siti@example.com".into(),
            username: "siti".into(),
            role: "student".into(),
            ..UserEntry::default()
        }
    }

    #[test]
    fn issued_tokens_verify_with_the_same_secret() {
        let issuer = TokenIssuer::new("s3cret", 24);
        let token = issuer.issue(&user()).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.username, "siti");
        assert_eq!(claims.role, "student");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn other_secrets_are_rejected() {
        let token = TokenIssuer::new("s3cret", 24).issue(&user()).unwrap();
        let err = TokenIssuer::new("other", 24).verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let token = TokenIssuer::new("s3cret", -2).issue(&user()).unwrap();
        assert!(TokenIssuer::new("s3cret", 24).verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(TokenIssuer::new("s3cret", 24).verify("not.a.token").is_err());
    }

    #[test]
    fn bearer_header_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def");
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let rendered = format!("{:?}", TokenIssuer::new("s3cret", 24));
        assert!(!rendered.contains("s3cret"));
    }

    #[tokio::test]
    async fn passwords_hash_and_verify() {
        let hashed = hash_password("20010203".into(), 4).await.unwrap();
        assert_ne!(hashed, "20010203");
        assert!(verify_password("20010203".into(), hashed.clone()).await.unwrap());
        assert!(!verify_password("wrong".into(), hashed).await.unwrap());
    }
}
