use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use sqlx::{PgPool, Pool, Postgres, Transaction, postgres::PgPoolOptions};

use crate::{
    conf::settings,
    pkg::internal::auth::TokenIssuer,
    prelude::Result,
};

pub fn db_pool() -> Result<Pool<Postgres>> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_pool_max_connections)
        .connect_lazy(&settings.database_url)?;
    Ok(pool)
}

pub trait GetTxn {
    fn begin_txn(&self) -> impl Future<Output = Result<Transaction<'static, Postgres>>> + Send;
}

impl GetTxn for PgPool {
    async fn begin_txn(&self) -> Result<Transaction<'static, Postgres>> {
        let tx = self.begin().await?;
        Ok(tx)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub service_name: Arc<String>,
    pub db_pool: Arc<PgPool>,
    pub tokens: Arc<TokenIssuer>,
    pub upload_dir: Arc<PathBuf>,
    pub email_domain: Arc<String>,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub async fn new() -> Result<AppState> {
        let upload_dir = PathBuf::from(&settings.upload_dir);
        tokio::fs::create_dir_all(&upload_dir).await?;
        Ok(AppState::from_parts(
            &settings.service_name,
            db_pool()?,
            TokenIssuer::new(&settings.jwt_secret, settings.jwt_expiry_hours),
            upload_dir,
            &settings.student_email_domain,
            settings.bcrypt_cost,
        ))
    }

    pub fn from_parts(
        service_name: &str,
        pool: PgPool,
        tokens: TokenIssuer,
        upload_dir: PathBuf,
        email_domain: &str,
        bcrypt_cost: u32,
    ) -> AppState {
        AppState {
            service_name: Arc::new(service_name.to_string()),
            db_pool: Arc::new(pool),
            tokens: Arc::new(tokens),
            upload_dir: Arc::new(upload_dir),
            email_domain: Arc::new(email_domain.to_string()),
            bcrypt_cost,
        }
    }
}
