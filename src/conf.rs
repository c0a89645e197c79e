use config::{Config, ConfigError, Environment};
use lazy_static::lazy_static;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub service_name: String,
    pub listen_port: String,
    pub database_url: String,
    pub database_pool_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub upload_dir: String,
    pub student_email_domain: String,
    pub bcrypt_cost: u32,
    pub cors_allow_origin: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let conf = Config::builder()
            .set_default("service_name", "mbkm")?
            .set_default("listen_port", "3000")?
            .set_default("database_pool_max_connections", 10_i64)?
            .set_default("jwt_expiry_hours", 24_i64)?
            .set_default("upload_dir", "./uploads")?
            .set_default("student_email_domain", "mbkm.ulbi.ac.id")?
            .set_default("bcrypt_cost", i64::from(bcrypt::DEFAULT_COST))?
            .set_default("cors_allow_origin", "*")?
            .add_source(Environment::default())
            .build()?;
        let s: Settings = conf.try_deserialize()?;
        if s.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message("JWT_SECRET must not be empty".into()));
        }
        if !(4..=31).contains(&s.bcrypt_cost) {
            return Err(ConfigError::Message(format!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                s.bcrypt_cost
            )));
        }
        Ok(s)
    }
}

lazy_static! {
    pub static ref settings: Settings = Settings::new().expect("improperly configured");
}
