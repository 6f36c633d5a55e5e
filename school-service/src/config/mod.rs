use chrono::{FixedOffset, Offset, Utc};
use school_core::config::{self as core_config, get_env, get_env_opt, is_production};
use school_core::error::AppError;
use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SchoolConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub store: StoreBackend,
    pub mongodb: MongoConfig,
    pub auth: AuthConfig,
    pub seed: SeedConfig,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    /// Minutes east of UTC used to decide "today".
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: Secret<String>,
    pub token_expiry_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    pub admin_email: String,
    pub admin_password: Secret<String>,
}

/// India Standard Time.
const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

impl SchoolConfig {
    pub fn load() -> Result<Self, AppError> {
        // Common config handles .env and the APP__ prefix
        let common = core_config::Config::load()?;
        let is_prod = is_production();

        let store: StoreBackend = get_env("STORE_BACKEND", Some("mongo"), false)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        Ok(SchoolConfig {
            common,
            store,
            mongodb: MongoConfig {
                uri: Secret::new(get_env(
                    "MONGODB_URI",
                    Some("mongodb://localhost:27017"),
                    is_prod && store == StoreBackend::Mongo,
                )?),
                database: get_env("MONGODB_DATABASE", Some("playschool"), false)?,
            },
            auth: AuthConfig {
                jwt_secret: Secret::new(get_env(
                    "JWT_SECRET",
                    Some("playschool-dev-secret-change-me"),
                    is_prod,
                )?),
                token_expiry_hours: parse_setting(
                    "JWT_EXPIRY_HOURS",
                    &get_env("JWT_EXPIRY_HOURS", Some("24"), false)?,
                )?,
            },
            seed: SeedConfig {
                admin_email: get_env("SEED_ADMIN_EMAIL", Some("admin@test.com"), false)?,
                admin_password: Secret::new(get_env(
                    "SEED_ADMIN_PASSWORD",
                    Some("password123"),
                    is_prod,
                )?),
            },
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
            otlp_endpoint: get_env_opt("OTLP_ENDPOINT"),
            utc_offset_minutes: match get_env_opt("UTC_OFFSET_MINUTES") {
                Some(raw) => parse_setting("UTC_OFFSET_MINUTES", &raw)?,
                None => DEFAULT_UTC_OFFSET_MINUTES,
            },
        })
    }

    /// Settings for an in-process instance: memory store, ephemeral port.
    pub fn for_tests() -> Self {
        SchoolConfig {
            common: core_config::Config { port: 0 },
            store: StoreBackend::Memory,
            mongodb: MongoConfig {
                uri: Secret::new("mongodb://localhost:27017".to_string()),
                database: "playschool_test".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: Secret::new("test-secret".to_string()),
                token_expiry_hours: 24,
            },
            seed: SeedConfig {
                admin_email: "admin@test.com".to_string(),
                admin_password: Secret::new("password123".to_string()),
            },
            log_level: "info".to_string(),
            otlp_endpoint: None,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }

    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

fn parse_setting<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AppError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("{} is invalid: {}", key, e)))
}
