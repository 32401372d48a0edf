//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/codec/provider traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::SecretString;

use cerium_core::auth::resolver::IdentityResolver;
use cerium_core::service::form::FormService;
use cerium_core::service::login::LoginService;
use cerium_core::service::response::ResponseService;
use cerium_infra::config::{load_config, resolve_data_dir};
use cerium_infra::oauth::client::OAuthClient;
use cerium_infra::session::jwt::JwtSessionCodec;
use cerium_infra::sqlite::filler::SqliteFillerRepository;
use cerium_infra::sqlite::form::SqliteFormRepository;
use cerium_infra::sqlite::pool::{DatabasePool, database_url};
use cerium_infra::sqlite::response::SqliteResponseRepository;
use cerium_infra::sqlite::user::SqliteUserRepository;
use cerium_infra::token::RandomTokenGenerator;
use cerium_types::config::CeriumConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteFormService = FormService<
    SqliteFormRepository,
    SqliteResponseRepository,
    SqliteFillerRepository,
    RandomTokenGenerator,
>;

pub type ConcreteResponseService =
    ResponseService<SqliteFormRepository, SqliteResponseRepository, SqliteFillerRepository>;

pub type ConcreteLoginService =
    LoginService<SqliteUserRepository, OAuthClient, JwtSessionCodec>;

pub type ConcreteResolver = IdentityResolver<JwtSessionCodec>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub form_service: Arc<ConcreteFormService>,
    pub response_service: Arc<ConcreteResponseService>,
    pub login_service: Arc<ConcreteLoginService>,
    pub resolver: Arc<ConcreteResolver>,
    pub config: Arc<CeriumConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state from the environment: resolve the
    /// data directory, load configuration, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;

        let config = load_config(&data_dir).await;
        Self::with_config(data_dir, config).await
    }

    /// Wire services for an explicit data directory and configuration.
    pub async fn with_config(data_dir: PathBuf, config: CeriumConfig) -> anyhow::Result<Self> {
        if config.jwt_key.trim().is_empty() {
            anyhow::bail!("JWT_KEY is not set: configure jwt_key in config.toml or the environment");
        }

        let db_url = database_url(&data_dir);
        let db_pool = DatabasePool::new(&db_url)
            .await
            .with_context(|| format!("opening database {db_url}"))?;

        let codec = JwtSessionCodec::new(&SecretString::from(config.jwt_key.clone()));
        let provider = OAuthClient::new(
            &config.oauth,
            Duration::from_secs(config.request_timeout_secs),
        );

        let form_service = FormService::new(
            SqliteFormRepository::new(db_pool.clone()),
            SqliteResponseRepository::new(db_pool.clone()),
            SqliteFillerRepository::new(db_pool.clone()),
            RandomTokenGenerator,
        );

        let response_service = ResponseService::new(
            SqliteFormRepository::new(db_pool.clone()),
            SqliteResponseRepository::new(db_pool.clone()),
            SqliteFillerRepository::new(db_pool.clone()),
        );

        let login_service = LoginService::new(
            SqliteUserRepository::new(db_pool.clone()),
            provider,
            codec.clone(),
            chrono::Duration::hours(config.session_hours),
        );

        Ok(Self {
            form_service: Arc::new(form_service),
            response_service: Arc::new(response_service),
            login_service: Arc::new(login_service),
            resolver: Arc::new(IdentityResolver::new(codec)),
            config: Arc::new(config),
            data_dir,
            db_pool,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_jwt_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppState::with_config(dir.path().to_path_buf(), CeriumConfig::default()).await;
        assert!(result.is_err());
    }
}
