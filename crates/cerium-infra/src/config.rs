//! Configuration loader for Cerium.
//!
//! Reads `config.toml` from the data directory (`~/.cerium/` by default),
//! falling back to defaults when the file is missing or malformed, then
//! applies environment overrides. `.env` files are loaded by the binary with
//! dotenvy before this runs.

use std::path::{Path, PathBuf};

use cerium_types::config::CeriumConfig;

/// Environment variables that override file values.
pub const ENV_DATA_DIR: &str = "CERIUM_DATA_DIR";
pub const ENV_PORT: &str = "PORT";
pub const ENV_JWT_KEY: &str = "JWT_KEY";
pub const ENV_OAUTH_URL: &str = "OAUTH_URL";
pub const ENV_AUTH_TOKEN: &str = "AUTH_TOKEN";
pub const ENV_OAUTH_PROFILE: &str = "OAUTH_PROFILE";
pub const ENV_SESSION_HOURS: &str = "CERIUM_SESSION_HOURS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "CERIUM_REQUEST_TIMEOUT_SECS";

/// Load configuration from `{data_dir}/config.toml` and the process
/// environment.
pub async fn load_config(data_dir: &Path) -> CeriumConfig {
    let config = load_file_config(data_dir).await;
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Load `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`CeriumConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_file_config(data_dir: &Path) -> CeriumConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return CeriumConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return CeriumConfig::default();
        }
    };

    match toml::from_str::<CeriumConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            CeriumConfig::default()
        }
    }
}

/// Override `config` with values from `lookup`. Unparseable numbers are
/// ignored with a warning.
pub fn apply_env_overrides(
    mut config: CeriumConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> CeriumConfig {
    if let Some(port) = parse_env(&lookup, ENV_PORT) {
        config.port = port;
    }
    if let Some(key) = lookup(ENV_JWT_KEY) {
        config.jwt_key = key;
    }
    if let Some(url) = lookup(ENV_OAUTH_URL) {
        config.oauth.token_url = url;
    }
    if let Some(token) = lookup(ENV_AUTH_TOKEN) {
        config.oauth.basic_auth = token;
    }
    if let Some(url) = lookup(ENV_OAUTH_PROFILE) {
        config.oauth.profile_url = url;
    }
    if let Some(hours) = parse_env(&lookup, ENV_SESSION_HOURS) {
        config.session_hours = hours;
    }
    if let Some(secs) = parse_env(&lookup, ENV_REQUEST_TIMEOUT_SECS) {
        config.request_timeout_secs = secs;
    }
    config
}

fn parse_env<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {key}={raw}: not a valid number");
            None
        }
    }
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `CERIUM_DATA_DIR` environment variable
/// 2. `~/.cerium`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".cerium");
    }

    // Last resort: current directory
    PathBuf::from(".cerium")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_file_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_file_config(tmp.path()).await;
        assert_eq!(config.port, 8000);
        assert_eq!(config.session_hours, 24);
    }

    #[tokio::test]
    async fn load_file_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            "port = 9100\n\n[oauth]\ntoken_url = \"https://idp.example/token\"\n",
        )
        .await
        .unwrap();

        let config = load_file_config(tmp.path()).await;
        assert_eq!(config.port, 9100);
        assert_eq!(config.oauth.token_url, "https://idp.example/token");
    }

    #[tokio::test]
    async fn load_file_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_file_config(tmp.path()).await;
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_PORT, "8080"),
            (ENV_JWT_KEY, "secret"),
            (ENV_OAUTH_URL, "https://idp.example/token"),
            (ENV_AUTH_TOKEN, "basic"),
            (ENV_OAUTH_PROFILE, "https://idp.example/me"),
            (ENV_SESSION_HOURS, "2"),
        ]);
        let config = apply_env_overrides(CeriumConfig::default(), |k| {
            env.get(k).map(|v| v.to_string())
        });

        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_key, "secret");
        assert_eq!(config.oauth.token_url, "https://idp.example/token");
        assert_eq!(config.oauth.basic_auth, "basic");
        assert_eq!(config.oauth.profile_url, "https://idp.example/me");
        assert_eq!(config.session_hours, 2);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn env_invalid_number_is_ignored() {
        let config = apply_env_overrides(CeriumConfig::default(), |k| {
            (k == ENV_PORT).then(|| "eighty".to_string())
        });
        assert_eq!(config.port, 8000);
    }
}
