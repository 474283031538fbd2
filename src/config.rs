use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing::info;

pub const DEFAULT_CREDENTIAL_TTL_MS: i64 = 36_000_000; // 10 hours

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Error, Debug)]
#[error("Invalid value for {key}: {message}")]
pub struct ConfigError {
    pub key: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub api_base: String,
    pub site_base: String,
    pub client_id_source_url: String,
    pub app_version: String,
    pub app_locale: String,
    pub user_agent: String,
    pub credential_ttl_ms: i64,
    pub credential_store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            api_base: "https://api-v2.soundcloud.com".to_string(),
            site_base: "https://soundcloud.com".to_string(),
            client_id_source_url: "https://soundcloud.com/soundcloud/upload-your-first-track"
                .to_string(),
            app_version: "1751621700".to_string(),
            app_locale: "en".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            credential_ttl_ms: DEFAULT_CREDENTIAL_TTL_MS,
            credential_store_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            bind_addr: load_or("BIND_ADDR", defaults.bind_addr)?,
            api_base: load_or("SOUNDCLOUD_API_BASE", defaults.api_base)?,
            site_base: load_or("SOUNDCLOUD_SITE_BASE", defaults.site_base)?,
            client_id_source_url: load_or("CLIENT_ID_SOURCE_URL", defaults.client_id_source_url)?,
            app_version: load_or("SOUNDCLOUD_APP_VERSION", defaults.app_version)?,
            app_locale: load_or("SOUNDCLOUD_APP_LOCALE", defaults.app_locale)?,
            user_agent: load_or("UPSTREAM_USER_AGENT", defaults.user_agent)?,
            credential_ttl_ms: load_or("CLIENT_ID_TTL_MS", defaults.credential_ttl_ms)?,
            credential_store_path: env::var("CLIENT_ID_STORE_PATH").ok().map(PathBuf::from),
        })
    }
}

fn load_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError {
            key: key.to_string(),
            message: e.to_string(),
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
