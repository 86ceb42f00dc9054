use std::{env, path::PathBuf};

use tokio::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub app_base_url: String,
    pub admin_username: String,
    pub admin_password_hash: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://orphanage.db?mode=rwc".into()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".into())
                .parse()?,
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost".into()),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password_hash: admin_password_hash()?,
        })
    }
}

/// `ADMIN_PASSWORD_HASH` when set, otherwise a fresh hash of
/// `ADMIN_PASSWORD` (default `admin123`).
fn admin_password_hash() -> anyhow::Result<String> {
    if let Some(hash) = env::var("ADMIN_PASSWORD_HASH").ok().filter(|s| !s.is_empty()) {
        return Ok(hash);
    }
    let password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".into());
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

/// Settings for the `admin` command-line client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub toast_ttl: Duration,
    pub search_debounce: Duration,
    pub session_file: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            api_url: env::var("API_URL").unwrap_or_else(|_| "http://localhost:5000/api".into()),
            toast_ttl: Duration::from_millis(
                env::var("TOAST_DURATION_MS")
                    .unwrap_or_else(|_| "3000".into())
                    .parse()?,
            ),
            search_debounce: Duration::from_millis(
                env::var("SEARCH_DEBOUNCE_MS")
                    .unwrap_or_else(|_| "500".into())
                    .parse()?,
            ),
            session_file: match env::var("SESSION_FILE").ok().filter(|s| !s.is_empty()) {
                Some(path) => PathBuf::from(path),
                None => default_session_file()?,
            },
        })
    }
}

fn default_session_file() -> anyhow::Result<PathBuf> {
    let home = env::var("HOME").map_err(|_| anyhow::anyhow!("Missing required env var: HOME"))?;
    Ok(PathBuf::from(home).join(".orphanage-admin").join("session.json"))
}
