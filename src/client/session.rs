use std::{
    fs, io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use super::{
    error::{Action, ClientError, RequestFailed},
    http::ApiClient,
};
use crate::models::{auth::LoginResponse, validation::ValidationError};

/// Key under which the session record lives in the storage file.
pub const STORAGE_KEY: &str = "orphanage_admin_auth";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated(String),
}

impl AuthState {
    pub fn username(&self) -> Option<&str> {
        match self {
            AuthState::Anonymous => None,
            AuthState::Authenticated(name) => Some(name),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredAuth {
    username: String,
    is_authenticated: bool,
}

/// JSON file holding the persisted auth record alongside any other keys.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> io::Result<Option<Map<String, Value>>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Some(Map::new())),
            Err(e) => return Err(e),
        };
        if raw.trim().is_empty() {
            return Ok(Some(Map::new()));
        }
        Ok(serde_json::from_str::<Map<String, Value>>(&raw).ok())
    }

    fn write_map(&self, map: &Map<String, Value>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string_pretty(map).map_err(io::Error::other)?;
        fs::write(&self.path, body)
    }

    /// Unreadable or malformed data counts as logged out and is removed.
    pub fn load(&self) -> io::Result<AuthState> {
        let Some(mut map) = self.read_map()? else {
            warn!("Session file {} is corrupt; clearing it", self.path.display());
            self.write_map(&Map::new())?;
            return Ok(AuthState::Anonymous);
        };

        let Some(entry) = map.get(STORAGE_KEY).cloned() else {
            return Ok(AuthState::Anonymous);
        };

        match serde_json::from_value::<StoredAuth>(entry) {
            Ok(stored) if stored.is_authenticated && !stored.username.trim().is_empty() => {
                Ok(AuthState::Authenticated(stored.username))
            }
            Ok(_) => Ok(AuthState::Anonymous),
            Err(e) => {
                warn!("Discarding malformed session record: {}", e);
                map.remove(STORAGE_KEY);
                self.write_map(&map)?;
                Ok(AuthState::Anonymous)
            }
        }
    }

    pub fn save(&self, username: &str) -> io::Result<()> {
        let mut map = self.read_map()?.unwrap_or_default();
        let record = StoredAuth {
            username: username.to_string(),
            is_authenticated: true,
        };
        map.insert(
            STORAGE_KEY.to_string(),
            serde_json::to_value(record).map_err(io::Error::other)?,
        );
        self.write_map(&map)
    }

    pub fn clear(&self) -> io::Result<()> {
        let mut map = self.read_map()?.unwrap_or_default();
        if map.remove(STORAGE_KEY).is_some() || !self.path.exists() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// Credential check against the backend.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> Result<LoginResponse, RequestFailed>;
}

#[async_trait]
impl Authenticator for ApiClient {
    async fn authenticate(&self, username: &str, password: &str) -> Result<LoginResponse, RequestFailed> {
        self.login(username, password).await
    }
}

/// The explicit auth context every command is checked against.
#[derive(Debug)]
pub struct Session {
    store: SessionStore,
    state: AuthState,
}

impl Session {
    pub fn open(store: SessionStore) -> Result<Self, ClientError> {
        let state = store.load()?;
        Ok(Self { store, state })
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Gate for everything except login.
    pub fn require(&self) -> Result<&str, ClientError> {
        self.state.username().ok_or(ClientError::NotAuthenticated)
    }

    pub async fn login<A: Authenticator + ?Sized>(
        &mut self,
        auth: &A,
        username: &str,
        password: &str,
    ) -> Result<&AuthState, ClientError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::missing("username").into());
        }
        if password.is_empty() {
            return Err(ValidationError::missing("password").into());
        }

        let resp = auth.authenticate(username, password).await?;
        if !resp.success {
            let reason = resp.message.unwrap_or_else(|| "Invalid credentials".to_string());
            return Err(RequestFailed::new("user", Action::Login, reason).into());
        }

        let name = resp.username.unwrap_or_else(|| username.to_string());
        self.store.save(&name)?;
        info!("Logged in as {}", name);
        self.state = AuthState::Authenticated(name);
        Ok(&self.state)
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.store.clear()?;
        self.state = AuthState::Anonymous;
        info!("Logged out");
        Ok(())
    }
}
