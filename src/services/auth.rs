use tracing::warn;

use crate::config::Config;

pub enum LoginOutcome {
    Success { username: String },
    InvalidCredentials,
}

pub struct AuthService;

impl AuthService {
    /// Checks the single administrator account. No token is issued; the
    /// client keeps its own session record.
    pub fn login(config: &Config, username: &str, password: &str) -> LoginOutcome {
        if username.trim() != config.admin_username {
            return LoginOutcome::InvalidCredentials;
        }
        match bcrypt::verify(password, &config.admin_password_hash) {
            Ok(true) => LoginOutcome::Success {
                username: config.admin_username.clone(),
            },
            Ok(false) => LoginOutcome::InvalidCredentials,
            Err(e) => {
                warn!("Admin password hash could not be checked: {}", e);
                LoginOutcome::InvalidCredentials
            }
        }
    }
}
