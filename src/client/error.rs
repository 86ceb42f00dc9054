use thiserror::Error;

use crate::models::validation::ValidationError;

/// What a gateway call was doing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Fetch,
    Create,
    Update,
    Delete,
    Login,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Action::List => "load",
            Action::Fetch => "load",
            Action::Create => "add",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Login => "log in as",
        };
        write!(f, "{s}")
    }
}

/// A non-2xx response or a transport failure. Status codes are not
/// interpreted beyond success/failure; a 404 on fetch lands here too.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to {action} {entity}: {reason}")]
pub struct RequestFailed {
    pub entity: &'static str,
    pub action: Action,
    pub reason: String,
}

impl RequestFailed {
    pub fn new(entity: &'static str, action: Action, reason: impl Into<String>) -> Self {
        Self {
            entity,
            action,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Request(#[from] RequestFailed),

    #[error("Not logged in")]
    NotAuthenticated,

    /// Nothing to act on, e.g. confirming a delete that was never requested.
    #[error("{0}")]
    InvalidState(&'static str),

    #[error("Session storage error: {0}")]
    Session(#[from] std::io::Error),
}
