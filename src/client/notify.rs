use tokio::time::{Duration, Instant};
use tracing::{info, warn};

pub const DEFAULT_TOAST_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    expires_at: Instant,
}

/// Transient user-facing notifications. Each toast disappears after a fixed
/// time-to-live or when dismissed.
#[derive(Debug)]
pub struct Notifications {
    ttl: Duration,
    next_id: u64,
    toasts: Vec<Toast>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 1,
            toasts: Vec::new(),
        }
    }

    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        let message = message.into();
        info!("{}", message);
        self.push(ToastKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        let message = message.into();
        warn!("{}", message);
        self.push(ToastKind::Error, message)
    }

    fn push(&mut self, kind: ToastKind, message: String) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            kind,
            message,
            expires_at: Instant::now() + self.ttl,
        });
        id
    }

    /// Manual close. Returns whether the toast was still showing.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Toasts still on screen, oldest first.
    pub fn active(&mut self) -> &[Toast] {
        let now = Instant::now();
        self.toasts.retain(|t| t.expires_at > now);
        &self.toasts
    }

    /// Most recent toast regardless of expiry.
    pub fn last(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    /// Takes every unexpired toast, leaving none behind.
    pub fn drain(&mut self) -> Vec<Toast> {
        self.active();
        std::mem::take(&mut self.toasts)
    }
}
