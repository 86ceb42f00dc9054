use tokio::time::{sleep_until, Duration, Instant};

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Trailing-edge debounce: every `schedule` pushes the deadline out by the
/// full delay, and the action fires once input has been quiet that long.
#[derive(Debug)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self) {
        self.deadline = Some(Instant::now() + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consumes the pending action if its deadline has passed.
    pub fn take_due(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= Instant::now() => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Waits out the quiet period. Returns false when nothing was scheduled.
    pub async fn settled(&mut self) -> bool {
        match self.deadline.take() {
            Some(deadline) => {
                sleep_until(deadline).await;
                true
            }
            None => false,
        }
    }
}
