use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

/// How long a transient notice stays up
pub const AUTO_DISMISS: Duration = Duration::from_secs(2);

#[derive(Default)]
struct NoticeState {
    message: Option<String>,
    timer: Option<JoinHandle<()>>,
    shown: u64,
}

/// Transient message that clears itself after [`AUTO_DISMISS`].
///
/// Showing a new message restarts the timer; dismissing cancels it.
#[derive(Clone, Default)]
pub struct Notice {
    state: Arc<Mutex<NoticeState>>,
}

impl Notice {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, NoticeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn show(&self, message: impl Into<String>) {
        let mut state = self.lock();
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.message = Some(message.into());
        state.shown += 1;

        let shown = state.shown;
        let shared = Arc::clone(&self.state);
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(AUTO_DISMISS).await;
            let mut state = shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if state.shown == shown {
                state.message = None;
                state.timer = None;
            }
        }));
    }

    pub fn current(&self) -> Option<String> {
        self.lock().message.clone()
    }

    pub fn dismiss(&self) {
        let mut state = self.lock();
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.message = None;
    }
}

impl std::fmt::Debug for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notice").field("message", &self.current()).finish()
    }
}
