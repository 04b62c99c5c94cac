use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Lifetime of a view. Work run through the scope yields `None` once the
/// scope is closed, so late results are never applied.
#[derive(Clone)]
pub struct ViewScope {
    closed: Arc<watch::Sender<bool>>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        let (closed, _) = watch::channel(false);
        Self { closed: Arc::new(closed) }
    }

    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    pub async fn run<F: Future>(&self, work: F) -> Option<F::Output> {
        let mut closed = self.closed.subscribe();
        if *closed.borrow_and_update() {
            return None;
        }

        tokio::select! {
            output = work => {
                if self.is_closed() {
                    debug!("Discarding result of closed view");
                    None
                } else {
                    Some(output)
                }
            }
            _ = closed.wait_for(|closed| *closed) => {
                debug!("View closed before its request resolved");
                None
            }
        }
    }
}
