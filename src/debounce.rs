//! Trailing-edge debounce on tokio timers.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use tokio_util::sync::CancellationToken;

type Action<A> = Arc<dyn Fn(A) -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Default)]
struct PendingSlot {
    generation: u64,
    token: Option<CancellationToken>,
}

/// Collapses a burst of calls into one invocation with the last arguments.
///
/// Each [`call`](Debouncer::call) cancels the invocation scheduled by the
/// previous one, if it has not started yet, and schedules a new one `wait`
/// later. The slot holds at most one pending invocation. Dropping the
/// debouncer cancels whatever is pending; an invocation that already started
/// runs to completion.
///
/// Must be called from within a tokio runtime.
pub struct Debouncer<A> {
    wait: Duration,
    action: Action<A>,
    pending: Arc<Mutex<PendingSlot>>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F, Fut>(wait: Duration, action: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            wait,
            action: Arc::new(move |args: A| -> BoxFuture<'static, ()> { action(args).boxed() }),
            pending: Arc::new(Mutex::new(PendingSlot::default())),
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn call(&self, args: A) {
        let token = CancellationToken::new();
        let generation = {
            let mut slot = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = slot.token.replace(token.clone()) {
                previous.cancel();
            }
            slot.generation += 1;
            slot.generation
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(generation, wait_ms = self.wait.as_millis() as u64, "debounce scheduled");

        let wait = self.wait;
        let action = Arc::clone(&self.action);
        let pending = Arc::clone(&self.pending);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(wait) => {
                    {
                        let mut slot = pending.lock().unwrap_or_else(PoisonError::into_inner);
                        if slot.generation == generation {
                            slot.token = None;
                        }
                    }
                    action(args).await;
                }
            }
        });
    }

    /// Whether an invocation is scheduled and has not started yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .is_some()
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        let mut slot = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = slot.token.take() {
            token.cancel();
        }
    }
}
