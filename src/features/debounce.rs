//! Trailing-edge debouncer for keystroke handlers.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

type Handler<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;

/// Collapses a burst of `call`s into one handler run, `wait` after the last
/// call of the burst, with that call's arguments.
///
/// Each call bumps a generation counter and parks a timer; a timer whose
/// generation is no longer current when it wakes does nothing. A handler
/// that already started is never interrupted.
pub struct Debouncer<T> {
    wait: Duration,
    generation: Arc<AtomicU64>,
    handler: Handler<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(wait: Duration, handler: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            wait,
            generation: Arc::new(AtomicU64::new(0)),
            handler: Arc::new(move |args: T| handler(args).boxed()),
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Schedule `args`, replacing whatever call is still waiting.
    /// Must be called from inside a tokio runtime.
    pub fn call(&self, args: T) {
        let gen = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let handler = Arc::clone(&self.handler);
        let wait = self.wait;

        tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            if generation.load(Ordering::SeqCst) == gen {
                handler(args).await;
            }
        });
    }
}

impl<T> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("wait", &self.wait)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}
