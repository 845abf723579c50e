//! Cancelable handle for timer tasks

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::debug;

/// Owns a spawned timer task and aborts it when dropped
///
/// Components keep one of these for each pending timer; replacing or
/// dropping the handle is how a timer gets cancelled.
#[derive(Debug)]
pub struct TimerHandle {
    name: &'static str,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Spawn `future` on the current tokio runtime
    pub fn spawn<F>(name: &'static str, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        debug!("Spawning {}", name);
        Self {
            name,
            task: tokio::spawn(future),
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            debug!("Cancelling {}", self.name);
        }
        self.task.abort();
    }
}
