use std::time::Duration;
use tokio::task::JoinHandle;

/// A closure that runs once after a delay unless cancelled first.
///
/// Dropping the handle cancels the task, so whoever owns it also owns its
/// lifetime. Cancelling after the closure has run, or cancelling twice, does
/// nothing. Must be created inside a Tokio runtime.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn after<F>(delay: Duration, task: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
        Self { handle }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
