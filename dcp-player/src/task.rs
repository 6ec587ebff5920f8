//! Single-slot cancellable background tasks
//!
//! The player never runs more than one instance of a given animation:
//! starting a new volume fade supersedes the running one, and a fresh
//! hover gesture restarts the preview debounce. `TaskSlot` captures that
//! pattern — a slot holds at most one task, scheduling aborts the
//! previous occupant, and dropping the slot (player unmount) cancels
//! whatever is left.

use std::future::Future;
use tokio::task::JoinHandle;

/// Holder for at most one running background task
pub struct TaskSlot {
    handle: Option<JoinHandle<()>>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Spawn `future` into the slot, aborting any task already there
    pub fn replace<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(future));
    }

    /// Abort the current task, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether a task is currently running in the slot
    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Wait for the current task to finish (test/shutdown helper)
    ///
    /// Abort-cancelled tasks resolve here too; the slot is left empty.
    pub async fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Default for TaskSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
