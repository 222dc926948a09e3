// src/waiters.rs

//! Registry of clients blocked until the next successful build.
//!
//! Each waiter owns the receiving half of a `oneshot` channel; the registry
//! keeps the sending halves. A release takes the whole set under the lock
//! and fires every sender after the lock is dropped, so a waiter is either
//! in exactly one release batch or still pending.

use std::sync::{Mutex, MutexGuard};

use tokio::sync::oneshot;
use tracing::debug;

/// Set of pending release signals, shared between the engine task and the
/// request handlers.
#[derive(Debug, Default)]
pub struct WaiterRegistry {
    waiters: Mutex<Vec<oneshot::Sender<()>>>,
}

impl WaiterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new pending signal and return the handle to block on.
    pub fn register(&self) -> Waiter {
        let (tx, rx) = oneshot::channel();
        let pending = {
            let mut waiters = self.lock();
            // Drop senders whose client already went away.
            waiters.retain(|tx| !tx.is_closed());
            waiters.push(tx);
            waiters.len()
        };
        debug!(registered = pending, "waiter registered");
        Waiter {
            rx,
            released: false,
        }
    }

    /// Take every currently registered waiter and release it.
    ///
    /// Returns how many waiters were still listening. Waiters registered
    /// after the batch was taken stay pending until the next call.
    pub fn release_all(&self) -> usize {
        let batch = std::mem::take(&mut *self.lock());
        let taken = batch.len();

        // A failed send means the client disconnected.
        let count = batch
            .into_iter()
            .map(|tx| tx.send(()))
            .filter(Result::is_ok)
            .count();

        debug!(released = count, abandoned = taken - count, "waiters released");
        count
    }

    /// Number of waiters registered, not yet released, and still listening.
    ///
    /// Waiters whose client went away are not counted.
    pub fn pending(&self) -> usize {
        self.lock().iter().filter(|tx| !tx.is_closed()).count()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<oneshot::Sender<()>>> {
        // The critical sections never panic midway, so a poisoned set is
        // still consistent.
        self.waiters.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Handle returned by [`WaiterRegistry::register`].
#[derive(Debug)]
pub struct Waiter {
    rx: oneshot::Receiver<()>,
    released: bool,
}

impl Waiter {
    /// Block until the next release. No timeout.
    ///
    /// Also returns if the registry itself is dropped, which only happens
    /// at process shutdown.
    pub async fn wait(self) {
        if self.released {
            return;
        }
        let _ = self.rx.await;
    }

    /// Non-blocking check whether this waiter has been released.
    pub fn is_released(&mut self) -> bool {
        if !self.released {
            self.released = self.rx.try_recv().is_ok();
        }
        self.released
    }
}
