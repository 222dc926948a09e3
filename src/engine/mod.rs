// src/engine/mod.rs

//! Watch → debounce → build → release engine.
//!
//! The pure state machine lives in [`core`]; the async/IO shell that reads
//! change events, sleeps until the debounce deadline, awaits the build and
//! releases waiters is implemented in [`runtime`].

use std::time::Duration;

use crate::watch::ChangeEvent;

/// Quiet period after the last qualifying change before a build starts.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(50);

/// Outcome of one build invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    Failed,
}

/// Result of one build invocation, as reported by a `BuildInvoker`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub outcome: BuildOutcome,
    pub elapsed: Duration,
    /// Diagnostic output of the failing step; empty on success.
    pub output: String,
}

impl BuildReport {
    pub fn success(elapsed: Duration) -> Self {
        Self {
            outcome: BuildOutcome::Success,
            elapsed,
            output: String::new(),
        }
    }

    pub fn failed(elapsed: Duration, output: impl Into<String>) -> Self {
        Self {
            outcome: BuildOutcome::Failed,
            elapsed,
            output: output.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == BuildOutcome::Success
    }
}

/// Events flowing into the runtime from the watcher and signal handlers.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// A file was created or written under one of the watch roots.
    Changed(ChangeEvent),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;

pub use core::{WatchCore, WatchState};
pub use event_handlers::{CoreCommand, CoreInput, CoreStep};
pub use runtime::Runtime;
