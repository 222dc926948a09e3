// src/engine/event_handlers.rs

//! Transition functions for the core state machine.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::engine::core::WatchState;
use crate::engine::BuildOutcome;
use crate::watch::{ChangeEvent, ExtensionFilter};

/// Input fed into [`WatchCore::step`](crate::engine::WatchCore::step).
#[derive(Debug, Clone)]
pub enum CoreInput {
    /// A change notification from the watcher.
    Changed(ChangeEvent),
    /// The shell's debounce timer fired.
    DebounceElapsed,
    /// The build started by the last `RunBuild` finished.
    BuildFinished(BuildOutcome),
    /// Stop the engine loop.
    ShutdownRequested,
}

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreCommand {
    /// Invoke the build and report back with `BuildFinished`.
    RunBuild,
    /// Release every registered waiter.
    ReleaseWaiters,
}

/// Decision returned by the core after handling a single input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    pub fn none() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }

    pub fn with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Handle a change notification.
///
/// Non-qualifying paths never change state. A qualifying change opens the
/// debounce window from Idle, restarts it while Pending, and marks the core
/// dirty while Building. A change seen at or after the Pending deadline
/// starts the build and marks it dirty.
pub fn handle_change(
    state: &mut WatchState,
    filter: &ExtensionFilter,
    window: Duration,
    event: &ChangeEvent,
    now: Instant,
) -> CoreStep {
    if !filter.qualifies(event) {
        trace!(path = ?event.path, "ignoring non-qualifying change");
        return CoreStep::none();
    }

    // The window ran out before its timer was observed: build now and count
    // this change against the build.
    if let WatchState::Pending { deadline } = *state {
        if now >= deadline {
            debug!(path = ?event.path, "debounce window already elapsed; building");
            *state = WatchState::Building { dirty: true };
            return CoreStep::with(vec![CoreCommand::RunBuild]);
        }
    }

    match state {
        WatchState::Idle => {
            debug!(path = ?event.path, "change detected; debounce window opened");
            *state = WatchState::Pending {
                deadline: now + window,
            };
        }
        WatchState::Pending { deadline } => {
            debug!(path = ?event.path, "change during debounce; window restarted");
            *deadline = now + window;
        }
        WatchState::Building { dirty } => {
            debug!(path = ?event.path, "change during build; rebuild will follow");
            *dirty = true;
        }
    }

    CoreStep::none()
}

/// Handle the debounce timer firing.
///
/// A timer that fires early, or outside Pending, is stale and ignored.
pub fn handle_debounce_elapsed(state: &mut WatchState, now: Instant) -> CoreStep {
    match *state {
        WatchState::Pending { deadline } if now >= deadline => {
            *state = WatchState::Building { dirty: false };
            CoreStep::with(vec![CoreCommand::RunBuild])
        }
        _ => {
            trace!(?state, "stale debounce timer ignored");
            CoreStep::none()
        }
    }
}

/// Handle a finished build.
///
/// Success releases waiters; failure does not. Either way the core is ready
/// for the next qualifying change, or re-enters Pending if changes arrived
/// during the build.
pub fn handle_build_finished(
    state: &mut WatchState,
    window: Duration,
    outcome: BuildOutcome,
    now: Instant,
) -> CoreStep {
    let dirty = match *state {
        WatchState::Building { dirty } => dirty,
        _ => {
            debug!(?state, "build completion outside Building; ignoring");
            return CoreStep::none();
        }
    };

    *state = if dirty {
        WatchState::Pending {
            deadline: now + window,
        }
    } else {
        WatchState::Idle
    };

    match outcome {
        BuildOutcome::Success => CoreStep::with(vec![CoreCommand::ReleaseWaiters]),
        BuildOutcome::Failed => CoreStep::none(),
    }
}
