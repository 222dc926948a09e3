// src/engine/core.rs

//! Pure core state machine.
//!
//! The core consumes [`CoreInput`]s together with the current instant and
//! returns commands for the IO shell. It owns the debounce deadline but never
//! sleeps, spawns or touches channels, so every transition can be tested
//! synchronously with synthetic instants.

use std::time::{Duration, Instant};

use crate::engine::event_handlers::{
    handle_build_finished, handle_change, handle_debounce_elapsed, CoreCommand, CoreInput,
    CoreStep,
};
use crate::watch::ExtensionFilter;

/// Where the watcher is in its Idle → Pending → Building cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Waiting for the next qualifying change.
    Idle,
    /// A qualifying change arrived; build once `deadline` passes quietly.
    Pending { deadline: Instant },
    /// A build is in flight. `dirty` records qualifying changes seen meanwhile.
    Building { dirty: bool },
}

#[derive(Debug)]
pub struct WatchCore {
    state: WatchState,
    filter: ExtensionFilter,
    window: Duration,
    builds_started: u64,
}

impl WatchCore {
    pub fn new(filter: ExtensionFilter, window: Duration) -> Self {
        Self {
            state: WatchState::Idle,
            filter,
            window,
            builds_started: 0,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Deadline of the open debounce window, if any.
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            WatchState::Pending { deadline } => Some(deadline),
            _ => None,
        }
    }

    pub fn builds_started(&self) -> u64 {
        self.builds_started
    }

    /// Unconditional startup build, not triggered by any change.
    pub fn start(&mut self) -> CoreStep {
        if self.state != WatchState::Idle {
            return CoreStep::none();
        }
        self.state = WatchState::Building { dirty: false };
        self.builds_started += 1;
        CoreStep::with(vec![CoreCommand::RunBuild])
    }

    /// Handle a single input, updating state and returning the resulting
    /// commands for the IO shell.
    pub fn step(&mut self, input: CoreInput, now: Instant) -> CoreStep {
        let step = match input {
            CoreInput::Changed(event) => {
                handle_change(&mut self.state, &self.filter, self.window, &event, now)
            }
            CoreInput::DebounceElapsed => handle_debounce_elapsed(&mut self.state, now),
            CoreInput::BuildFinished(outcome) => {
                handle_build_finished(&mut self.state, self.window, outcome, now)
            }
            CoreInput::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        };

        if step.commands.contains(&CoreCommand::RunBuild) {
            self.builds_started += 1;
        }
        step
    }
}
