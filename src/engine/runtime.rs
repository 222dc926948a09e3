use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::exec::BuildInvoker;
use crate::waiters::WaiterRegistry;

use super::core::WatchCore;
use super::{CoreCommand, CoreInput, CoreStep, RuntimeEvent};

/// Drives the watch core in response to change events and the debounce
/// timer, runs builds through a `BuildInvoker`, and releases waiters.
///
/// This task is the only owner of the core. Builds are awaited inline, so
/// they never overlap; events arriving meanwhile stay in the channel.
pub struct Runtime<B: BuildInvoker> {
    core: WatchCore,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    invoker: B,
    waiters: Arc<WaiterRegistry>,
}

impl<B: BuildInvoker> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<B: BuildInvoker> Runtime<B> {
    pub fn new(
        core: WatchCore,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        invoker: B,
        waiters: Arc<WaiterRegistry>,
    ) -> Self {
        Self {
            core,
            event_rx,
            invoker,
            waiters,
        }
    }

    /// Main event loop.
    ///
    /// - Runs the startup build.
    /// - Waits on the event channel and, while a debounce window is open,
    ///   on the window's deadline.
    /// - Executes commands returned by the core.
    pub async fn run(mut self) -> Result<()> {
        info!("devloop engine started");

        let startup = self.core.start();
        if !self.execute(startup).await {
            return Ok(());
        }

        loop {
            let input = match self.core.deadline() {
                Some(deadline) => {
                    // An expired deadline wins over queued events.
                    tokio::select! {
                        biased;
                        _ = sleep_until(Instant::from_std(deadline)) => CoreInput::DebounceElapsed,
                        event = self.event_rx.recv() => match event {
                            Some(event) => input_from_event(event),
                            None => break,
                        },
                    }
                }
                None => match self.event_rx.recv().await {
                    Some(event) => input_from_event(event),
                    None => break,
                },
            };

            let step = self.core.step(input, now());
            if !self.execute(step).await {
                info!("shutdown requested; stopping engine");
                return Ok(());
            }
        }

        info!("change event channel closed; engine exiting");
        Ok(())
    }

    /// Execute a step's commands, feeding build completions back into the
    /// core until nothing is left. Returns the final `keep_running`.
    async fn execute(&mut self, step: CoreStep) -> bool {
        let mut keep_running = step.keep_running;
        let mut queue: VecDeque<CoreCommand> = step.commands.into();

        while let Some(command) = queue.pop_front() {
            match command {
                CoreCommand::RunBuild => {
                    let outcome = self.run_build().await;
                    let next = self.core.step(CoreInput::BuildFinished(outcome), now());
                    keep_running &= next.keep_running;
                    queue.extend(next.commands);
                }
                CoreCommand::ReleaseWaiters => {
                    let released = self.waiters.release_all();
                    info!(released, "build succeeded; waiters released");
                }
            }
        }

        keep_running
    }

    async fn run_build(&mut self) -> super::BuildOutcome {
        debug!(build = self.core.builds_started(), "starting build");
        let report = self.invoker.run_build().await;

        if report.is_success() {
            info!(elapsed = ?report.elapsed, "build finished");
        } else {
            error!(
                elapsed = ?report.elapsed,
                output = %report.output,
                "build failed"
            );
            let blocked = self.waiters.pending();
            if blocked > 0 {
                warn!(
                    blocked,
                    "waiters stay blocked until a later build succeeds"
                );
            }
        }

        report.outcome
    }
}

fn input_from_event(event: RuntimeEvent) -> CoreInput {
    match event {
        RuntimeEvent::Changed(change) => CoreInput::Changed(change),
        RuntimeEvent::ShutdownRequested => CoreInput::ShutdownRequested,
    }
}

/// Current instant on tokio's clock, so paused-time tests stay consistent.
fn now() -> std::time::Instant {
    Instant::now().into_std()
}
