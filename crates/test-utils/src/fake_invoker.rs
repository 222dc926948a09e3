use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use devloop::engine::{BuildOutcome, BuildReport};
use devloop::exec::BuildInvoker;

/// A fake build invoker that:
/// - records the (tokio clock) instant each build started
/// - optionally "runs" for a fixed duration
/// - returns scripted outcomes in order, then `Success` once the script is
///   exhausted.
#[derive(Debug, Clone)]
pub struct FakeBuildInvoker {
    script: Arc<Mutex<VecDeque<BuildOutcome>>>,
    started: Arc<Mutex<Vec<Instant>>>,
    duration: Duration,
}

impl FakeBuildInvoker {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            started: Arc::new(Mutex::new(Vec::new())),
            duration: Duration::ZERO,
        }
    }

    /// Outcomes returned by the next builds, in order.
    pub fn with_outcomes(self, outcomes: impl IntoIterator<Item = BuildOutcome>) -> Self {
        self.script.lock().unwrap().extend(outcomes);
        self
    }

    /// How long each build takes on the tokio clock.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Append an outcome while the invoker is already in use.
    pub fn push_outcome(&self, outcome: BuildOutcome) {
        self.script.lock().unwrap().push_back(outcome);
    }

    /// Start instants of every build so far. Clones share the record.
    pub fn started(&self) -> Vec<Instant> {
        self.started.lock().unwrap().clone()
    }

    pub fn build_count(&self) -> usize {
        self.started.lock().unwrap().len()
    }
}

impl Default for FakeBuildInvoker {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildInvoker for FakeBuildInvoker {
    fn run_build(&mut self) -> Pin<Box<dyn Future<Output = BuildReport> + Send + '_>> {
        let script = Arc::clone(&self.script);
        let started = Arc::clone(&self.started);
        let duration = self.duration;

        Box::pin(async move {
            let begin = Instant::now();
            started.lock().unwrap().push(begin);

            if !duration.is_zero() {
                tokio::time::sleep(duration).await;
            }

            let outcome = script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(BuildOutcome::Success);

            match outcome {
                BuildOutcome::Success => BuildReport::success(begin.elapsed()),
                BuildOutcome::Failed => BuildReport::failed(begin.elapsed(), "scripted failure"),
            }
        })
    }
}
