#![allow(dead_code)]

pub use devloop_test_utils::builders;
pub use devloop_test_utils::fake_invoker::FakeBuildInvoker;
pub use devloop_test_utils::{init_tracing, with_timeout};

use std::sync::Arc;

use devloop::engine::{Runtime, RuntimeEvent, WatchCore, DEBOUNCE_WINDOW};
use devloop::errors::Result;
use devloop::waiters::WaiterRegistry;
use devloop::watch::{ChangeEvent, ExtensionFilter};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Engine wired to a fake invoker, as the tests drive it.
pub struct TestEngine {
    pub tx: mpsc::Sender<RuntimeEvent>,
    pub waiters: Arc<WaiterRegistry>,
    pub invoker: FakeBuildInvoker,
    pub handle: JoinHandle<Result<()>>,
}

impl TestEngine {
    /// Spawn the engine watching `.ts` files with the standard window.
    pub fn spawn(invoker: FakeBuildInvoker) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let waiters = Arc::new(WaiterRegistry::new());
        let core = WatchCore::new(ExtensionFilter::new("ts"), DEBOUNCE_WINDOW);
        let runtime = Runtime::new(core, rx, invoker.clone(), Arc::clone(&waiters));
        let handle = tokio::spawn(runtime.run());
        Self {
            tx,
            waiters,
            invoker,
            handle,
        }
    }

    pub async fn touch(&self, path: &str) {
        self.tx
            .send(RuntimeEvent::Changed(ChangeEvent::written(path)))
            .await
            .expect("engine channel closed");
    }

    pub async fn shutdown(self) -> Result<()> {
        self.tx
            .send(RuntimeEvent::ShutdownRequested)
            .await
            .expect("engine channel closed");
        self.handle.await.expect("engine task panicked")
    }
}

/// Let spawned tasks run without advancing the paused clock.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
