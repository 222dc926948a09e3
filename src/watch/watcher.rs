// src/watch/watcher.rs

use std::path::PathBuf;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::watch::event::change_events_from_notify;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    roots: Vec<PathBuf>,
}

impl WatcherHandle {
    /// Roots actually subscribed, after canonicalization.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("roots", &self.roots)
            .finish()
    }
}

/// Subscribe recursively to every root and forward create/write changes to
/// the engine as `RuntimeEvent::Changed`.
///
/// Any subscription failure is returned as an error; callers treat it as
/// fatal since there is no useful mode without file watching.
pub fn spawn_watcher(
    roots: &[PathBuf],
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("devloop: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("devloop: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    let mut watched = Vec::with_capacity(roots.len());
    for root in roots {
        let root = root.canonicalize().unwrap_or_else(|_| root.clone());
        watcher.watch(&root, RecursiveMode::Recursive)?;
        info!("watching {:?}", root);
        watched.push(root);
    }

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            trace!(?event, "received notify event");

            for change in change_events_from_notify(event) {
                debug!(path = ?change.path, kind = ?change.kind, "file changed");
                if let Err(err) = runtime_tx.send(RuntimeEvent::Changed(change)).await {
                    warn!("failed to send RuntimeEvent::Changed: {err}");
                    // Engine is gone; no point keeping the loop alive.
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        _inner: watcher,
        roots: watched,
    })
}
