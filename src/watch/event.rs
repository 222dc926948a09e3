use std::path::PathBuf;

use notify::event::{EventKind, ModifyKind};

/// A single file-system change the engine may react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Written,
}

impl ChangeEvent {
    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Created,
        }
    }

    pub fn written(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Written,
        }
    }
}

/// Map a notify event onto zero or more change events.
///
/// Creates and content/rename modifications count; metadata-only changes,
/// removals and access events are dropped.
pub fn change_events_from_notify(event: notify::Event) -> Vec<ChangeEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Modify(ModifyKind::Metadata(_)) => return Vec::new(),
        EventKind::Modify(_) => ChangeKind::Written,
        _ => return Vec::new(),
    };

    event
        .paths
        .into_iter()
        .map(|path| ChangeEvent { path, kind })
        .collect()
}
