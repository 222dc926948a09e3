// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform recursive filesystem watcher (`notify`).
//! - Turning raw notify events into [`ChangeEvent`]s (create/write only).
//! - Deciding which changes qualify for a rebuild ([`ExtensionFilter`]).
//!
//! It does **not** debounce or build; that is the engine's job.

pub mod event;
pub mod filter;
pub mod watcher;

pub use event::{change_events_from_notify, ChangeEvent, ChangeKind};
pub use filter::ExtensionFilter;
pub use watcher::{spawn_watcher, WatcherHandle};
