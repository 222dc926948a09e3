// src/server/mod.rs

//! HTTP front for browser test clients.
//!
//! - `/wait` blocks until the next successful build.
//! - `/init` reports the server time.
//! - `/coverage` hands posted coverage data to the coverage pipeline.
//! - everything else is served from the static build directory.
//!
//! `/api/Wait`, `/api/Init` and `/api/Coverage` are mounted as aliases.
//! `/api/Init` answers the same bare `{"Now": ...}` object as `/init`; there
//! is no `Ret` envelope around it.

pub mod assets;
pub mod handlers;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{any, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{CoverageSection, ServerSection};
use crate::waiters::WaiterRegistry;

/// Largest coverage payload accepted, in bytes.
pub const COVERAGE_BODY_LIMIT: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppState {
    pub waiters: Arc<WaiterRegistry>,
    pub coverage: Arc<CoverageSection>,
}

impl AppState {
    pub fn new(waiters: Arc<WaiterRegistry>, coverage: CoverageSection) -> Self {
        Self {
            waiters,
            coverage: Arc::new(coverage),
        }
    }
}

/// Build the full application router.
pub fn router(state: AppState, server: &ServerSection) -> Router {
    let coverage = post(handlers::coverage).layer(DefaultBodyLimit::max(COVERAGE_BODY_LIMIT));

    Router::new()
        .route("/wait", any(handlers::wait))
        .route("/api/Wait", any(handlers::wait))
        .route("/init", any(handlers::init))
        .route("/api/Init", any(handlers::init))
        .route("/coverage", coverage.clone())
        .route("/api/Coverage", coverage)
        .fallback_service(assets::static_files(
            &server.static_dir,
            &server.default_extension,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
