// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod server;
pub mod waiters;
pub mod watch;

use std::future::IntoFuture;
use std::path::Path;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_or_default, ConfigFile};
use crate::engine::{Runtime, RuntimeEvent, WatchCore, DEBOUNCE_WINDOW};
use crate::errors::{DevloopError, Result};
use crate::exec::{BuildInvoker, CommandBuildInvoker};
use crate::server::AppState;
use crate::waiters::WaiterRegistry;
use crate::watch::{spawn_watcher, ExtensionFilter};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - file watcher (fatal if it cannot subscribe)
/// - engine task (debounce + build + release)
/// - HTTP server (fatal if it cannot bind)
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let mut cfg = load_or_default(args.config.as_deref().map(Path::new))?;
    if let Some(port) = args.port {
        cfg.server.port = port;
    }

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let mut invoker = CommandBuildInvoker::new(cfg.build.steps.clone());

    if args.once {
        let report = invoker.run_build().await;
        if !report.is_success() {
            eprintln!("{}", report.output);
            return Err(DevloopError::BuildFailed {
                elapsed_ms: report.elapsed.as_millis(),
            });
        }
        info!(elapsed = ?report.elapsed, "build finished");
        return Ok(());
    }

    let waiters = Arc::new(WaiterRegistry::new());

    // Engine event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let _watcher_handle = spawn_watcher(&cfg.watch.roots, rt_tx.clone())?;

    let listener = TcpListener::bind(("0.0.0.0", cfg.server.port)).await?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let core = WatchCore::new(
        ExtensionFilter::new(cfg.watch.normalized_extension()),
        DEBOUNCE_WINDOW,
    );
    let runtime = Runtime::new(core, rt_rx, invoker, Arc::clone(&waiters));
    let engine = tokio::spawn(runtime.run());

    let app = server::router(AppState::new(waiters, cfg.coverage.clone()), &cfg.server);
    info!(
        "open localhost:{} in browser to run tests",
        cfg.server.port
    );

    tokio::select! {
        served = axum::serve(listener, app).into_future() => {
            served?;
        }
        finished = engine => {
            finished.map_err(|e| anyhow!("engine task failed: {e}"))??;
        }
    }

    info!("devloop exiting");
    Ok(())
}

/// Print the effective configuration without building or serving.
fn print_dry_run(cfg: &ConfigFile) {
    println!("devloop dry-run");
    println!("  watch.roots = {:?}", cfg.watch.roots);
    println!("  watch.extension = {}", cfg.watch.normalized_extension());
    println!("  debounce = {:?}", DEBOUNCE_WINDOW);
    println!();

    println!("build steps ({}):", cfg.build.steps.len());
    for step in cfg.build.steps.iter() {
        println!("  - {step}");
    }
    println!();

    println!("server:");
    println!("  port = {}", cfg.server.port);
    println!("  static_dir = {:?}", cfg.server.static_dir);
    println!("  default_extension = {}", cfg.server.default_extension);
    println!();

    println!("coverage:");
    println!("  workdir = {:?}", cfg.coverage.workdir);
    println!("  remap = {}", cfg.coverage.remap);
    println!("  report = {}", cfg.coverage.report);

    debug!("dry-run complete (no execution)");
}
