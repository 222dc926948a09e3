// src/exec/backend.rs

//! Pluggable build invoker abstraction.
//!
//! The engine talks to a `BuildInvoker` instead of spawning processes
//! itself. Production uses [`CommandBuildInvoker`]; tests provide scripted
//! invokers that return canned reports without touching the OS.

use std::future::Future;
use std::pin::Pin;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::engine::BuildReport;
use crate::exec::command::run_captured;

/// Trait abstracting how a rebuild is performed.
///
/// The engine awaits each call to completion before it looks at the next
/// change, so an implementation never sees overlapping calls.
pub trait BuildInvoker: Send {
    /// Run one full rebuild and report its outcome.
    fn run_build(&mut self) -> Pin<Box<dyn Future<Output = BuildReport> + Send + '_>>;
}

/// Runs the configured build steps in order through the platform shell.
#[derive(Debug, Clone)]
pub struct CommandBuildInvoker {
    steps: Vec<String>,
}

impl CommandBuildInvoker {
    pub fn new(steps: Vec<String>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }
}

impl BuildInvoker for CommandBuildInvoker {
    fn run_build(&mut self) -> Pin<Box<dyn Future<Output = BuildReport> + Send + '_>> {
        Box::pin(async move {
            let started = Instant::now();
            info!("rebuilding...");

            for step in &self.steps {
                debug!(step = %step, "running build step");
                match run_captured(step, None, None).await {
                    Ok(out) if out.success => {}
                    Ok(out) => {
                        let output = format!(
                            "`{step}` exited with {}\n{}",
                            out.exit_code
                                .map(|c| c.to_string())
                                .unwrap_or_else(|| "signal".to_string()),
                            out.combined
                        );
                        return BuildReport::failed(started.elapsed(), output);
                    }
                    Err(err) => {
                        return BuildReport::failed(started.elapsed(), format!("{err:#}"));
                    }
                }
            }

            BuildReport::success(started.elapsed())
        })
    }
}
