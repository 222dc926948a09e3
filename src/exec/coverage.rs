// src/exec/coverage.rs

//! Coverage pipeline: remap raw browser coverage, then render the report.
//!
//! Failures are logged and never reported back to the HTTP caller.

use anyhow::{anyhow, Result};
use tracing::{error, info};

use crate::config::CoverageSection;
use crate::exec::command::{run_captured, run_inherited};

/// Run the remap step with `body` on stdin, then the report step.
///
/// The report step is skipped when remapping fails.
pub async fn process_coverage(cfg: &CoverageSection, body: &[u8]) {
    info!(bytes = body.len(), "coverage report");

    if let Err(err) = remap(cfg, body).await {
        error!(error = %format!("{err:#}"), "coverage remap failed");
        return;
    }

    match run_inherited(&cfg.report).await {
        Ok(out) if out.success => {}
        Ok(out) => error!(exit_code = ?out.exit_code, cmd = %cfg.report, "coverage report failed"),
        Err(err) => error!(error = %format!("{err:#}"), "coverage report failed"),
    }
}

/// The remap tool sometimes exits 0 while printing an error, so its output
/// is inspected as well.
async fn remap(cfg: &CoverageSection, body: &[u8]) -> Result<()> {
    let out = run_captured(&cfg.remap, Some(&cfg.workdir), Some(body)).await?;
    if !out.success || out.combined.contains("Error") {
        return Err(anyhow!(
            "`{}` exited with {:?}:\n{}",
            cfg.remap,
            out.exit_code,
            out.combined
        ));
    }
    Ok(())
}
