use crate::config::model::ConfigFile;
use crate::errors::{DevloopError, Result};

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - at least one watch root
/// - a non-empty qualifying extension
/// - at least one non-blank build step
/// - non-blank coverage commands
///
/// It does **not** check that the roots exist; that surfaces as a fatal
/// watch error at startup.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_watch(cfg)?;
    validate_build(cfg)?;
    validate_coverage(cfg)?;
    Ok(())
}

fn validate_watch(cfg: &ConfigFile) -> Result<()> {
    if cfg.watch.roots.is_empty() {
        return Err(DevloopError::ConfigError(
            "[watch].roots must contain at least one directory".to_string(),
        ));
    }
    if cfg.watch.normalized_extension().is_empty() {
        return Err(DevloopError::ConfigError(
            "[watch].extension must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_build(cfg: &ConfigFile) -> Result<()> {
    if cfg.build.steps.is_empty() {
        return Err(DevloopError::ConfigError(
            "[build].steps must contain at least one command".to_string(),
        ));
    }
    if let Some(idx) = cfg.build.steps.iter().position(|s| s.trim().is_empty()) {
        return Err(DevloopError::ConfigError(format!(
            "[build].steps[{idx}] is blank"
        )));
    }
    Ok(())
}

fn validate_coverage(cfg: &ConfigFile) -> Result<()> {
    if cfg.coverage.remap.trim().is_empty() {
        return Err(DevloopError::ConfigError(
            "[coverage].remap must not be blank".to_string(),
        ));
    }
    if cfg.coverage.report.trim().is_empty() {
        return Err(DevloopError::ConfigError(
            "[coverage].report must not be blank".to_string(),
        ));
    }
    Ok(())
}
