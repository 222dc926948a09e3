#![allow(dead_code)]

use std::path::PathBuf;

use devloop::config::ConfigFile;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigBuilder {
    config: ConfigFile,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ConfigFile::default(),
        }
    }

    pub fn roots(mut self, roots: &[&str]) -> Self {
        self.config.watch.roots = roots.iter().map(PathBuf::from).collect();
        self
    }

    pub fn extension(mut self, ext: &str) -> Self {
        self.config.watch.extension = ext.to_string();
        self
    }

    pub fn steps(mut self, steps: &[&str]) -> Self {
        self.config.build.steps = steps.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.server.static_dir = dir.into();
        self
    }

    pub fn coverage(mut self, workdir: impl Into<PathBuf>, remap: &str, report: &str) -> Self {
        self.config.coverage.workdir = workdir.into();
        self.config.coverage.remap = remap.to_string();
        self.config.coverage.report = report.to_string();
        self
    }

    pub fn build(self) -> ConfigFile {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
