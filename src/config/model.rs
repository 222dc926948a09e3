use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// roots = [".", "./aff"]
/// extension = "ts"
///
/// [build]
/// steps = ["tsc --build tsconfig.json", "nyc instrument build static"]
///
/// [server]
/// port = 23456
/// static_dir = "static"
///
/// [coverage]
/// workdir = "build"
/// remap = "remap-istanbul -o ../.nyc_output/cover.json"
/// report = "nyc report"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub coverage: CoverageSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Directories watched recursively for create/write events.
    #[serde(default = "default_roots")]
    pub roots: Vec<PathBuf>,

    /// Only paths with this extension trigger a rebuild (`"ts"` or `".ts"`).
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("."), PathBuf::from("./aff")]
}

fn default_extension() -> String {
    "ts".to_string()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            extension: default_extension(),
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Shell commands run in order for every rebuild. The first failing
    /// step fails the build.
    #[serde(default = "default_steps")]
    pub steps: Vec<String>,
}

fn default_steps() -> Vec<String> {
    vec![
        "tsc --build tsconfig.json".to_string(),
        "nyc instrument build static".to_string(),
    ]
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            steps: default_steps(),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory the built assets are served from.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Extension appended to request paths that have none.
    #[serde(default = "default_script_extension")]
    pub default_extension: String,
}

fn default_port() -> u16 {
    23456
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_script_extension() -> String {
    "js".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
            default_extension: default_script_extension(),
        }
    }
}

/// `[coverage]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CoverageSection {
    /// Working directory of the remap command.
    #[serde(default = "default_coverage_workdir")]
    pub workdir: PathBuf,

    /// Command that reads raw coverage on stdin and remaps it to sources.
    #[serde(default = "default_remap")]
    pub remap: String,

    /// Command that renders the coverage report to stdout.
    #[serde(default = "default_report")]
    pub report: String,
}

fn default_coverage_workdir() -> PathBuf {
    PathBuf::from("build")
}

fn default_remap() -> String {
    "remap-istanbul -o ../.nyc_output/cover.json".to_string()
}

fn default_report() -> String {
    "nyc report".to_string()
}

impl Default for CoverageSection {
    fn default() -> Self {
        Self {
            workdir: default_coverage_workdir(),
            remap: default_remap(),
            report: default_report(),
        }
    }
}

impl WatchSection {
    /// Extension without a leading dot.
    pub fn normalized_extension(&self) -> &str {
        self.extension.trim().trim_start_matches('.')
    }
}
