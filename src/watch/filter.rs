use std::ffi::OsStr;
use std::path::Path;

use crate::watch::ChangeEvent;

/// Decides whether a change is a *qualifying* event, i.e. touches a source
/// file of the watched kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFilter {
    extension: String,
}

impl ExtensionFilter {
    /// `extension` may be given with or without a leading dot.
    pub fn new(extension: impl AsRef<str>) -> Self {
        let extension = extension.as_ref().trim().trim_start_matches('.').to_string();
        Self { extension }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.extension() == Some(OsStr::new(&self.extension))
    }

    pub fn qualifies(&self, event: &ChangeEvent) -> bool {
        self.matches(&event.path)
    }
}
