//! Filesystem sink: captures written as files under a sandbox root.
//!
//! Used when no document store is configured. The target path is derived
//! from the URL (never supplied by the caller), and anything that still
//! manages to contain a parent or root component is refused before the
//! join, so writes cannot escape the sandbox.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use webstash_classifier::make_filename;
use webstash_shared::{Result, WebstashError};

/// Writes captured content as UTF-8 files under a fixed root directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    root: PathBuf,
}

impl FileSink {
    /// Create a sink rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The sandbox root all writes stay under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a capture, creating parent directories as needed.
    ///
    /// Returns the relative path the content landed at.
    pub fn write_capture(&self, url: &str, content: &str) -> Result<String> {
        let relative = make_filename(url);
        let relative_path = Path::new(&relative);

        if !is_sandboxed(relative_path) {
            return Err(WebstashError::Sink(format!(
                "derived path '{relative}' would escape the sandbox root"
            )));
        }

        let target = self.root.join(relative_path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| WebstashError::io(parent, e))?;
        }
        std::fs::write(&target, content).map_err(|e| WebstashError::io(&target, e))?;

        debug!(path = %target.display(), bytes = content.len(), "capture written");
        Ok(relative)
    }
}

/// A derived path is safe only if every component is a normal segment:
/// no `..`, no root, no drive prefix.
fn is_sandboxed(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}
