//! Overlay specification builder

use crate::config::DEFAULT_WRITABLE_DIR;
use crate::error::{Error, Result};
use crate::library::ResolvedTitle;
use std::fs::DirBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::OverlayUpstream;

/// Ordered upstream list plus the mount destination.
///
/// Earlier upstreams take priority: the writable layer, when present, is
/// always first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySpec {
    upstreams: Vec<OverlayUpstream>,
    mount_point: PathBuf,
}

impl OverlaySpec {
    pub fn upstreams(&self) -> &[OverlayUpstream] {
        &self.upstreams
    }

    pub fn mount_point(&self) -> &Path {
        &self.mount_point
    }

    /// The read-write layer, if writing is enabled
    pub fn writable(&self) -> Option<&OverlayUpstream> {
        self.upstreams.first().filter(|u| u.is_writable())
    }

    pub fn read_only(&self) -> impl Iterator<Item = &OverlayUpstream> {
        self.upstreams.iter().filter(|u| !u.is_writable())
    }
}

/// Builds an [`OverlaySpec`] from resolved titles
#[derive(Debug, Clone)]
pub struct OverlayBuilder {
    library_root: PathBuf,
    writable_dir: String,
    enable_write: bool,
}

impl OverlayBuilder {
    pub fn new(library_root: impl Into<PathBuf>) -> Self {
        Self {
            library_root: library_root.into(),
            writable_dir: DEFAULT_WRITABLE_DIR.to_string(),
            enable_write: false,
        }
    }

    /// Name of the writable directory under the library root
    pub fn writable_dir(mut self, name: impl Into<String>) -> Self {
        self.writable_dir = name.into();
        self
    }

    pub fn enable_write(mut self, enable: bool) -> Self {
        self.enable_write = enable;
        self
    }

    /// Path of the writable layer, whether or not it is enabled
    pub fn writable_path(&self) -> PathBuf {
        self.library_root.join(&self.writable_dir)
    }

    /// Assemble the upstream list.
    ///
    /// Callers reject an empty `resolved` beforehand. With writing enabled
    /// the writable directory is created if missing.
    pub fn build(&self, resolved: &[ResolvedTitle], mount_point: &Path) -> Result<OverlaySpec> {
        let mut upstreams = Vec::with_capacity(resolved.len() + 1);

        if self.enable_write {
            let rw_path = std::path::absolute(self.writable_path()).map_err(|e| {
                Error::WritableOverlayCreate {
                    path: self.writable_path(),
                    source: e,
                }
            })?;
            create_writable_dir(&rw_path)?;
            upstreams.push(OverlayUpstream::read_write(rw_path));
        }

        upstreams.extend(
            resolved
                .iter()
                .map(|title| OverlayUpstream::read_only(title.content_path())),
        );

        debug!(
            "Built overlay with {} upstreams ({} read-only)",
            upstreams.len(),
            resolved.len()
        );

        Ok(OverlaySpec {
            upstreams,
            mount_point: mount_point.to_path_buf(),
        })
    }
}

fn create_writable_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        debug!("Using existing writable directory {:?}", path);
        return Ok(());
    }

    let mut builder = DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder
        .create(path)
        .map_err(|e| Error::WritableOverlayCreate {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!("Created writable directory {:?}", path);
    Ok(())
}
