//! Single overlay layer

use std::fmt;
use std::path::{Path, PathBuf};

/// Access mode of an upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    ReadWrite,
    ReadOnly,
}

impl AccessMode {
    pub fn is_writable(self) -> bool {
        matches!(self, AccessMode::ReadWrite)
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessMode::ReadWrite => write!(f, "rw"),
            AccessMode::ReadOnly => write!(f, "ro"),
        }
    }
}

/// One entry of the union upstream list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayUpstream {
    /// Absolute path of the layer
    pub source_path: PathBuf,
    pub access_mode: AccessMode,
}

impl OverlayUpstream {
    pub fn read_only(source_path: PathBuf) -> Self {
        Self {
            source_path,
            access_mode: AccessMode::ReadOnly,
        }
    }

    pub fn read_write(source_path: PathBuf) -> Self {
        Self {
            source_path,
            access_mode: AccessMode::ReadWrite,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn is_writable(&self) -> bool {
        self.access_mode.is_writable()
    }
}
