//! Error types for romfu

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type alias for romfu operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for romfu
#[derive(Error, Debug)]
pub enum Error {
    /// The library root could not be listed
    #[error("Failed to read library directory {path:?}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No valid game folders found in {0:?}")]
    NoTitlesFound(PathBuf),

    /// The writable overlay directory could not be created
    #[error("Failed to create writable overlay directory {path:?}: {source}")]
    WritableOverlayCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The mount tool could not be started
    #[error("Failed to launch {program:?}: {source}")]
    MountSpawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The mount tool ran but exited unsuccessfully
    #[error("{program:?} exited with {status}")]
    MountExit { program: PathBuf, status: ExitStatus },

    #[error("Failed to unmount: {0}")]
    Unmount(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// True for errors raised by the external mount process
    pub fn is_mount_failure(&self) -> bool {
        matches!(self, Error::MountSpawn { .. } | Error::MountExit { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_failure_classification() {
        let spawn = Error::MountSpawn {
            program: PathBuf::from("rclone"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(spawn.is_mount_failure());

        assert!(!Error::NoTitlesFound(PathBuf::from("/games")).is_mount_failure());
        assert!(!Error::InvalidConfig("x".to_string()).is_mount_failure());
    }

    #[test]
    fn test_display_names_path() {
        let err = Error::NoTitlesFound(PathBuf::from("/games"));
        assert!(err.to_string().contains("/games"));
    }
}
