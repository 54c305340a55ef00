//! Configuration management for romfu

use crate::error::{Error, Result};
use crate::library::TitleOrder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Content subdirectories, highest priority first
pub const DEFAULT_CANDIDATES: &[&str] = &["merged", "base"];

/// Top-level names that are never treated as titles
pub const DEFAULT_EXCLUDED: &[&str] = &["rw", "titles"];

/// Name of the writable overlay directory under the library root
pub const DEFAULT_WRITABLE_DIR: &str = "rw";

pub const DEFAULT_LOCAL_REMOTE: &str = "ROMFULOCAL";
pub const DEFAULT_UNION_REMOTE: &str = "ROMFUUNION";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library scanning configuration
    pub library: LibraryConfig,

    /// Mount configuration
    pub mount: MountConfig,
}

/// Library scanning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory containing one subdirectory per title
    pub root: Option<PathBuf>,

    /// Content subdirectory names in priority order
    pub candidates: Vec<String>,

    /// Top-level directory names to skip
    pub excluded: Vec<String>,

    /// Writable overlay directory, relative to the root
    pub writable_dir: String,

    /// Ordering of resolved titles
    pub order: TitleOrder,
}

/// Mount configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    /// Mount point path
    pub mount_point: Option<PathBuf>,

    /// Add a read-write layer on top of the titles
    pub enable_write: bool,

    /// rclone executable
    pub rclone_bin: PathBuf,

    /// Name of the local backend declaration
    pub local_remote: String,

    /// Name of the union backend declaration
    pub union_remote: String,

    /// Extra arguments passed to `rclone mount`
    pub extra_args: Vec<String>,
}

/// Fully resolved paths for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub library_root: PathBuf,
    pub mount_point: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        LibraryConfig {
            root: None,
            candidates: DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            excluded: DEFAULT_EXCLUDED.iter().map(|s| s.to_string()).collect(),
            writable_dir: DEFAULT_WRITABLE_DIR.to_string(),
            order: TitleOrder::default(),
        }
    }
}

impl Default for MountConfig {
    fn default() -> Self {
        MountConfig {
            mount_point: None,
            enable_write: false,
            rclone_bin: PathBuf::from("rclone"),
            local_remote: DEFAULT_LOCAL_REMOTE.to_string(),
            union_remote: DEFAULT_UNION_REMOTE.to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file, with environment variable overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!("Failed to read config file: {}", e))
        })?;

        let mut config: Config = serde_json::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse config file: {}", e))
        })?;

        config.apply_env_overrides();

        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise start from defaults.
    ///
    /// Used for the implicit default location only; an explicitly requested
    /// file that is missing should go through [`Config::load`].
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            return Self::load(path);
        }

        let mut config = Config::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(bin) = std::env::var("ROMFU_RCLONE_BIN") {
            let bin = bin.trim();
            if !bin.is_empty() {
                self.mount.rclone_bin = PathBuf::from(bin);
            }
        }

        if let Ok(root) = std::env::var("ROMFU_LIBRARY_ROOT") {
            let root = root.trim();
            if !root.is_empty() {
                self.library.root = Some(PathBuf::from(root));
            }
        }

        if let Ok(mount_point) = std::env::var("ROMFU_MOUNT_POINT") {
            let mount_point = mount_point.trim();
            if !mount_point.is_empty() {
                self.mount.mount_point = Some(PathBuf::from(mount_point));
            }
        }
    }

    /// Save configuration to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path.as_ref(), content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.library.candidates.is_empty() {
            return Err(Error::InvalidConfig(
                "At least one content subdirectory name is required".to_string(),
            ));
        }

        for name in &self.library.candidates {
            validate_dir_name("content subdirectory", name)?;
        }

        validate_dir_name("writable directory", &self.library.writable_dir)?;

        validate_remote_name(&self.mount.local_remote)?;
        validate_remote_name(&self.mount.union_remote)?;

        if self.mount.local_remote.eq_ignore_ascii_case(&self.mount.union_remote) {
            return Err(Error::InvalidConfig(
                "Local and union remote names must differ".to_string(),
            ));
        }

        if self.mount.rclone_bin.as_os_str().is_empty() {
            return Err(Error::InvalidConfig(
                "rclone executable path is empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Library root and mount point, both of which must be set by now
    pub fn resolve_paths(&self) -> Result<RunPaths> {
        let library_root = self.library.root.clone().ok_or_else(|| {
            Error::InvalidConfig("Library directory is required (--input-dir)".to_string())
        })?;

        let mount_point = self.mount.mount_point.clone().ok_or_else(|| {
            Error::InvalidConfig("Mount point is required (--output-dir)".to_string())
        })?;

        Ok(RunPaths {
            library_root,
            mount_point,
        })
    }

    /// Default config file location
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("romfu")
            .join("config.json")
    }
}

fn validate_dir_name(what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() || name == "." || name == ".." {
        return Err(Error::InvalidConfig(format!(
            "Invalid {} name: {:?}",
            what, name
        )));
    }

    if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
        return Err(Error::InvalidConfig(format!(
            "{} name must not contain a path separator: {:?}",
            what, name
        )));
    }

    Ok(())
}

/// Remote names end up inside `RCLONE_CONFIG_<NAME>_<OPTION>` variables
fn validate_remote_name(name: &str) -> Result<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::InvalidConfig(format!(
            "Remote name must be non-empty and contain only [A-Za-z0-9_]: {:?}",
            name
        )));
    }
    Ok(())
}
