//! rclone backend declarations
//!
//! rclone reads remotes from `RCLONE_CONFIG_<REMOTE>_<OPTION>` variables,
//! so a config file is never written. The variables are handed to the
//! child process only.

use crate::config::MountConfig;
use crate::overlay::{AccessMode, OverlaySpec};
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Kind of a declared backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    /// Plain local filesystem access
    Local,
    /// Union of the listed upstreams, highest priority first.
    ///
    /// Kept as an `OsString` so non-UTF-8 title names reach rclone intact.
    Union { upstreams: OsString },
}

/// A named remote declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    pub name: String,
    pub kind: BackendKind,
}

impl Backend {
    /// Option name/value pairs for this backend
    pub fn options(&self) -> Vec<(&'static str, OsString)> {
        match &self.kind {
            BackendKind::Local => vec![("TYPE", "local".into())],
            BackendKind::Union { upstreams } => vec![
                ("TYPE", "union".into()),
                ("UPSTREAMS", upstreams.clone()),
            ],
        }
    }
}

/// Complete set of remotes for one mount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcloneConfig {
    local: Backend,
    union: Backend,
}

impl RcloneConfig {
    /// Declare one local backend, shared by every physical path, and a
    /// union backend over the spec's upstreams in order.
    pub fn from_spec(spec: &OverlaySpec, mount: &MountConfig) -> Self {
        let mut upstreams = OsString::new();
        for (i, upstream) in spec.upstreams().iter().enumerate() {
            if i > 0 {
                upstreams.push(" ");
            }
            upstreams.push(format_upstream(
                &mount.local_remote,
                &upstream.source_path,
                upstream.access_mode,
            ));
        }

        Self {
            local: Backend {
                name: mount.local_remote.clone(),
                kind: BackendKind::Local,
            },
            union: Backend {
                name: mount.union_remote.clone(),
                kind: BackendKind::Union { upstreams },
            },
        }
    }

    pub fn backends(&self) -> [&Backend; 2] {
        [&self.local, &self.union]
    }

    /// Rendered `upstreams` value of the union backend
    pub fn upstreams(&self) -> &OsStr {
        match &self.union.kind {
            BackendKind::Union { upstreams } => upstreams,
            BackendKind::Local => OsStr::new(""),
        }
    }

    /// Remote path to mount, e.g. `ROMFUUNION:`
    pub fn union_remote_path(&self) -> String {
        format!("{}:", self.union.name)
    }

    /// Environment variables declaring every backend
    pub fn env_vars(&self) -> Vec<(String, OsString)> {
        self.backends()
            .iter()
            .flat_map(|backend| {
                backend.options().into_iter().map(move |(option, value)| {
                    (
                        format!(
                            "RCLONE_CONFIG_{}_{}",
                            backend.name.to_ascii_uppercase(),
                            option
                        ),
                        value,
                    )
                })
            })
            .collect()
    }
}

/// Render one upstream as `"<remote>:<path>[:ro]"`, quotes included.
///
/// The path bytes are copied as-is.
pub fn format_upstream(remote: &str, path: &Path, mode: AccessMode) -> OsString {
    let mut entry = OsString::from(format!("\"{}:", remote));
    entry.push(path.as_os_str());
    if mode == AccessMode::ReadOnly {
        entry.push(":ro");
    }
    entry.push("\"");
    entry
}
