//! Running `rclone mount`

use crate::config::MountConfig;
use crate::error::{Error, Result};
use crate::overlay::OverlaySpec;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::info;

use super::RcloneConfig;

/// A prepared `rclone mount` invocation
#[derive(Debug, Clone)]
pub struct RcloneMount {
    program: PathBuf,
    config: RcloneConfig,
    mount_point: PathBuf,
    extra_args: Vec<String>,
}

impl RcloneMount {
    pub fn new(spec: &OverlaySpec, mount: &MountConfig) -> Self {
        Self {
            program: mount.rclone_bin.clone(),
            config: RcloneConfig::from_spec(spec, mount),
            mount_point: spec.mount_point().to_path_buf(),
            extra_args: mount.extra_args.clone(),
        }
    }

    pub fn config(&self) -> &RcloneConfig {
        &self.config
    }

    /// Arguments after the program name
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "mount".into(),
            self.config.union_remote_path().into(),
            self.mount_point.clone().into_os_string(),
        ];
        args.extend(self.extra_args.iter().map(OsString::from));
        args
    }

    /// Command with the backend declarations in its own environment and
    /// the current stdio attached
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args())
            .envs(self.config.env_vars())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }

    /// Shell-like rendering for display
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = self
            .config
            .env_vars()
            .into_iter()
            .map(|(key, value)| format!("{}='{}'", key, value.to_string_lossy()))
            .collect();
        parts.push(self.program.display().to_string());
        parts.extend(
            self.args()
                .iter()
                .map(|a| a.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }

    /// Launch rclone and block until it exits.
    ///
    /// rclone keeps running for as long as the mount is up.
    pub fn run(&self) -> Result<()> {
        info!(
            "Mounting {} at {:?}",
            self.config.union_remote_path(),
            self.mount_point
        );

        let status = self
            .command()
            .status()
            .map_err(|e| Error::MountSpawn {
                program: self.program.clone(),
                source: e,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::MountExit {
                program: self.program.clone(),
                status,
            })
        }
    }
}

/// Unmount a FUSE mount point
pub fn unmount(mount_point: &Path) -> Result<()> {
    info!("Unmounting {:?}...", mount_point);

    #[cfg(target_os = "macos")]
    let output = Command::new("umount").arg(mount_point).output()?;

    #[cfg(not(target_os = "macos"))]
    let output = Command::new("fusermount")
        .arg("-u")
        .arg(mount_point)
        .output()?;

    if output.status.success() {
        info!("Unmounted successfully");
        Ok(())
    } else {
        Err(Error::Unmount(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ResolvedTitle;
    use crate::overlay::OverlayBuilder;
    use tempfile::tempdir;

    fn prepared(write: bool, mount: &MountConfig) -> (tempfile::TempDir, RcloneMount) {
        let dir = tempdir().unwrap();
        let resolved = vec![
            ResolvedTitle::new(dir.path().join("a"), "merged"),
            ResolvedTitle::new(dir.path().join("b"), "base"),
        ];
        let spec = OverlayBuilder::new(dir.path())
            .enable_write(write)
            .build(&resolved, Path::new("/mnt/games"))
            .unwrap();
        let invocation = RcloneMount::new(&spec, mount);
        (dir, invocation)
    }

    #[test]
    fn test_args() {
        let (_dir, invocation) = prepared(false, &MountConfig::default());
        let args = invocation.args();
        assert_eq!(args[0], "mount");
        assert_eq!(args[1], "ROMFUUNION:");
        assert_eq!(args[2], "/mnt/games");
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_extra_args_appended() {
        let mount = MountConfig {
            extra_args: vec!["--allow-other".to_string(), "--vfs-cache-mode=writes".to_string()],
            ..MountConfig::default()
        };
        let (_dir, invocation) = prepared(true, &mount);
        let args = invocation.args();
        assert_eq!(args.len(), 5);
        assert_eq!(args[3], "--allow-other");
        assert_eq!(args[4], "--vfs-cache-mode=writes");
    }

    #[test]
    fn test_command_env_is_local() {
        let (_dir, invocation) = prepared(true, &MountConfig::default());
        let cmd = invocation.command();

        assert_eq!(cmd.get_program(), "rclone");
        let envs: Vec<_> = cmd
            .get_envs()
            .map(|(k, v)| (k.to_os_string(), v.map(|v| v.to_os_string())))
            .collect();
        assert_eq!(envs.len(), 3);
        assert!(envs
            .iter()
            .any(|(k, _)| k == "RCLONE_CONFIG_ROMFUUNION_UPSTREAMS"));

        // nothing leaked into this process
        assert!(std::env::var_os("RCLONE_CONFIG_ROMFUUNION_UPSTREAMS").is_none());
    }

    #[test]
    fn test_describe() {
        let (_dir, invocation) = prepared(false, &MountConfig::default());
        let text = invocation.describe();
        assert!(text.contains("RCLONE_CONFIG_ROMFULOCAL_TYPE='local'"));
        assert!(text.ends_with("rclone mount ROMFUUNION: /mnt/games"));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let mount = MountConfig {
            rclone_bin: PathBuf::from("/nonexistent/romfu-test-rclone"),
            ..MountConfig::default()
        };
        let (_dir, invocation) = prepared(false, &mount);

        let err = invocation.run().unwrap_err();
        assert!(matches!(err, Error::MountSpawn { .. }));
        assert!(err.is_mount_failure());
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_mount_error() {
        let mount = MountConfig {
            rclone_bin: PathBuf::from("false"),
            ..MountConfig::default()
        };
        let (_dir, invocation) = prepared(false, &mount);

        let err = invocation.run().unwrap_err();
        match &err {
            Error::MountExit { program, status } => {
                assert_eq!(program, &PathBuf::from("false"));
                assert!(!status.success());
            }
            other => panic!("expected MountExit, got {:?}", other),
        }
        assert!(err.is_mount_failure());
    }
}
