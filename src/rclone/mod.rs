//! rclone union mount
//!
//! Translates an [`OverlaySpec`](crate::overlay::OverlaySpec) into rclone
//! backend declarations and runs `rclone mount` against the union backend.

mod mount;
mod remote;

pub use mount::{unmount, RcloneMount};
pub use remote::{format_upstream, Backend, BackendKind, RcloneConfig};
