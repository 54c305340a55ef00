//! romfu - Flat union view over a game library
//!
//! Each title directory in the library contributes one content
//! subdirectory (`merged` before `base`). The chosen directories are
//! stacked read-only, optionally under a writable `rw` layer, and mounted
//! as a single tree with an rclone union remote.

pub mod assemble;
pub mod config;
pub mod error;
pub mod library;
pub mod overlay;
pub mod rclone;

pub use config::Config;
pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::library::{ResolvedTitle, Scanner};
    pub use crate::overlay::{OverlayBuilder, OverlaySpec};
}
