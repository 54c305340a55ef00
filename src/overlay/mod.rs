//! Overlay assembly
//!
//! Turns resolved titles into the ordered upstream list handed to the
//! union mount:
//! - Optional writable layer (`rw` under the library root), always first
//! - One read-only layer per title, in scan order

mod builder;
mod upstream;

pub use builder::{OverlayBuilder, OverlaySpec};
pub use upstream::{AccessMode, OverlayUpstream};
