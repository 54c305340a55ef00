//! Game library discovery
//!
//! Walks the immediate children of a library root and picks, for each
//! title directory, the single content subdirectory to expose.

mod scanner;
mod title;

pub use scanner::{scan, Scanner};
pub use title::{ResolvedTitle, TitleEntry, TitleOrder};
