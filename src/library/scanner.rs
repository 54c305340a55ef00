//! Library scanner
//!
//! One level deep: each child of the root is a title, each title exposes
//! at most one candidate subdirectory.

use crate::config::LibraryConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use super::{ResolvedTitle, TitleEntry};

/// Scans a library root for title directories
#[derive(Debug, Clone)]
pub struct Scanner {
    /// Content subdirectory names, highest priority first
    candidates: Vec<String>,
    /// Top-level names that are never titles
    excluded: Vec<String>,
}

impl Scanner {
    pub fn new(candidates: Vec<String>, excluded: Vec<String>) -> Self {
        Self {
            candidates,
            excluded,
        }
    }

    /// Scanner for a configured library.
    ///
    /// The writable directory is always excluded, so the read-write layer is
    /// never stacked again as a read-only title.
    pub fn from_config(config: &LibraryConfig) -> Self {
        let mut excluded = config.excluded.clone();
        if !excluded.contains(&config.writable_dir) {
            excluded.push(config.writable_dir.clone());
        }
        Self::new(config.candidates.clone(), excluded)
    }

    /// Resolve every title under `root`, in directory listing order.
    ///
    /// Titles without a matching candidate are dropped without error. An
    /// empty result is not an error here either.
    pub fn scan(&self, root: &Path) -> Result<Vec<ResolvedTitle>> {
        let root = std::path::absolute(root).map_err(|e| Error::DirectoryRead {
            path: root.to_path_buf(),
            source: e,
        })?;

        let read_err = |e: std::io::Error| Error::DirectoryRead {
            path: root.clone(),
            source: e,
        };

        let mut resolved = Vec::new();

        for entry in fs::read_dir(&root).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let title = TitleEntry::from_dir_entry(&entry);

            if !title.is_dir {
                debug!("Skipping non-directory {:?}", title.name);
                continue;
            }

            if title.is_hidden() {
                debug!("Skipping hidden entry {:?}", title.name);
                continue;
            }

            if title.is_excluded(&self.excluded) {
                debug!("Skipping reserved directory {:?}", title.name);
                continue;
            }

            let dir_path = root.join(&title.name);
            if let Some(subdir) = self.select_subdir(&dir_path) {
                resolved.push(ResolvedTitle::new(dir_path, subdir));
            }
        }

        Ok(resolved)
    }

    /// First candidate that exists and is a directory
    pub fn select_subdir(&self, title_dir: &Path) -> Option<&str> {
        self.candidates
            .iter()
            .find(|name| is_dir(&title_dir.join(name)))
            .map(String::as_str)
    }
}

/// Scan with explicit candidate and exclusion lists
pub fn scan(root: &Path, candidates: &[String], excluded: &[String]) -> Result<Vec<ResolvedTitle>> {
    Scanner::new(candidates.to_vec(), excluded.to_vec()).scan(root)
}

fn is_dir(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}
