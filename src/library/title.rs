//! Title records produced by a library scan

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Entry found directly under the library root
#[derive(Debug, Clone)]
pub struct TitleEntry {
    pub name: OsString,
    pub is_dir: bool,
}

impl TitleEntry {
    /// Build from a directory listing entry.
    ///
    /// Symlinks are followed so a linked title directory counts as a directory.
    pub fn from_dir_entry(entry: &fs::DirEntry) -> Self {
        let is_dir = fs::metadata(entry.path())
            .map(|m| m.is_dir())
            .unwrap_or(false);

        Self {
            name: entry.file_name(),
            is_dir,
        }
    }

    /// Hidden entries start with a dot
    pub fn is_hidden(&self) -> bool {
        self.name.to_string_lossy().starts_with('.')
    }

    /// Exact match against a block-list
    pub fn is_excluded(&self, excluded: &[String]) -> bool {
        excluded.iter().any(|e| self.name == e.as_str())
    }
}

/// Title directory with its selected content subdirectory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTitle {
    /// Absolute path to the title directory, e.g. /games/Zelda
    pub root_path: PathBuf,
    /// Chosen candidate, e.g. "merged" or "base"
    pub selected_subdir: String,
}

impl ResolvedTitle {
    pub fn new(root_path: PathBuf, selected_subdir: impl Into<String>) -> Self {
        Self {
            root_path,
            selected_subdir: selected_subdir.into(),
        }
    }

    /// Title directory name
    pub fn name(&self) -> String {
        self.root_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Directory that gets exposed, e.g. /games/Zelda/merged
    pub fn content_path(&self) -> PathBuf {
        self.root_path.join(&self.selected_subdir)
    }

    /// Report line, e.g. `"Zelda" -> "merged"`.
    ///
    /// `name` is the title name as it should be shown, styled or not.
    pub fn report_line(&self, name: impl fmt::Display) -> String {
        format!("\"{}\" -> \"{}\"", name, self.selected_subdir)
    }
}

/// Order in which resolved titles are handed to the overlay builder
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TitleOrder {
    /// Sort by title directory name
    #[default]
    Name,
    /// Keep raw directory enumeration order (filesystem dependent)
    Listing,
}

impl TitleOrder {
    pub fn apply(self, titles: &mut [ResolvedTitle]) {
        match self {
            TitleOrder::Name => {
                titles.sort_by(|a, b| a.root_path.file_name().cmp(&b.root_path.file_name()))
            }
            TitleOrder::Listing => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_path() {
        let title = ResolvedTitle::new(PathBuf::from("/games/Zelda"), "merged");
        assert_eq!(title.content_path(), PathBuf::from("/games/Zelda/merged"));
        assert_eq!(title.name(), "Zelda");
    }

    #[test]
    fn test_report_line() {
        let title = ResolvedTitle::new(PathBuf::from("/games/Metroid"), "base");
        assert_eq!(title.report_line(title.name()), "\"Metroid\" -> \"base\"");
        assert_eq!(title.report_line("[Metroid]"), "\"[Metroid]\" -> \"base\"");
    }

    #[test]
    fn test_hidden_and_excluded() {
        let excluded = vec!["rw".to_string(), "titles".to_string()];

        let hidden = TitleEntry { name: ".cache".into(), is_dir: true };
        assert!(hidden.is_hidden());
        assert!(!hidden.is_excluded(&excluded));

        let rw = TitleEntry { name: "rw".into(), is_dir: true };
        assert!(rw.is_excluded(&excluded));

        // exact match only
        let rw2 = TitleEntry { name: "rw2".into(), is_dir: true };
        assert!(!rw2.is_excluded(&excluded));
        assert!(!rw2.is_hidden());
    }

    #[test]
    fn test_order_by_name() {
        let mut titles = vec![
            ResolvedTitle::new(PathBuf::from("/g/c"), "base"),
            ResolvedTitle::new(PathBuf::from("/g/a"), "merged"),
            ResolvedTitle::new(PathBuf::from("/g/b"), "base"),
        ];

        TitleOrder::Listing.apply(&mut titles);
        assert_eq!(titles[0].name(), "c");

        TitleOrder::Name.apply(&mut titles);
        let names: Vec<_> = titles.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
