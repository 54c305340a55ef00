//! Scan + build pipeline
//!
//! Either the whole overlay is assembled or nothing is mounted.

use crate::config::{Config, RunPaths};
use crate::error::{Error, Result};
use crate::library::{ResolvedTitle, Scanner};
use crate::overlay::{OverlayBuilder, OverlaySpec};
use std::path::Path;
use tracing::debug;

/// Result of a successful assembly
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Titles in the order they were layered
    pub titles: Vec<ResolvedTitle>,
    pub spec: OverlaySpec,
}

/// Scan the library and order the titles, failing if none resolve
pub fn resolve_titles(config: &Config, library_root: &Path) -> Result<Vec<ResolvedTitle>> {
    let scanner = Scanner::from_config(&config.library);
    let mut titles = scanner.scan(library_root)?;

    if titles.is_empty() {
        return Err(Error::NoTitlesFound(library_root.to_path_buf()));
    }

    config.library.order.apply(&mut titles);
    debug!("Resolved {} titles in {:?} order", titles.len(), config.library.order);

    Ok(titles)
}

/// Resolve titles and build the overlay for `paths`
pub fn assemble(config: &Config, paths: &RunPaths) -> Result<Assembly> {
    let titles = resolve_titles(config, &paths.library_root)?;

    let spec = OverlayBuilder::new(&paths.library_root)
        .writable_dir(config.library.writable_dir.as_str())
        .enable_write(config.mount.enable_write)
        .build(&titles, &paths.mount_point)?;

    Ok(Assembly { titles, spec })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::TitleOrder;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn paths(root: &Path) -> RunPaths {
        RunPaths {
            library_root: root.to_path_buf(),
            mount_point: PathBuf::from("/mnt/games"),
        }
    }

    #[test]
    fn test_empty_library_fails_before_build() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.mount.enable_write = true;

        let err = assemble(&config, &paths(dir.path())).unwrap_err();
        assert!(matches!(err, Error::NoTitlesFound(_)));
        // nothing was created
        assert!(!dir.path().join("rw").exists());
    }

    #[test]
    fn test_sorted_by_name() {
        let dir = tempdir().unwrap();
        for name in ["delta", "alpha", "charlie", "bravo"] {
            fs::create_dir_all(dir.path().join(name).join("base")).unwrap();
        }

        let titles = resolve_titles(&Config::default(), dir.path()).unwrap();
        let names: Vec<_> = titles.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["alpha", "bravo", "charlie", "delta"]);
    }

    #[test]
    fn test_listing_order_keeps_every_title() {
        let dir = tempdir().unwrap();
        for name in ["b", "a"] {
            fs::create_dir_all(dir.path().join(name).join("merged")).unwrap();
        }
        let mut config = Config::default();
        config.library.order = TitleOrder::Listing;

        let titles = resolve_titles(&config, dir.path()).unwrap();
        assert_eq!(titles.len(), 2);
    }

    #[test]
    fn test_assemble_uses_configured_writable_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("game/base")).unwrap();
        let mut config = Config::default();
        config.mount.enable_write = true;
        config.library.writable_dir = "saves".to_string();

        let assembly = assemble(&config, &paths(dir.path())).unwrap();
        assert_eq!(assembly.spec.upstreams().len(), 2);
        assert_eq!(
            assembly.spec.writable().unwrap().source_path,
            dir.path().join("saves")
        );
        assert_eq!(assembly.titles.len(), 1);
    }

    #[test]
    fn test_existing_writable_dir_not_remounted() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("game/base")).unwrap();
        // content written through an earlier mount
        fs::create_dir_all(dir.path().join("saves/base")).unwrap();
        let mut config = Config::default();
        config.mount.enable_write = true;
        config.library.writable_dir = "saves".to_string();

        let assembly = assemble(&config, &paths(dir.path())).unwrap();

        let names: Vec<_> = assembly.titles.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["game"]);
        assert_eq!(assembly.spec.upstreams().len(), 2);
        assert_eq!(assembly.spec.read_only().count(), 1);
    }
}
