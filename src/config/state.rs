// Application state module
// Immutable runtime state resolved once at startup

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use super::types::Config;

/// Application state shared by all connections
pub struct AppState {
    pub config: Config,
    /// Canonicalized dashboard root; every served path must resolve under it
    pub root: PathBuf,
    // Cached config value for fast access without re-reading the struct
    pub cached_access_log: AtomicBool,
}

impl AppState {
    /// Resolve runtime state from the loaded configuration
    ///
    /// Canonicalizes the dashboard root. A missing or unreadable root is a
    /// startup failure; the assets are produced by an external build step
    /// that must have run first.
    pub fn resolve(config: Config) -> io::Result<Self> {
        let root = Path::new(&config.dashboard.root).canonicalize().map_err(|e| {
            io::Error::new(
                e.kind(),
                format!(
                    "dashboard root '{}' is not accessible: {e}",
                    config.dashboard.root
                ),
            )
        })?;

        if !root.is_dir() {
            return Err(io::Error::other(format!(
                "dashboard root '{}' is not a directory",
                root.display()
            )));
        }

        let cached_access_log = AtomicBool::new(config.logging.access_log);

        Ok(Self {
            config,
            root,
            cached_access_log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_config(root: &str) -> Config {
        let mut cfg = Config::load_from("missing-test-config").unwrap();
        cfg.dashboard.root = root.to_string();
        cfg
    }

    #[test]
    fn test_resolve_missing_root_fails() {
        let cfg = test_config("/definitely/not/a/real/dashboard/dir");
        assert!(AppState::resolve(cfg).is_err());
    }

    #[test]
    fn test_resolve_canonicalizes_root() {
        let dir = std::env::temp_dir().join(format!("dash-state-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let cfg = test_config(dir.to_str().unwrap());
        let state = AppState::resolve(cfg).unwrap();
        assert!(state.root.is_absolute());
        assert!(state.root.is_dir());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_resolve_rejects_file_root() {
        let dir = std::env::temp_dir().join(format!("dash-state-file-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("not-a-dir.txt");
        std::fs::write(&file, b"x").unwrap();

        let cfg = test_config(file.to_str().unwrap());
        assert!(AppState::resolve(cfg).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }
}
