//! Discovery of the `.openmeta/` directory.
//!
//! The `.openmeta/` directory holds a project's converter configuration. It
//! is found by walking up from a starting directory, unless `OPENMETA_DIR`
//! names one explicitly.

use std::path::{Path, PathBuf};

use crate::config::ConfigError;

/// The name of the configuration directory.
const OPENMETA_DIR_NAME: &str = ".openmeta";

/// Environment variable that overrides directory discovery.
const OPENMETA_DIR_ENV: &str = "OPENMETA_DIR";

/// Walk up the directory tree from `start` looking for a `.openmeta/`
/// directory.
///
/// `OPENMETA_DIR` is checked first and wins if it names an existing
/// directory. Returns `None` if the filesystem root is reached.
///
/// # Examples
///
/// ```no_run
/// use openmeta_config::openmeta_dir::find_openmeta_dir;
/// use std::path::Path;
///
/// if let Some(dir) = find_openmeta_dir(Path::new(".")) {
///     println!("config lives in {}", dir.display());
/// }
/// ```
pub fn find_openmeta_dir(start: &Path) -> Option<PathBuf> {
    if let Ok(env_dir) = std::env::var(OPENMETA_DIR_ENV) {
        let env_path = PathBuf::from(env_dir);
        if env_path.is_dir() {
            return Some(env_path);
        }
    }
    find_openmeta_dir_from(start)
}

/// Walks up from `start` without consulting the environment.
fn find_openmeta_dir_from(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .map(|dir| dir.join(OPENMETA_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}

/// Like [`find_openmeta_dir`], but a missing directory is an error.
///
/// # Errors
///
/// Returns [`ConfigError::OpenmetaDirNotFound`] if no `.openmeta/`
/// directory is found.
pub fn find_openmeta_dir_or_error(start: &Path) -> Result<PathBuf, ConfigError> {
    find_openmeta_dir(start).ok_or(ConfigError::OpenmetaDirNotFound)
}

/// Ensure a `.openmeta/` directory exists at `path`, creating it (and any
/// parents) if needed. `path` may name the directory itself or its parent.
pub fn ensure_openmeta_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let dir = if path.ends_with(OPENMETA_DIR_NAME) {
        path.to_path_buf()
    } else {
        path.join(OPENMETA_DIR_NAME)
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_dir_in_start() {
        let dir = tempfile::tempdir().unwrap();
        let openmeta = dir.path().join(".openmeta");
        std::fs::create_dir(&openmeta).unwrap();

        let found = find_openmeta_dir_from(dir.path()).unwrap();
        assert_eq!(found, openmeta.canonicalize().unwrap());
    }

    #[test]
    fn finds_dir_from_child() {
        let dir = tempfile::tempdir().unwrap();
        let openmeta = dir.path().join(".openmeta");
        std::fs::create_dir(&openmeta).unwrap();
        let child = dir.path().join("catalog").join("exports");
        std::fs::create_dir_all(&child).unwrap();

        let found = find_openmeta_dir_from(&child).unwrap();
        assert_eq!(found, openmeta.canonicalize().unwrap());
    }

    #[test]
    fn missing_start_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_openmeta_dir_from(&dir.path().join("absent")).is_none());
    }

    #[test]
    fn ensure_creates_dir_once() {
        let dir = tempfile::tempdir().unwrap();
        let created = ensure_openmeta_dir(dir.path()).unwrap();
        assert!(created.is_dir());
        assert!(created.ends_with(".openmeta"));
        assert_eq!(ensure_openmeta_dir(&created).unwrap(), created);
    }
}
