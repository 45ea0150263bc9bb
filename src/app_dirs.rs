//! Where robolabel keeps its settings and logs.
//!
//! Everything lives under one `.robolabel` folder inside the OS config
//! directory. `ROBOLABEL_CONFIG_HOME` moves that folder for tests or portable
//! installs.

use std::{
    path::PathBuf,
    sync::{LazyLock, Mutex},
};

use directories::BaseDirs;
use thiserror::Error;

pub const APP_DIR_NAME: &str = ".robolabel";
/// Environment variable that replaces the OS config directory.
pub const CONFIG_HOME_ENV: &str = "ROBOLABEL_CONFIG_HOME";

static BASE_OVERRIDE: LazyLock<Mutex<Option<PathBuf>>> = LazyLock::new(|| Mutex::new(None));

/// Errors raised while resolving application directories.
#[derive(Debug, Error)]
pub enum AppDirError {
    /// Neither the override nor the OS config directory is available.
    #[error("No config directory is available on this system")]
    NoBaseDir,
    /// Creating the application directory failed.
    #[error("Failed to create application directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The `.robolabel` directory, created on first use.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    let base = base_dir().ok_or(AppDirError::NoBaseDir)?;
    ensure_dir(base.join(APP_DIR_NAME))
}

/// Rolling log files live here.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    ensure_dir(app_root_dir()?.join("logs"))
}

fn ensure_dir(path: PathBuf) -> Result<PathBuf, AppDirError> {
    std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn base_dir() -> Option<PathBuf> {
    if let Some(path) = BASE_OVERRIDE.lock().ok().and_then(|guard| guard.clone()) {
        return Some(path);
    }
    if let Some(path) = std::env::var_os(CONFIG_HOME_ENV).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(path));
    }
    BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
pub(crate) fn set_base_override(path: Option<PathBuf>) {
    if let Ok(mut guard) = BASE_OVERRIDE.lock() {
        *guard = path;
    }
}

#[cfg(test)]
pub(crate) static OVERRIDE_LOCK: Mutex<()> = Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn override_places_root_and_logs_under_base() {
        let _lock = OVERRIDE_LOCK.lock().unwrap_or_else(|err| err.into_inner());
        let base = tempdir().unwrap();
        set_base_override(Some(base.path().to_path_buf()));
        let root = app_root_dir().unwrap();
        let logs = logs_dir().unwrap();
        set_base_override(None);
        assert_eq!(root, base.path().join(APP_DIR_NAME));
        assert_eq!(logs, root.join("logs"));
        assert!(logs.is_dir());
    }
}
