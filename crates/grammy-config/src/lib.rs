//! Locating the Grammy project file

pub mod error;

pub use error::*;

use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the project file directly
pub const CONFIG_PATH_ENV: &str = "GRAMMY_CONFIG_PATH";

/// File names tried in each directory, most specific first
pub const CANDIDATES: [&str; 4] = [
    "grammy.local.kdl",
    ".grammy.local.kdl",
    "grammy.kdl",
    ".grammy.kdl",
];

/// `<config dir>/grammy`, if the platform has a config directory
pub fn global_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("grammy"))
}

/// Find the project file starting from the current directory
///
/// Priority:
/// 1. `GRAMMY_CONFIG_PATH` (an explicit path that does not exist is an error)
/// 2. current directory: grammy.local.kdl, .grammy.local.kdl, grammy.kdl, .grammy.kdl
/// 3. `./.grammy/` with the same names
/// 4. `<config dir>/grammy/grammy.kdl`
pub fn find_project_file() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        debug!(path = %path.display(), "Using GRAMMY_CONFIG_PATH");
        return if path.is_file() {
            Ok(path)
        } else {
            Err(ConfigError::ConfigPathNotFound(path))
        };
    }

    let current_dir = std::env::current_dir()?;
    if let Some(path) = find_in_dir(&current_dir) {
        return Ok(path);
    }

    if let Some(global) = global_config_dir().map(|dir| dir.join("grammy.kdl"))
        && global.is_file()
    {
        debug!(path = %global.display(), "Using global project file");
        return Ok(global);
    }

    Err(ConfigError::ProjectFileNotFound)
}

/// Candidates in `dir`, then in `dir/.grammy/`
pub fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    let project_dir = dir.join(".grammy");
    [dir.to_path_buf(), project_dir]
        .iter()
        .flat_map(|base| CANDIDATES.iter().map(move |name| base.join(name)))
        .find(|path| path.is_file())
        .inspect(|path| debug!(path = %path.display(), "Found project file"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    fn with_current_dir<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir).unwrap();
        let result = f();
        std::env::set_current_dir(original_dir).unwrap();
        result
    }

    #[test]
    fn test_global_config_dir() {
        if let Some(dir) = global_config_dir() {
            assert!(dir.ends_with("grammy"));
        }
    }

    #[test]
    #[serial]
    fn test_find_project_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("grammy.kdl"), "// test").unwrap();

        let found = with_current_dir(temp_dir.path(), find_project_file).unwrap();
        assert!(found.ends_with("grammy.kdl"));
    }

    #[test]
    #[serial]
    fn test_local_file_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("grammy.kdl"), "// project").unwrap();
        fs::write(temp_dir.path().join("grammy.local.kdl"), "// local").unwrap();

        let found = with_current_dir(temp_dir.path(), find_project_file).unwrap();
        assert!(found.ends_with("grammy.local.kdl"));
    }

    #[test]
    fn test_hidden_local_before_visible_project_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(".grammy.local.kdl"), "// hidden local").unwrap();
        fs::write(temp_dir.path().join("grammy.kdl"), "// visible").unwrap();

        let found = find_in_dir(temp_dir.path()).unwrap();
        assert!(found.ends_with(".grammy.local.kdl"));
    }

    #[test]
    fn test_find_in_project_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project_dir = temp_dir.path().join(".grammy");
        fs::create_dir(&project_dir).unwrap();
        fs::write(project_dir.join("grammy.kdl"), "// in project dir").unwrap();

        let found = find_in_dir(temp_dir.path()).unwrap();
        assert!(found.ends_with(".grammy/grammy.kdl"));
    }

    #[test]
    fn test_current_dir_wins_over_project_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project_dir = temp_dir.path().join(".grammy");
        fs::create_dir(&project_dir).unwrap();
        fs::write(project_dir.join("grammy.local.kdl"), "").unwrap();
        fs::write(temp_dir.path().join(".grammy.kdl"), "").unwrap();

        let found = find_in_dir(temp_dir.path()).unwrap();
        assert_eq!(found, temp_dir.path().join(".grammy.kdl"));
    }

    #[test]
    #[serial]
    fn test_find_project_file_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.kdl");
        fs::write(&config_path, "// custom").unwrap();

        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, &config_path);
        }
        let result = find_project_file();
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    #[serial]
    fn test_env_var_pointing_nowhere_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("missing.kdl");

        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, &missing);
        }
        let result = find_project_file();
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }

        match result {
            Err(ConfigError::ConfigPathNotFound(path)) => assert_eq!(path, missing),
            other => panic!("expected ConfigPathNotFound, got {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_find_project_file_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();

        let result = with_current_dir(temp_dir.path(), find_project_file);
        let global_exists = global_config_dir()
            .map(|dir| dir.join("grammy.kdl").is_file())
            .unwrap_or(false);

        if !global_exists {
            assert!(matches!(result, Err(ConfigError::ProjectFileNotFound)));
        }
    }
}
