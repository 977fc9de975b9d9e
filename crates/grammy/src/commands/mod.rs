pub mod manifest;
pub mod routes;
pub mod validate;

use anyhow::Context;
use grammy_config::ConfigError;
use grammy_core::LoadedProject;
use std::path::PathBuf;
use tracing::debug;

/// Load the project named by `--file`, or found from the current directory
///
/// Lookup without `--file`: the grammy-config candidates first
/// (`GRAMMY_CONFIG_PATH`, the current directory, the global config dir),
/// then `GRAMMY_PROJECT_ROOT` and the ancestors of the current directory.
pub fn load_project(file: Option<PathBuf>) -> anyhow::Result<LoadedProject> {
    let path = match file {
        Some(path) => path,
        None => match grammy_config::find_project_file() {
            Ok(path) => path,
            Err(ConfigError::ProjectFileNotFound) => {
                debug!("No project file in the current directory, searching upward");
                return grammy_core::load_project().map_err(|e| match e {
                    grammy_core::GrammyError::ProjectRootNotFound(_) => {
                        anyhow::Error::new(ConfigError::ProjectFileNotFound)
                    }
                    other => anyhow::Error::new(other),
                });
            }
            Err(e) => return Err(e.into()),
        },
    };

    grammy_core::load_project_from_file(&path)
        .with_context(|| format!("failed to load {}", path.display()))
}
