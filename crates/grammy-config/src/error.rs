use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "project file not found. Looked in:\n\
        - current directory: grammy.local.kdl, .grammy.local.kdl, grammy.kdl, .grammy.kdl\n\
        - ./.grammy/ directory\n\
        - <config dir>/grammy/grammy.kdl\n\
        Set GRAMMY_CONFIG_PATH to point at a file directly"
    )]
    ProjectFileNotFound,

    #[error("GRAMMY_CONFIG_PATH points to a missing file: {0}")]
    ConfigPathNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
