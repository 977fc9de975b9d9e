use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrammyError {
    #[error("KDL parse error: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error: {path}\nreason: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("template error: {file}\nreason: {message}")]
    TemplateError { file: PathBuf, message: String },

    #[error("template render error: {0}")]
    TemplateRenderError(String),

    #[error("project root not found (searched upward from {0})")]
    ProjectRootNotFound(PathBuf),

    #[error("file discovery error: {path}\nreason: {message}")]
    DiscoveryError { path: PathBuf, message: String },

    #[error("malformed route path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    #[error("duplicate route: {method} is already bound at '{path}'")]
    DuplicateRoute { path: String, method: String },

    #[error("node {0} does not belong to this route tree")]
    UnknownNode(usize),

    #[error("route {method} '{path}' references unknown handler '{handler}'")]
    UnknownHandler {
        handler: String,
        path: String,
        method: String,
    },
}

pub type Result<T> = std::result::Result<T, GrammyError>;
