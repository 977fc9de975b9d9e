//! Handler (compute function) declarations

use serde::{Deserialize, Serialize};

pub const DEFAULT_RUNTIME: &str = "python3.14";
pub const DEFAULT_ENTRYPOINT: &str = "index.handler";
pub const DEFAULT_TIMEOUT_SECS: u32 = 10;
pub const DEFAULT_MEMORY_MB: u32 = 256;

/// A compute handler that routes can target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Logical name referenced by routes (e.g. "SongsHandler")
    pub name: String,

    /// Function name without the project prefix (e.g. "songs-get-handler")
    pub function_name: String,

    /// Path to the code bundle
    pub code_path: String,

    pub runtime: String,

    pub entrypoint: String,

    pub timeout_secs: u32,

    pub memory_mb: u32,
}

impl HandlerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            function_name: String::new(),
            code_path: String::new(),
            runtime: DEFAULT_RUNTIME.to_string(),
            entrypoint: DEFAULT_ENTRYPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            memory_mb: DEFAULT_MEMORY_MB,
        }
    }

    /// Deployed function name, prefixed with the project name
    pub fn qualified_name(&self, project: &str) -> String {
        format!("{}-{}", project, self.function_name)
    }
}
