//! File discovery
//!
//! Finds the KDL files of a project from its conventional layout:
//!
//! ```text
//! <root>/
//! ├── grammy.kdl            (or .grammy.kdl, or either under .grammy/)
//! ├── handlers/**/*.kdl
//! ├── routes/**/*.kdl
//! ├── grammy.local.kdl      (or .grammy.local.kdl, or either under .grammy/)
//! └── .env                  (or .grammy/.env)
//! ```

use crate::error::{GrammyError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the project root file
pub const ROOT_FILE: &str = "grammy.kdl";

/// Accepted root file names, in priority order
pub const ROOT_FILES: [&str; 2] = [ROOT_FILE, ".grammy.kdl"];

/// Name of the local override file
pub const LOCAL_FILE: &str = "grammy.local.kdl";

/// Accepted local override names, in priority order
pub const LOCAL_FILES: [&str; 2] = [LOCAL_FILE, ".grammy.local.kdl"];

/// Directory that may hold the project files instead of the root
pub const PROJECT_DIR: &str = ".grammy";

/// Files found under a project root
#[derive(Debug, Clone, Default)]
pub struct DiscoveredFiles {
    /// Root file (grammy.kdl)
    pub root: Option<PathBuf>,
    /// Handler definitions (handlers/**/*.kdl)
    pub handlers: Vec<PathBuf>,
    /// Route definitions (routes/**/*.kdl)
    pub routes: Vec<PathBuf>,
    /// Local override (grammy.local.kdl)
    pub local_override: Option<PathBuf>,
    /// Environment file (.env)
    pub env_file: Option<PathBuf>,
}

impl DiscoveredFiles {
    /// All KDL files in load order: root, handlers, routes, local override
    pub fn kdl_files(&self) -> Vec<&Path> {
        self.root
            .iter()
            .chain(self.handlers.iter())
            .chain(self.routes.iter())
            .chain(self.local_override.iter())
            .map(PathBuf::as_path)
            .collect()
    }
}

/// Find the project root
///
/// Order:
/// 1. `GRAMMY_PROJECT_ROOT`
/// 2. the current directory and its ancestors, looking for `grammy.kdl`
///    or `.grammy/grammy.kdl`
#[tracing::instrument]
pub fn find_project_root() -> Result<PathBuf> {
    if let Ok(root) = std::env::var("GRAMMY_PROJECT_ROOT") {
        let path = PathBuf::from(&root);
        debug!(env_root = %root, "Checking GRAMMY_PROJECT_ROOT");
        if is_project_root(&path) {
            info!(project_root = %path.display(), "Found project root from environment variable");
            return Ok(path);
        }
        warn!(env_root = %root, "GRAMMY_PROJECT_ROOT has no grammy.kdl, ignoring");
    }

    let start_dir = std::env::current_dir()?;
    let mut current = start_dir.clone();
    debug!(start_dir = %start_dir.display(), "Searching for project root");

    loop {
        if is_project_root(&current) {
            info!(project_root = %current.display(), "Found project root");
            return Ok(current);
        }
        if !current.pop() {
            break;
        }
    }

    warn!(start_dir = %start_dir.display(), "Project root not found");
    Err(GrammyError::ProjectRootNotFound(start_dir))
}

fn is_project_root(dir: &Path) -> bool {
    first_existing(dir, &ROOT_FILES).is_some()
}

/// Whether `path` is named like a local override file
pub fn is_local_override(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| LOCAL_FILES.contains(&name))
}

/// Discover the files of the project at `project_root`
#[tracing::instrument(skip(project_root), fields(project_root = %project_root.display()))]
pub fn discover_files(project_root: &Path) -> Result<DiscoveredFiles> {
    debug!("Starting file discovery");

    let discovered = DiscoveredFiles {
        root: first_existing(project_root, &ROOT_FILES),
        handlers: discover_kdl_files(project_root, "handlers")?,
        routes: discover_kdl_files(project_root, "routes")?,
        local_override: first_existing(project_root, &LOCAL_FILES),
        env_file: first_existing(project_root, &[".env"]),
    };

    info!(
        root = discovered.root.is_some(),
        handler_files = discovered.handlers.len(),
        route_files = discovered.routes.len(),
        local_override = discovered.local_override.is_some(),
        "Discovered project files"
    );

    Ok(discovered)
}

/// First of `names` under `<root>`, falling back to `<root>/.grammy/`
fn first_existing(project_root: &Path, names: &[&str]) -> Option<PathBuf> {
    let project_dir = project_root.join(PROJECT_DIR);
    [project_root, project_dir.as_path()]
        .into_iter()
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
        .inspect(|path| debug!(file = %path.display(), "Found file"))
}

/// `<root>/<dir>/**/*.kdl` in alphabetical order
fn discover_kdl_files(project_root: &Path, dir: &str) -> Result<Vec<PathBuf>> {
    let base = project_root.join(dir);
    if !base.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = format!("{}/**/*.kdl", base.display());
    let entries = glob::glob(&pattern).map_err(|e| GrammyError::DiscoveryError {
        path: base.clone(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| GrammyError::DiscoveryError {
            path: e.path().to_path_buf(),
            message: e.to_string(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    debug!(dir = %base.display(), count = files.len(), "Discovered KDL files");
    Ok(files)
}
