//! Project loader
//!
//! Ties discovery, template expansion, parsing and the route table builder
//! together:
//!
//! 1. discover files under the project root
//! 2. collect variables (`variables { }` blocks, `.env`, environment)
//! 3. render every file with Tera
//! 4. apply the rendered files onto one [`Project`] in load order
//! 5. validate and build the route table

use crate::discovery::{
    DiscoveredFiles, PROJECT_DIR, discover_files, find_project_root, is_local_override,
};
use crate::error::{GrammyError, Result};
use crate::model::Project;
use crate::parser::{apply_kdl_string, fill_default_names};
use crate::routes::{RouteTree, build_route_table};
use crate::template::{TemplateProcessor, Variables, extract_variables};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// A validated project together with its route table
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub project: Project,
    pub routes: RouteTree,
    /// Files applied, in load order
    pub files: Vec<PathBuf>,
}

impl LoadedProject {
    /// Validate `project` and build its route table
    pub fn from_project(project: Project) -> Result<Self> {
        validate_project(&project)?;
        let auth = project.authorization_context();
        let routes = build_route_table(&project.routes, &project, auth.as_ref())?;
        Ok(Self {
            project,
            routes,
            files: Vec::new(),
        })
    }
}

/// Load the project found from the current directory
#[instrument]
pub fn load_project() -> Result<LoadedProject> {
    info!("Starting project load");
    let project_root = find_project_root()?;
    load_project_from_root(&project_root)
}

/// Load the project rooted at `project_root`
#[instrument(skip(project_root), fields(project_root = %project_root.display()))]
pub fn load_project_from_root(project_root: &Path) -> Result<LoadedProject> {
    debug!("Step 1: Discovering files");
    let discovered = discover_files(project_root)?;
    if discovered.root.is_none() {
        return Err(GrammyError::DiscoveryError {
            path: project_root.to_path_buf(),
            message: "no grammy.kdl found".to_string(),
        });
    }
    load_discovered(project_root, &discovered)
}

/// Load the project whose entry file is `path`
///
/// The project root is the directory of the file (or the parent of a
/// `.grammy/` directory). Files discovered under that root are still loaded.
/// A local override name (`grammy.local.kdl`, `.grammy.local.kdl`) is layered
/// over the discovered root file; any other `path` replaces the root file
/// unless discovery already found it.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn load_project_from_file(path: &Path) -> Result<LoadedProject> {
    if !path.is_file() {
        return Err(GrammyError::IoError {
            path: path.to_path_buf(),
            message: "file not found".to_string(),
        });
    }
    let project_root = project_root_of(path);
    let mut discovered = discover_files(&project_root)?;

    let already_found = discovered
        .kdl_files()
        .iter()
        .any(|file| same_file(file, path));
    if !already_found {
        if is_local_override(path) {
            debug!(file = %path.display(), "Using explicit file as local override");
            discovered.local_override = Some(path.to_path_buf());
        } else {
            debug!(file = %path.display(), "Using explicit entry file as root");
            discovered.root = Some(path.to_path_buf());
        }
    }

    load_discovered(&project_root, &discovered)
}

fn load_discovered(project_root: &Path, discovered: &DiscoveredFiles) -> Result<LoadedProject> {
    debug!("Step 2: Preparing template processor");
    let mut processor = prepare_template_processor(discovered, project_root)?;

    debug!("Step 3: Rendering and parsing files");
    let mut project = Project::new(default_project_name(project_root));
    let files: Vec<PathBuf> = discovered
        .kdl_files()
        .into_iter()
        .map(Path::to_path_buf)
        .collect();
    for file in &files {
        debug!(file = %file.display(), "Rendering file");
        let rendered = processor.render_file(file)?;
        apply_kdl_string(&rendered, &mut project)?;
    }
    finalize(&mut project);

    debug!("Step 4: Validating and building route table");
    let mut loaded = LoadedProject::from_project(project)?;
    loaded.files = files;

    info!(
        project = %loaded.project.name,
        handlers = loaded.project.handlers.len(),
        routes = loaded.project.routes.len(),
        nodes = loaded.routes.len(),
        "Project loaded successfully"
    );

    Ok(loaded)
}

fn prepare_template_processor(
    discovered: &DiscoveredFiles,
    project_root: &Path,
) -> Result<TemplateProcessor> {
    let mut processor = TemplateProcessor::new();
    let mut all_variables = Variables::new();

    processor.add_variable(
        "PROJECT_ROOT",
        serde_json::Value::String(project_root.to_string_lossy().to_string()),
    );

    for file in discovered.kdl_files() {
        let content = std::fs::read_to_string(file).map_err(|e| GrammyError::IoError {
            path: file.to_path_buf(),
            message: e.to_string(),
        })?;
        all_variables.extend(extract_variables(&content)?);
    }

    if let Some(env_file) = &discovered.env_file {
        processor.add_env_file_variables(env_file)?;
    }

    processor.add_env_variables();

    debug!(vars = ?all_variables, "Adding collected variables to processor");
    processor.add_variables(all_variables);

    Ok(processor)
}

/// Defaults that depend on the whole project
fn finalize(project: &mut Project) {
    fill_default_names(project);

    let domain = project.frontend.as_ref().and_then(|f| f.domain.clone());
    project.api.cors_origins = project.api.allowed_origins(domain.as_deref());
}

/// Checks the parser cannot make on a single block
pub fn validate_project(project: &Project) -> Result<()> {
    if project.name.trim().is_empty() {
        return Err(GrammyError::InvalidConfig(
            "project name must not be empty".to_string(),
        ));
    }

    for handler in project.handlers.values() {
        if handler.function_name.is_empty() {
            return Err(GrammyError::InvalidConfig(format!(
                "handler '{}' requires function-name",
                handler.name
            )));
        }
        if handler.code_path.is_empty() {
            return Err(GrammyError::InvalidConfig(format!(
                "handler '{}' requires code-path",
                handler.name
            )));
        }
        if handler.timeout_secs == 0 || handler.memory_mb == 0 {
            return Err(GrammyError::InvalidConfig(format!(
                "handler '{}': timeout and memory must be positive",
                handler.name
            )));
        }
    }

    if let Some(pool) = &project.user_pool
        && pool.token_validity_hours == 0
    {
        return Err(GrammyError::InvalidConfig(
            "user-pool: token-validity-hours must be positive".to_string(),
        ));
    }

    if let Some(table) = &project.table
        && table.partition_key.is_empty()
    {
        return Err(GrammyError::InvalidConfig(
            "table: partition-key must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn project_root_of(path: &Path) -> PathBuf {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    if parent.file_name().and_then(|n| n.to_str()) == Some(PROJECT_DIR) {
        parent.parent().unwrap_or(parent).to_path_buf()
    } else {
        parent.to_path_buf()
    }
}

fn default_project_name(project_root: &Path) -> String {
    project_root
        .canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(project_root)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string()
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HandlerConfig, HttpMethod, RouteDeclaration};
    use crate::routes::AuthorizationMode;
    use serial_test::serial;
    use std::fs;

    fn create_test_project(base: &Path) -> Result<()> {
        fs::write(
            base.join("grammy.kdl"),
            r#"
project "grammy"

variables {
    songs_memory 512
}

user-pool
frontend {
    domain "{{ GRAMMY_TEST_DOMAIN }}"
}
"#,
        )?;

        fs::create_dir_all(base.join("handlers"))?;
        fs::write(
            base.join("handlers/health.kdl"),
            r#"
handler "HealthHandler" {
    function-name "health-get-handler"
    code-path "backend/health/get"
}
"#,
        )?;
        fs::write(
            base.join("handlers/songs.kdl"),
            r#"
handler "SongsHandler" {
    function-name "songs-handler"
    code-path "backend/songs"
    memory {{ songs_memory }}
}
"#,
        )?;

        fs::create_dir_all(base.join("routes"))?;
        fs::write(
            base.join("routes/api.kdl"),
            r#"
route "health" handler="HealthHandler" auth=#false
route "songs" handler="SongsHandler"
route "songs/{id}" method="PUT" handler="SongsHandler"
"#,
        )?;

        fs::write(base.join(".env"), "GRAMMY_TEST_DOMAIN=app.example.com\n")?;

        Ok(())
    }

    #[test]
    fn test_load_project_from_root() -> Result<()> {
        let temp_dir = tempfile::tempdir().unwrap();
        create_test_project(temp_dir.path())?;

        let loaded = load_project_from_root(temp_dir.path())?;
        let project = &loaded.project;

        assert_eq!(project.name, "grammy");
        assert_eq!(project.handlers.len(), 2);
        assert_eq!(project.handlers["SongsHandler"].memory_mb, 512);
        assert_eq!(project.routes.len(), 3);
        assert_eq!(loaded.files.len(), 4);

        assert_eq!(loaded.routes.binding_count(), 3);
        assert!(loaded.routes.find("songs/{id}").is_some());

        Ok(())
    }

    #[test]
    fn test_frontend_domain_joins_cors_origins() -> Result<()> {
        let temp_dir = tempfile::tempdir().unwrap();
        create_test_project(temp_dir.path())?;

        let loaded = load_project_from_root(temp_dir.path())?;
        assert_eq!(
            loaded.project.api.cors_origins,
            vec!["https://app.example.com", "http://localhost:5173"]
        );

        Ok(())
    }

    #[test]
    fn test_user_pool_guards_auth_required_routes() -> Result<()> {
        let temp_dir = tempfile::tempdir().unwrap();
        create_test_project(temp_dir.path())?;

        let loaded = load_project_from_root(temp_dir.path())?;
        let modes: Vec<(String, AuthorizationMode)> = loaded
            .routes
            .bindings()
            .map(|b| (b.path.clone(), b.authorization))
            .collect();

        assert_eq!(
            modes,
            vec![
                ("/health".to_string(), AuthorizationMode::None),
                ("/songs".to_string(), AuthorizationMode::CognitoUserPools),
                ("/songs/{id}".to_string(), AuthorizationMode::CognitoUserPools),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_local_override_is_applied_last() -> Result<()> {
        let temp_dir = tempfile::tempdir().unwrap();
        create_test_project(temp_dir.path())?;
        fs::write(
            temp_dir.path().join("grammy.local.kdl"),
            r#"
handler "SongsHandler" {
    memory 2048
}
api {
    stage "local"
}
"#,
        )?;

        let loaded = load_project_from_root(temp_dir.path())?;
        assert_eq!(loaded.project.handlers["SongsHandler"].memory_mb, 2048);
        assert_eq!(loaded.project.api.stage, "local");

        Ok(())
    }

    #[test]
    fn test_explicit_local_override_keeps_root_file() -> Result<()> {
        let temp_dir = tempfile::tempdir().unwrap();
        create_test_project(temp_dir.path())?;
        let dotted = temp_dir.path().join(".grammy.local.kdl");
        fs::write(&dotted, "handler \"SongsHandler\" { memory 1024; }")?;

        let loaded = load_project_from_file(&dotted)?;
        assert_eq!(loaded.project.name, "grammy");
        assert_eq!(loaded.project.handlers["SongsHandler"].memory_mb, 1024);
        assert_eq!(loaded.routes.binding_count(), 3);
        assert!(loaded.files.last().unwrap().ends_with(".grammy.local.kdl"));

        // an explicitly named override wins over the one discovery prefers
        fs::write(
            temp_dir.path().join("grammy.local.kdl"),
            "handler \"SongsHandler\" { memory 2048; }",
        )?;
        let loaded = load_project_from_file(&dotted)?;
        assert_eq!(loaded.project.handlers["SongsHandler"].memory_mb, 1024);
        assert_eq!(loaded.files.len(), 5);

        Ok(())
    }

    #[test]
    fn test_unknown_handler_aborts_load() -> Result<()> {
        let temp_dir = tempfile::tempdir().unwrap();
        create_test_project(temp_dir.path())?;
        fs::write(
            temp_dir.path().join("routes/admin.kdl"),
            r#"route "admin" handler="AdminHandler""#,
        )?;

        let err = load_project_from_root(temp_dir.path()).unwrap_err();
        assert!(matches!(err, GrammyError::UnknownHandler { .. }));

        Ok(())
    }

    #[test]
    fn test_load_project_from_file_in_project_dir() -> Result<()> {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join(".grammy");
        fs::create_dir_all(&dir)?;
        fs::write(
            dir.join("grammy.kdl"),
            r#"
project "songbook"
handler "HealthHandler" {
    function-name "health"
    code-path "backend/health"
}
route "health" handler="HealthHandler"
"#,
        )?;

        let loaded = load_project_from_file(&dir.join("grammy.kdl"))?;
        assert_eq!(loaded.project.name, "songbook");
        assert_eq!(loaded.files.len(), 1);

        Ok(())
    }

    #[test]
    fn test_load_project_from_explicit_file() -> Result<()> {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("staging.kdl");
        fs::write(&file, "project \"staging\"")?;

        let loaded = load_project_from_file(&file)?;
        assert_eq!(loaded.project.name, "staging");
        assert!(loaded.routes.is_empty());

        Ok(())
    }

    #[test]
    fn test_missing_root_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = load_project_from_root(temp_dir.path()).unwrap_err();
        assert!(matches!(err, GrammyError::DiscoveryError { .. }));
    }

    #[test]
    #[serial]
    fn test_load_project_from_cwd() -> Result<()> {
        let temp_dir = tempfile::tempdir().unwrap();
        create_test_project(temp_dir.path())?;

        let original_dir = std::env::current_dir()?;
        std::env::set_current_dir(temp_dir.path())?;
        let loaded = load_project();
        std::env::set_current_dir(original_dir)?;

        assert_eq!(loaded?.project.name, "grammy");
        Ok(())
    }

    #[test]
    fn test_validate_requires_code_path() {
        let mut project = Project::new("grammy");
        let mut handler = HandlerConfig::new("SongsHandler");
        handler.function_name = "songs".to_string();
        project.handlers.insert(handler.name.clone(), handler);

        let err = validate_project(&project).unwrap_err();
        assert!(err.to_string().contains("code-path"));
    }

    #[test]
    fn test_from_project_without_user_pool() -> Result<()> {
        let mut project = Project::new("grammy");
        let mut handler = HandlerConfig::new("SongsHandler");
        handler.function_name = "songs".to_string();
        handler.code_path = "backend/songs".to_string();
        project.handlers.insert(handler.name.clone(), handler);
        project
            .routes
            .push(RouteDeclaration::new("songs", HttpMethod::Get, "SongsHandler"));

        let loaded = LoadedProject::from_project(project)?;
        let binding = loaded.routes.bindings().next().unwrap();
        assert_eq!(binding.authorization, AuthorizationMode::None);

        Ok(())
    }

    #[test]
    fn test_project_root_of() {
        assert_eq!(
            project_root_of(Path::new("/srv/app/.grammy/grammy.kdl")),
            PathBuf::from("/srv/app")
        );
        assert_eq!(
            project_root_of(Path::new("/srv/app/grammy.kdl")),
            PathBuf::from("/srv/app")
        );
        assert_eq!(project_root_of(Path::new("grammy.kdl")), PathBuf::from("."));
    }
}
