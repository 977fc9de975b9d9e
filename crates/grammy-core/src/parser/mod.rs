//! KDL parser
//!
//! Turns Grammy KDL documents into a [`Project`]. Each node type has its own
//! module; this one only dispatches on the top-level node names.

mod handler;
mod route;
mod settings;
mod value;

use handler::{apply_handler, handler_name};
use settings::{apply_api, apply_backup_bucket, apply_frontend, apply_table, apply_user_pool};

pub use route::parse_route;

use crate::error::{GrammyError, Result};
use crate::model::{HandlerConfig, Project, TableConfig, UserPoolConfig};
use kdl::{KdlDocument, KdlNode};
use std::fs;
use std::path::Path;

/// Parse a KDL file into a project
///
/// The project is named after the containing directory unless the file has a
/// `project` node.
pub fn parse_kdl_file<P: AsRef<Path>>(path: P) -> Result<Project> {
    let content = fs::read_to_string(path.as_ref())?;
    let name = path
        .as_ref()
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string();
    parse_kdl_string(&content, name)
}

/// Parse a KDL string into a project
pub fn parse_kdl_string(content: &str, default_name: String) -> Result<Project> {
    let mut project = Project::new(default_name);
    apply_kdl_string(content, &mut project)?;
    fill_default_names(&mut project);
    Ok(project)
}

/// Apply a KDL document on top of `project`
///
/// Handlers and setting blocks merge into what is already there, routes are
/// appended in document order.
pub(crate) fn apply_kdl_string(content: &str, project: &mut Project) -> Result<()> {
    let doc: KdlDocument = content.parse()?;

    for node in doc.nodes() {
        match node.name().value() {
            "project" => {
                if let Some(name) = value::first_string(node) {
                    project.name = name;
                }
            }
            "variables" => {
                if let Some(vars) = node.children() {
                    for var in vars.nodes() {
                        let key = var.name().value().to_string();
                        let value = value::first_text(var).unwrap_or_default();
                        project.variables.insert(key, value);
                    }
                }
            }
            "handler" => {
                let name = handler_name(node)?;
                let handler = project
                    .handlers
                    .entry(name.clone())
                    .or_insert_with(|| HandlerConfig::new(name));
                apply_handler(node, handler)?;
            }
            "route" => project.routes.push(parse_route(node)?),
            "routes" => parse_routes_block(node, project)?,
            "api" => apply_api(node, &mut project.api)?,
            "user-pool" | "user_pool" => {
                let pool = project
                    .user_pool
                    .get_or_insert_with(|| UserPoolConfig::new(""));
                apply_user_pool(node, pool)?;
            }
            "table" => {
                let table = project.table.get_or_insert_with(|| TableConfig::new(""));
                apply_table(node, table)?;
            }
            "backup-bucket" | "backup_bucket" => {
                let bucket = project.backup_bucket.get_or_insert_with(Default::default);
                apply_backup_bucket(node, bucket)?;
            }
            "frontend" => {
                let frontend = project.frontend.get_or_insert_with(Default::default);
                apply_frontend(node, frontend)?;
            }
            _ => {
                // Unknown top-level nodes are left for other tools
            }
        }
    }

    Ok(())
}

/// `routes { route ... }` groups routes; only `route` children are allowed
fn parse_routes_block(node: &KdlNode, project: &mut Project) -> Result<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };
    for child in children.nodes() {
        if child.name().value() != "route" {
            return Err(GrammyError::InvalidConfig(format!(
                "routes: unexpected node '{}' (only route is allowed)",
                child.name().value()
            )));
        }
        project.routes.push(parse_route(child)?);
    }
    Ok(())
}

/// Unnamed user pool and table are named after the project
pub(crate) fn fill_default_names(project: &mut Project) {
    if let Some(pool) = project.user_pool.as_mut()
        && pool.name.is_empty()
    {
        pool.name = format!("{}-user-pool", project.name);
    }
    if let Some(table) = project.table.as_mut()
        && table.name.is_empty()
    {
        table.name = format!("{}-table", project.name);
    }
}
