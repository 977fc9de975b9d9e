//! Grammy core
//!
//! Project model, KDL parser with template expansion, file discovery, and
//! the route table builder that resolves route declarations into a tree of
//! path segments with method bindings.

pub mod discovery;
pub mod error;
pub mod loader;
pub mod model;
pub mod parser;
pub mod routes;
pub mod template;

pub use discovery::{DiscoveredFiles, discover_files, find_project_root};
pub use error::{GrammyError, Result};
pub use loader::{
    LoadedProject, load_project, load_project_from_file, load_project_from_root, validate_project,
};
pub use model::*;
pub use parser::{parse_kdl_file, parse_kdl_string};
pub use routes::*;
pub use template::TemplateProcessor;
