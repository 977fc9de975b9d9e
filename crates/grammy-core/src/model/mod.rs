//! Model definitions
//!
//! Data types describing a Grammy project. Each concern lives in its own
//! module and is re-exported here.

mod api;
mod data;
mod frontend;
mod handler;
mod identity;
mod project;
mod route;

// Re-exports
pub use api::*;
pub use data::*;
pub use frontend::*;
pub use handler::*;
pub use identity::*;
pub use project::*;
pub use route::*;
