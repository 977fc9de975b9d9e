//! Route table builder
//!
//! Turns an ordered list of [`RouteDeclaration`](crate::model::RouteDeclaration)s
//! into a tree of path segments with one method binding per declaration.
//!
//! ```text
//! [("songs", GET), ("songs/{id}", GET), ("health", GET)]
//!
//! /                  (root)
//! ├── health         GET → HealthHandler
//! └── songs          GET → SongsHandler
//!     └── {id}       GET → SongsHandler
//! ```
//!
//! The tree is built once per configuration load and then handed to the
//! API routing provider; nothing here is shared or persisted.

mod binding;
mod builder;
mod tree;

pub use binding::{
    AuthorizationContext, AuthorizationMode, HandlerRef, HandlerResolver, MethodBinding,
};
pub use builder::build_route_table;
pub use tree::{NodeId, PathNode, RouteTree};
