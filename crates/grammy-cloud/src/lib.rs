//! Grammy cloud manifest
//!
//! Converts a loaded project and its route table into the resource records
//! the provisioning engine applies. Nothing here talks to a cloud API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   grammy CLI                    │
//! │              (grammy manifest)                  │
//! └─────────────────┬───────────────────────────────┘
//!                   │ LoadedProject
//! ┌─────────────────▼───────────────────────────────┐
//! │                 grammy-cloud                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  Manifest: Data / Backend / Frontend     │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────────────┐     │
//! │  │ emit_routes  │─▶│ trait RoutingProvider│     │
//! │  └──────────────┘  └──────────────────────┘     │
//! └─────────────────┬───────────────────────────────┘
//!                   │ JSON
//!           provisioning engine
//! ```

pub mod error;
pub mod manifest;
pub mod provider;
pub mod routing;

// Re-exports
pub use error::{CloudError, Result};
pub use manifest::{Manifest, Output, Stack};
pub use provider::{ApiMethod, ApiResource, ResourceConfig, ResourceSet, RoutingProvider};
pub use routing::emit_routes;
