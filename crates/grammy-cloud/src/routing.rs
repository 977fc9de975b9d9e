//! Hands a resolved route table to a [`RoutingProvider`]

use crate::error::{CloudError, Result};
use crate::provider::{ApiMethod, ApiResource, RoutingProvider};
use grammy_core::{Project, RouteTree};
use tracing::debug;

/// Emit every path node and binding of `tree`
///
/// Nodes are visited depth-first with children in segment order, and the
/// bindings of a node in method order, so equal trees always produce the
/// same sequence of calls.
pub fn emit_routes<P>(tree: &RouteTree, project: &Project, provider: &mut P) -> Result<usize>
where
    P: RoutingProvider + ?Sized,
{
    let mut methods = 0;

    for id in tree.walk() {
        let node = tree.node(id);
        let path = tree.full_path(id);

        if let Some(parent) = node.parent() {
            debug!(path = %path, "Emitting API resource");
            provider.add_resource(ApiResource {
                path: path.clone(),
                path_part: node.segment().to_string(),
                parent: tree.full_path(parent),
            })?;
        }

        for binding in node.bindings() {
            let handler = project.handlers.get(binding.handler.as_str()).ok_or_else(|| {
                CloudError::InvalidConfig(format!(
                    "route {} '{}' references handler '{}' missing from project '{}'",
                    binding.method, path, binding.handler, project.name
                ))
            })?;

            debug!(path = %path, method = %binding.method, "Emitting API method");
            provider.add_method(ApiMethod {
                path: path.clone(),
                method: binding.method,
                handler: binding.handler.clone(),
                function: handler.qualified_name(&project.name),
                proxy_integration: binding.proxy_integration,
                api_key_required: binding.api_key_required,
                authorization: binding.authorization,
                authorizer: binding.authorizer.clone(),
            })?;
            methods += 1;
        }
    }

    Ok(methods)
}
