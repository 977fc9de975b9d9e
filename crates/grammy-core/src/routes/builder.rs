//! Route table construction

use super::binding::{AuthorizationContext, HandlerResolver};
use super::tree::RouteTree;
use crate::error::{GrammyError, Result};
use crate::model::RouteDeclaration;
use tracing::{debug, info, warn};

/// Build the route table for `declarations`
///
/// Every declaration is resolved against a fresh root and bound in order.
/// The first malformed path, duplicate binding or unknown handler aborts the
/// whole build; there is no partial table.
///
/// With `auth` set to `None`, routes that ask for authorization are bound
/// with mode `NONE`. That fallback is logged, never silent.
pub fn build_route_table<H>(
    declarations: &[RouteDeclaration],
    handlers: &H,
    auth: Option<&AuthorizationContext>,
) -> Result<RouteTree>
where
    H: HandlerResolver + ?Sized,
{
    let mut tree = RouteTree::new();
    let root = tree.root();

    if auth.is_none() {
        let unguarded = declarations.iter().filter(|d| d.auth_required).count();
        if unguarded > 0 {
            warn!(
                routes = unguarded,
                "No authorizer configured; auth-required routes are bound without authorization"
            );
        }
    }

    for declaration in declarations {
        debug!(
            path = %declaration.path,
            method = %declaration.method,
            handler = %declaration.handler_id,
            "Resolving route"
        );

        let node = tree.resolve_segment(root, &declaration.path)?;

        let handler = handlers.resolve(&declaration.handler_id).ok_or_else(|| {
            GrammyError::UnknownHandler {
                handler: declaration.handler_id.clone(),
                path: tree.full_path(node),
                method: declaration.method.to_string(),
            }
        })?;

        tree.attach_binding(
            node,
            declaration.method,
            handler,
            declaration.api_key_required,
            declaration.auth_required,
            auth,
        )?;
    }

    info!(
        nodes = tree.len(),
        bindings = tree.binding_count(),
        "Route table built"
    );

    Ok(tree)
}
