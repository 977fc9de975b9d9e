//! Parsing of `route` nodes

use super::value::{first_string, flag, prop_bool, prop_string, unknown_field};
use crate::error::{GrammyError, Result};
use crate::model::{HttpMethod, RouteDeclaration};
use kdl::KdlNode;

/// Parse a route node
///
/// ```kdl
/// route "songs" method="GET" handler="SongsHandler"
/// route "health" handler="HealthHandler" auth=#false
/// route "admin" {
///     method "POST"
///     handler "AdminHandler"
///     api-key #true
/// }
/// ```
///
/// `method` defaults to GET, `api-key` to false and `auth` to true.
/// An empty path (`route ""`) binds on the API root.
pub fn parse_route(node: &KdlNode) -> Result<RouteDeclaration> {
    let path = first_string(node)
        .ok_or_else(|| GrammyError::InvalidConfig("route requires a path".to_string()))?;

    let mut method = prop_string(node, "method");
    let mut handler = prop_string(node, "handler");
    let mut api_key = prop_bool(node, "api-key").or_else(|| prop_bool(node, "api_key_required"));
    let mut auth = prop_bool(node, "auth").or_else(|| prop_bool(node, "auth_required"));

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "method" => method = first_string(child),
                "handler" => handler = first_string(child),
                "api-key" | "api_key_required" => api_key = flag(child),
                "auth" | "auth_required" => auth = flag(child),
                _ => return Err(unknown_field(&format!("route '{}'", path), child)),
            }
        }
    }

    let handler = handler.ok_or_else(|| {
        GrammyError::InvalidConfig(format!("route '{}' requires a handler", path))
    })?;
    let method = match method {
        Some(m) => m.parse::<HttpMethod>()?,
        None => HttpMethod::Get,
    };

    Ok(RouteDeclaration::new(path, method, handler)
        .with_api_key(api_key.unwrap_or(false))
        .with_auth(auth.unwrap_or(true)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(kdl: &str) -> Result<RouteDeclaration> {
        let doc: kdl::KdlDocument = kdl.parse().unwrap();
        parse_route(doc.nodes().first().unwrap())
    }

    #[test]
    fn test_parse_route_properties() {
        let route = parse(r#"route "songs" method="POST" handler="SongsHandler""#).unwrap();
        assert_eq!(route.path, "songs");
        assert_eq!(route.method, HttpMethod::Post);
        assert_eq!(route.handler_id, "SongsHandler");
        assert!(!route.api_key_required);
        assert!(route.auth_required);
    }

    #[test]
    fn test_parse_route_default_method() {
        let route = parse(r#"route "health" handler="HealthHandler" auth=#false"#).unwrap();
        assert_eq!(route.method, HttpMethod::Get);
        assert!(!route.auth_required);
    }

    #[test]
    fn test_parse_route_children() {
        let route = parse(
            r#"
            route "admin/users" {
                method "delete"
                handler "AdminHandler"
                api-key #true
            }
        "#,
        )
        .unwrap();
        assert_eq!(route.path, "admin/users");
        assert_eq!(route.method, HttpMethod::Delete);
        assert!(route.api_key_required);
        assert!(route.auth_required);
    }

    #[test]
    fn test_parse_route_bare_flag() {
        let route = parse(
            r#"
            route "keys" {
                handler "KeysHandler"
                api-key
            }
        "#,
        )
        .unwrap();
        assert!(route.api_key_required);
    }

    #[test]
    fn test_parse_route_string_bool() {
        let route = parse(r#"route "songs" handler="SongsHandler" auth="false""#).unwrap();
        assert!(!route.auth_required);
    }

    #[test]
    fn test_parse_root_route() {
        let route = parse(r#"route "" handler="IndexHandler""#).unwrap();
        assert_eq!(route.path, "");
    }

    #[test]
    fn test_route_requires_handler() {
        let err = parse(r#"route "songs" method="GET""#).unwrap_err();
        assert!(err.to_string().contains("requires a handler"));
    }

    #[test]
    fn test_route_rejects_unknown_method() {
        let err = parse(r#"route "songs" method="FETCH" handler="SongsHandler""#).unwrap_err();
        assert!(matches!(err, GrammyError::InvalidConfig(_)));
    }
}
