//! Parsing of `handler` nodes

use super::value::{first_string, require_string, require_u32, unknown_field};
use crate::error::{GrammyError, Result};
use crate::model::HandlerConfig;
use kdl::KdlNode;

/// Name of a `handler "<Name>" { ... }` node
pub fn handler_name(node: &KdlNode) -> Result<String> {
    first_string(node)
        .ok_or_else(|| GrammyError::InvalidConfig("handler requires a name".to_string()))
}

/// Apply the fields of a handler node onto `handler`
///
/// Fields that the node does not mention are left as they are, so a later
/// declaration (e.g. in grammy.local.kdl) only overrides what it names.
pub fn apply_handler(node: &KdlNode, handler: &mut HandlerConfig) -> Result<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };
    let owner = format!("handler '{}'", handler.name);

    for child in children.nodes() {
        match child.name().value() {
            "function-name" | "function_name" => {
                handler.function_name = require_string(&owner, child)?;
            }
            "code-path" | "code_path" | "code" => {
                handler.code_path = require_string(&owner, child)?;
            }
            "runtime" => handler.runtime = require_string(&owner, child)?,
            "entrypoint" | "handler" => handler.entrypoint = require_string(&owner, child)?,
            "timeout" | "timeout-secs" | "timeout_secs" => {
                handler.timeout_secs = require_u32(&owner, child)?;
            }
            "memory" | "memory-size" | "memory_size" => {
                handler.memory_mb = require_u32(&owner, child)?;
            }
            _ => return Err(unknown_field(&owner, child)),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(kdl: &str) -> HandlerConfig {
        let doc: kdl::KdlDocument = kdl.parse().unwrap();
        let node = doc.nodes().first().unwrap();
        let mut handler = HandlerConfig::new(handler_name(node).unwrap());
        apply_handler(node, &mut handler).unwrap();
        handler
    }

    #[test]
    fn test_parse_handler() {
        let handler = parse(
            r#"
            handler "SongsHandler" {
                function-name "songs-get-handler"
                code-path "backend/songs/get"
                timeout 30
                memory 512
            }
        "#,
        );
        assert_eq!(handler.name, "SongsHandler");
        assert_eq!(handler.function_name, "songs-get-handler");
        assert_eq!(handler.code_path, "backend/songs/get");
        assert_eq!(handler.timeout_secs, 30);
        assert_eq!(handler.memory_mb, 512);
        assert_eq!(handler.runtime, "python3.14");
    }

    #[test]
    fn test_parse_handler_snake_case() {
        let handler = parse(
            r#"
            handler "HealthHandler" {
                function_name "health-get-handler"
                code_path "backend/health/get"
                runtime "python3.12"
                entrypoint "main.handler"
            }
        "#,
        );
        assert_eq!(handler.function_name, "health-get-handler");
        assert_eq!(handler.runtime, "python3.12");
        assert_eq!(handler.entrypoint, "main.handler");
    }

    #[test]
    fn test_apply_handler_overrides_only_named_fields() {
        let doc: kdl::KdlDocument = r#"
            handler "SongsHandler" {
                memory 1024
            }
        "#
        .parse()
        .unwrap();
        let node = doc.nodes().first().unwrap();

        let mut handler = HandlerConfig::new("SongsHandler");
        handler.function_name = "songs-get-handler".to_string();
        apply_handler(node, &mut handler).unwrap();

        assert_eq!(handler.memory_mb, 1024);
        assert_eq!(handler.function_name, "songs-get-handler");
    }

    #[test]
    fn test_handler_unknown_field_is_rejected() {
        let doc: kdl::KdlDocument = r#"
            handler "SongsHandler" {
                memroy 1024
            }
        "#
        .parse()
        .unwrap();
        let node = doc.nodes().first().unwrap();
        let mut handler = HandlerConfig::new("SongsHandler");

        let err = apply_handler(node, &mut handler).unwrap_err();
        assert!(err.to_string().contains("memroy"));
    }

    #[test]
    fn test_handler_negative_timeout_is_rejected() {
        let doc: kdl::KdlDocument = r#"
            handler "SongsHandler" {
                timeout -5
            }
        "#
        .parse()
        .unwrap();
        let node = doc.nodes().first().unwrap();
        let mut handler = HandlerConfig::new("SongsHandler");

        assert!(apply_handler(node, &mut handler).is_err());
    }

    #[test]
    fn test_handler_requires_name() {
        let doc: kdl::KdlDocument = "handler { }".parse().unwrap();
        let node = doc.nodes().first().unwrap();
        assert!(handler_name(node).is_err());
    }
}
