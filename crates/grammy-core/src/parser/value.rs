//! Small accessors over KDL nodes and values

use crate::error::{GrammyError, Result};
use kdl::{KdlNode, KdlValue};

/// Positional arguments (entries without a name)
pub(crate) fn args(node: &KdlNode) -> impl Iterator<Item = &KdlValue> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .map(|e| e.value())
}

/// First positional argument as a string
pub(crate) fn first_string(node: &KdlNode) -> Option<String> {
    args(node)
        .next()
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}

/// First positional argument in plain text form; `#null` has none
pub(crate) fn first_text(node: &KdlNode) -> Option<String> {
    match args(node).next()? {
        KdlValue::String(s) => Some(s.clone()),
        KdlValue::Integer(i) => Some(i.to_string()),
        KdlValue::Float(f) => Some(f.to_string()),
        KdlValue::Bool(b) => Some(b.to_string()),
        KdlValue::Null => None,
    }
}

/// All positional string arguments
pub(crate) fn strings(node: &KdlNode) -> Vec<String> {
    args(node)
        .filter_map(|v| v.as_string().map(|s| s.to_string()))
        .collect()
}

/// First positional argument as an unsigned integer
pub(crate) fn first_u32(node: &KdlNode) -> Option<u32> {
    args(node)
        .next()
        .and_then(|v| v.as_integer())
        .and_then(|i| u32::try_from(i).ok())
}

/// Flag node: `spa-fallback` alone means true, otherwise the first argument
pub(crate) fn flag(node: &KdlNode) -> Option<bool> {
    match args(node).next() {
        None => Some(true),
        Some(value) => as_bool(value),
    }
}

/// Named property `key=value`
pub(crate) fn prop<'a>(node: &'a KdlNode, key: &str) -> Option<&'a KdlValue> {
    node.entries()
        .iter()
        .find(|e| e.name().map(|n| n.value()) == Some(key))
        .map(|e| e.value())
}

pub(crate) fn prop_string(node: &KdlNode, key: &str) -> Option<String> {
    prop(node, key)
        .and_then(|v| v.as_string())
        .map(|s| s.to_string())
}

pub(crate) fn prop_bool(node: &KdlNode, key: &str) -> Option<bool> {
    prop(node, key).and_then(as_bool)
}

pub(crate) fn prop_u32(node: &KdlNode, key: &str) -> Option<u32> {
    prop(node, key)
        .and_then(|v| v.as_integer())
        .and_then(|i| u32::try_from(i).ok())
}

/// Booleans may be written as `#true` or as the string "true"
pub(crate) fn as_bool(value: &KdlValue) -> Option<bool> {
    value.as_bool().or_else(|| match value.as_string() {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    })
}

/// String argument of a field node, `owner` names the enclosing block in errors
pub(crate) fn require_string(owner: &str, node: &KdlNode) -> Result<String> {
    first_string(node).ok_or_else(|| field_error(owner, node, "a string"))
}

pub(crate) fn require_u32(owner: &str, node: &KdlNode) -> Result<u32> {
    first_u32(node).ok_or_else(|| field_error(owner, node, "a positive integer"))
}

pub(crate) fn require_bool(owner: &str, node: &KdlNode) -> Result<bool> {
    flag(node).ok_or_else(|| field_error(owner, node, "a boolean"))
}

pub(crate) fn unknown_field(owner: &str, node: &KdlNode) -> GrammyError {
    GrammyError::InvalidConfig(format!(
        "{}: unknown field '{}'",
        owner,
        node.name().value()
    ))
}

fn field_error(owner: &str, node: &KdlNode, expected: &str) -> GrammyError {
    GrammyError::InvalidConfig(format!(
        "{}: {} requires {}",
        owner,
        node.name().value(),
        expected
    ))
}
