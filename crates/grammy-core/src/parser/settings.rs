//! Parsing of the service setting blocks
//!
//! `api`, `user-pool`, `table`, `backup-bucket` and `frontend` all apply onto
//! an existing value, so a second block (usually from grammy.local.kdl)
//! overrides only the fields it names.

use super::value::{
    args, first_string, prop_u32, require_bool, require_string, require_u32, strings,
    unknown_field,
};
use crate::error::{GrammyError, Result};
use crate::model::{
    ApiSettings, BackupBucketConfig, FrontendConfig, MfaMode, TableConfig, Transition,
    UserPoolConfig,
};
use kdl::{KdlNode, KdlValue};

/// ```kdl
/// api {
///     stage "prod"
///     cors-origin "https://app.example.com"
///     cors-header "X-Api-Key"
///     metrics #false
/// }
/// ```
pub fn apply_api(node: &KdlNode, api: &mut ApiSettings) -> Result<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };

    for child in children.nodes() {
        match child.name().value() {
            "stage" => api.stage = require_string("api", child)?,
            "cors-origin" | "cors-origins" | "cors_origins" => {
                push_unique(&mut api.cors_origins, strings(child));
            }
            "cors-header" | "cors-headers" | "cors_headers" => {
                push_unique(&mut api.cors_headers, strings(child));
            }
            "logging" => api.logging = require_bool("api", child)?,
            "metrics" => api.metrics = require_bool("api", child)?,
            _ => return Err(unknown_field("api", child)),
        }
    }

    Ok(())
}

/// ```kdl
/// user-pool "grammy-users" {
///     self-sign-up #false
///     mfa "optional"
///     token-validity-hours 8
/// }
/// ```
///
/// The name argument is optional; an unnamed pool is named after the project.
pub fn apply_user_pool(node: &KdlNode, pool: &mut UserPoolConfig) -> Result<()> {
    if let Some(name) = first_string(node) {
        pool.name = name;
    }
    let Some(children) = node.children() else {
        return Ok(());
    };

    for child in children.nodes() {
        match child.name().value() {
            "self-sign-up" | "self_sign_up" => {
                pool.self_sign_up = require_bool("user-pool", child)?;
            }
            "email-sign-in" | "email_sign_in" => {
                pool.email_sign_in = require_bool("user-pool", child)?;
            }
            "mfa" => pool.mfa = parse_mfa(child)?,
            "otp" => pool.otp = require_bool("user-pool", child)?,
            "token-validity-hours" | "token_validity_hours" => {
                pool.token_validity_hours = require_u32("user-pool", child)?;
            }
            "identity-source" | "identity_source" => {
                pool.identity_source = require_string("user-pool", child)?;
            }
            _ => return Err(unknown_field("user-pool", child)),
        }
    }

    Ok(())
}

fn parse_mfa(node: &KdlNode) -> Result<MfaMode> {
    let value = require_string("user-pool", node)?;
    match value.to_ascii_lowercase().as_str() {
        "required" | "on" => Ok(MfaMode::Required),
        "optional" => Ok(MfaMode::Optional),
        "off" => Ok(MfaMode::Off),
        _ => Err(GrammyError::InvalidConfig(format!(
            "user-pool: unknown mfa mode '{}' (expected required, optional or off)",
            value
        ))),
    }
}

/// ```kdl
/// table "grammy-data" {
///     partition-key "PK"
///     sort-key #null
/// }
/// ```
pub fn apply_table(node: &KdlNode, table: &mut TableConfig) -> Result<()> {
    if let Some(name) = first_string(node) {
        table.name = name;
    }
    let Some(children) = node.children() else {
        return Ok(());
    };

    for child in children.nodes() {
        match child.name().value() {
            "partition-key" | "partition_key" => {
                table.partition_key = require_string("table", child)?;
            }
            "sort-key" | "sort_key" => {
                table.sort_key = if is_null(child) {
                    None
                } else {
                    Some(require_string("table", child)?)
                };
            }
            "point-in-time-recovery" | "point_in_time_recovery" => {
                table.point_in_time_recovery = require_bool("table", child)?;
            }
            _ => return Err(unknown_field("table", child)),
        }
    }

    Ok(())
}

/// ```kdl
/// backup-bucket {
///     transition "INFREQUENT_ACCESS" after-days=30
///     transition "GLACIER" after-days=90
///     expire-after-days 365
/// }
/// ```
///
/// Any `transition` replaces the default lifecycle; `expire-after-days #null`
/// keeps objects forever.
pub fn apply_backup_bucket(node: &KdlNode, bucket: &mut BackupBucketConfig) -> Result<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };

    let mut transitions = Vec::new();
    for child in children.nodes() {
        match child.name().value() {
            "versioned" => bucket.versioned = require_bool("backup-bucket", child)?,
            "transition" => transitions.push(parse_transition(child)?),
            "expire-after-days" | "expire_after_days" => {
                bucket.expire_after_days = if is_null(child) {
                    None
                } else {
                    Some(require_u32("backup-bucket", child)?)
                };
            }
            _ => return Err(unknown_field("backup-bucket", child)),
        }
    }

    if !transitions.is_empty() {
        bucket.transitions = transitions;
    }

    Ok(())
}

fn parse_transition(node: &KdlNode) -> Result<Transition> {
    let storage_class = require_string("backup-bucket", node)?;
    let after_days = prop_u32(node, "after-days")
        .or_else(|| prop_u32(node, "after_days"))
        .ok_or_else(|| {
            GrammyError::InvalidConfig(format!(
                "backup-bucket: transition '{}' requires after-days",
                storage_class
            ))
        })?;

    Ok(Transition {
        storage_class,
        after_days,
    })
}

/// ```kdl
/// frontend {
///     asset-path "frontend/dist"
///     domain "app.example.com"
/// }
/// ```
pub fn apply_frontend(node: &KdlNode, frontend: &mut FrontendConfig) -> Result<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };

    for child in children.nodes() {
        match child.name().value() {
            "asset-path" | "asset_path" => {
                frontend.asset_path = require_string("frontend", child)?;
            }
            "domain" => frontend.domain = Some(require_string("frontend", child)?),
            "root-object" | "root_object" => {
                frontend.root_object = require_string("frontend", child)?;
            }
            "spa-fallback" | "spa_fallback" => {
                frontend.spa_fallback = require_bool("frontend", child)?;
            }
            "config-global" | "config_global" => {
                frontend.config_global = require_string("frontend", child)?;
            }
            _ => return Err(unknown_field("frontend", child)),
        }
    }

    Ok(())
}

fn is_null(node: &KdlNode) -> bool {
    matches!(args(node).next(), Some(KdlValue::Null))
}

fn push_unique(target: &mut Vec<String>, values: Vec<String>) {
    for value in values {
        if !target.contains(&value) {
            target.push(value);
        }
    }
}
