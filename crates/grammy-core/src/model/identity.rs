//! Identity (user pool) settings

use serde::{Deserialize, Serialize};

/// Header the API authorizer reads the identity token from
pub const DEFAULT_IDENTITY_SOURCE: &str = "method.request.header.Authorization";

/// Multi-factor authentication policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MfaMode {
    #[default]
    Required,
    Optional,
    Off,
}

/// User pool backing the API authorizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPoolConfig {
    pub name: String,

    pub self_sign_up: bool,

    /// Sign in with email as the username alias
    pub email_sign_in: bool,

    pub mfa: MfaMode,

    /// One-time-password second factor (SMS is never enabled)
    pub otp: bool,

    /// Validity of id, access and refresh tokens
    pub token_validity_hours: u32,

    pub identity_source: String,
}

impl UserPoolConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            self_sign_up: true,
            email_sign_in: true,
            mfa: MfaMode::Required,
            otp: true,
            token_validity_hours: 1,
            identity_source: DEFAULT_IDENTITY_SOURCE.to_string(),
        }
    }
}
