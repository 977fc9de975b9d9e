//! Route declarations

use crate::error::GrammyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP method accepted by the API router
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    /// Catch-all binding (every method)
    Any,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Any => "ANY",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = GrammyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            "ANY" | "*" => Ok(HttpMethod::Any),
            other => Err(GrammyError::InvalidConfig(format!(
                "unsupported HTTP method: {}",
                other
            ))),
        }
    }
}

/// One static route entry: a method on a path, served by a handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDeclaration {
    /// Slash separated path; empty for the API root
    pub path: String,

    pub method: HttpMethod,

    /// Name of the handler serving this route
    pub handler_id: String,

    #[serde(default)]
    pub api_key_required: bool,

    /// Guarded by the project authorizer when one exists
    #[serde(default = "default_auth_required")]
    pub auth_required: bool,
}

fn default_auth_required() -> bool {
    true
}

impl RouteDeclaration {
    /// `GET` route with the default flags (no API key, auth required)
    pub fn new(path: impl Into<String>, method: HttpMethod, handler_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            handler_id: handler_id.into(),
            api_key_required: false,
            auth_required: true,
        }
    }

    pub fn with_api_key(mut self, required: bool) -> Self {
        self.api_key_required = required;
        self
    }

    pub fn with_auth(mut self, required: bool) -> Self {
        self.auth_required = required;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("*".parse::<HttpMethod>().unwrap(), HttpMethod::Any);
    }

    #[test]
    fn test_method_parse_rejects_unknown() {
        let err = "FETCH".parse::<HttpMethod>().unwrap_err();
        assert!(matches!(err, GrammyError::InvalidConfig(_)));
    }

    #[test]
    fn test_route_defaults() {
        let route = RouteDeclaration::new("songs", HttpMethod::Get, "SongsHandler");
        assert!(!route.api_key_required);
        assert!(route.auth_required);
    }

    #[test]
    fn test_route_deserialize_defaults() {
        let json = r#"{"path":"health","method":"GET","handler_id":"HealthHandler"}"#;
        let route: RouteDeclaration = serde_json::from_str(json).unwrap();
        assert_eq!(route.method, HttpMethod::Get);
        assert!(route.auth_required);
        assert!(!route.api_key_required);
    }
}
