//! Method bindings and the collaborators they reference

use super::tree::NodeId;
use crate::model::{HandlerConfig, HttpMethod, Project};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Authorization applied to a method binding by the API router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizationMode {
    /// Unauthenticated at the routing layer
    #[default]
    None,
    /// Identity token checked against a user pool
    CognitoUserPools,
}

impl fmt::Display for AuthorizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorizationMode::None => write!(f, "NONE"),
            AuthorizationMode::CognitoUserPools => write!(f, "COGNITO_USER_POOLS"),
        }
    }
}

/// Handle to an externally provisioned authorizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationContext {
    /// Authorizer name
    pub name: String,

    /// User pool the authorizer validates tokens against
    pub user_pool: String,

    /// Request location of the identity token
    pub identity_source: String,

    pub mode: AuthorizationMode,
}

impl AuthorizationContext {
    pub fn cognito(
        name: impl Into<String>,
        user_pool: impl Into<String>,
        identity_source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            user_pool: user_pool.into(),
            identity_source: identity_source.into(),
            mode: AuthorizationMode::CognitoUserPools,
        }
    }
}

/// Opaque reference to a provisioned handler
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerRef(String);

impl HandlerRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Set of handlers routes are allowed to reference
///
/// Handler provisioning happens outside this crate; the builder only needs to
/// know whether a name resolves to something it can bind.
pub trait HandlerResolver {
    fn resolve(&self, handler_id: &str) -> Option<HandlerRef>;
}

impl<V> HandlerResolver for BTreeMap<String, V> {
    fn resolve(&self, handler_id: &str) -> Option<HandlerRef> {
        self.contains_key(handler_id)
            .then(|| HandlerRef::new(handler_id))
    }
}

impl<V> HandlerResolver for HashMap<String, V> {
    fn resolve(&self, handler_id: &str) -> Option<HandlerRef> {
        self.contains_key(handler_id)
            .then(|| HandlerRef::new(handler_id))
    }
}

impl HandlerResolver for [HandlerConfig] {
    fn resolve(&self, handler_id: &str) -> Option<HandlerRef> {
        self.iter()
            .find(|h| h.name == handler_id)
            .map(|h| HandlerRef::new(h.name.clone()))
    }
}

impl HandlerResolver for Project {
    fn resolve(&self, handler_id: &str) -> Option<HandlerRef> {
        self.handlers.resolve(handler_id)
    }
}

/// Binding record handed to the API routing provider
///
/// Every binding uses proxy integration: the whole request goes to the
/// handler and its response is returned unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodBinding {
    /// Node the method is attached to
    pub node: NodeId,

    /// Full path of the node (e.g. "/songs/{id}")
    pub path: String,

    pub method: HttpMethod,

    pub handler: HandlerRef,

    pub proxy_integration: bool,

    pub api_key_required: bool,

    pub authorization: AuthorizationMode,

    /// Authorizer name when `authorization` is not `None`
    pub authorizer: Option<String>,
}

impl MethodBinding {
    pub fn is_protected(&self) -> bool {
        self.authorization != AuthorizationMode::None
    }
}
