//! Project definition

use super::api::ApiSettings;
use super::data::{BackupBucketConfig, TableConfig};
use super::frontend::FrontendConfig;
use super::handler::HandlerConfig;
use super::identity::UserPoolConfig;
use super::route::RouteDeclaration;
use crate::routes::AuthorizationContext;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Project - the whole declared application
///
/// Holds every handler and route plus the settings of the surrounding
/// managed services. Nothing here is global: the loader builds one value and
/// callers pass it around explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    /// Project name, used as the prefix of every resource name
    pub name: String,

    /// Handlers indexed by logical name
    #[serde(default)]
    pub handlers: BTreeMap<String, HandlerConfig>,

    /// Routes in declaration order
    #[serde(default)]
    pub routes: Vec<RouteDeclaration>,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub user_pool: Option<UserPoolConfig>,

    #[serde(default)]
    pub table: Option<TableConfig>,

    #[serde(default)]
    pub backup_bucket: Option<BackupBucketConfig>,

    #[serde(default)]
    pub frontend: Option<FrontendConfig>,

    /// Variables declared in `variables { }` blocks
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Authorizer guarding auth-required routes, if a user pool is declared
    pub fn authorization_context(&self) -> Option<AuthorizationContext> {
        self.user_pool.as_ref().map(|pool| {
            AuthorizationContext::cognito(
                format!("{}-authorizer", self.name),
                pool.name.clone(),
                pool.identity_source.clone(),
            )
        })
    }

    /// Number of routes that require authorization
    pub fn protected_route_count(&self) -> usize {
        self.routes.iter().filter(|r| r.auth_required).count()
    }
}
