//! Resource records and the API routing seam

use crate::error::{CloudError, Result};
use grammy_core::{AuthorizationMode, HandlerRef, HttpMethod};
use serde::{Deserialize, Serialize};

/// Provider name recorded on every resource
pub const PROVIDER: &str = "aws";

/// Configuration of one managed resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Resource type (e.g. "function", "api-resource")
    pub resource_type: String,

    /// Resource identifier, unique per type
    pub id: String,

    pub provider: String,

    /// Keys (`type:id`) of resources this one refers to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Resource-specific configuration
    pub config: serde_json::Value,
}

impl ResourceConfig {
    pub fn new(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        config: serde_json::Value,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            provider: PROVIDER.to_string(),
            depends_on: Vec::new(),
            config,
        }
    }

    pub fn depends_on(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !self.depends_on.contains(&key) {
            self.depends_on.push(key);
        }
        self
    }

    /// Full resource key (type:id)
    pub fn key(&self) -> String {
        resource_key(&self.resource_type, &self.id)
    }

    /// Configuration value as a specific type
    pub fn get_config<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.config
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

pub fn resource_key(resource_type: &str, id: &str) -> String {
    format!("{}:{}", resource_type, id)
}

/// Resources of one stack, in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceSet {
    resources: Vec<ResourceConfig>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource; a second resource with the same key is rejected
    pub fn add(&mut self, resource: ResourceConfig) -> Result<()> {
        if self.contains(&resource.resource_type, &resource.id) {
            return Err(CloudError::ResourceAlreadyExists(resource.key()));
        }
        self.resources.push(resource);
        Ok(())
    }

    pub fn get(&self, resource_type: &str, id: &str) -> Option<&ResourceConfig> {
        self.resources
            .iter()
            .find(|r| r.resource_type == resource_type && r.id == id)
    }

    pub fn contains(&self, resource_type: &str, id: &str) -> bool {
        self.get(resource_type, id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceConfig> {
        self.resources.iter()
    }

    pub fn by_type(&self, resource_type: &str) -> Vec<&ResourceConfig> {
        self.resources
            .iter()
            .filter(|r| r.resource_type == resource_type)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// A path node of the API, excluding the root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResource {
    /// Full path, also the resource id (e.g. "/songs/{id}")
    pub path: String,

    /// Last segment of the path
    pub path_part: String,

    /// Full path of the parent; "/" for children of the root
    pub parent: String,
}

/// A method bound on an API path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMethod {
    pub path: String,
    pub method: HttpMethod,
    pub handler: HandlerRef,
    /// Physical function name the integration invokes
    pub function: String,
    pub proxy_integration: bool,
    pub api_key_required: bool,
    pub authorization: AuthorizationMode,
    pub authorizer: Option<String>,
}

/// Receiver of the resolved route table
///
/// The emitter hands every non-root path node to `add_resource`, parents
/// before children, then every binding of that node to `add_method`.
pub trait RoutingProvider {
    fn add_resource(&mut self, resource: ApiResource) -> Result<()>;

    fn add_method(&mut self, method: ApiMethod) -> Result<()>;
}

impl RoutingProvider for ResourceSet {
    fn add_resource(&mut self, resource: ApiResource) -> Result<()> {
        let mut record = ResourceConfig::new(
            "api-resource",
            resource.path.clone(),
            serde_json::json!({
                "path_part": resource.path_part,
                "parent": resource.parent,
            }),
        );
        if resource.parent != "/" {
            record = record.depends_on(resource_key("api-resource", &resource.parent));
        }
        self.add(record)
    }

    fn add_method(&mut self, method: ApiMethod) -> Result<()> {
        let id = format!("{} {}", method.method, method.path);
        let mut record = ResourceConfig::new("api-method", id, serde_json::to_value(&method)?)
            .depends_on(resource_key("function", &method.function));
        if method.path != "/" {
            record = record.depends_on(resource_key("api-resource", &method.path));
        }
        if let Some(authorizer) = &method.authorizer {
            record = record.depends_on(resource_key("authorizer", authorizer));
        }
        self.add(record)
    }
}
