//! Stack manifest
//!
//! The manifest is the document the provisioning engine consumes: three
//! stacks of resource records with their dependencies and exported outputs.
//!
//! ```text
//! <Project>DataStack      table, backup bucket
//!        ▲
//! <Project>BackendStack   user pool, authorizer, functions, REST API, routes
//!        ▲
//! <Project>FrontendStack  asset bucket, distribution, runtime config
//! ```
//!
//! Values produced by another resource are references rather than literals:
//! `{"ref": "<type>:<id>", "attr": "<attribute>"}` inside a stack and
//! `{"import": "<export name>"}` across stacks.

use crate::error::Result;
use crate::provider::{ResourceConfig, ResourceSet, resource_key};
use crate::routing::emit_routes;
use grammy_core::{LoadedProject, MfaMode, Project};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Methods answered by the CORS preflight
const CORS_METHODS: [&str; 6] = ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"];

/// Exported value of a stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Name other stacks import the value by
    pub export_name: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    pub name: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    pub resources: ResourceSet,
    #[serde(default)]
    pub outputs: BTreeMap<String, Output>,
}

impl Stack {
    fn new(name: String) -> Self {
        Self {
            name,
            depends_on: Vec::new(),
            resources: ResourceSet::new(),
            outputs: BTreeMap::new(),
        }
    }

    fn export(&mut self, logical: &str, export_name: String, value: Value) {
        self.outputs.insert(
            logical.to_string(),
            Output {
                export_name,
                value,
            },
        );
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub project: String,
    pub stage: String,
    pub stacks: Vec<Stack>,
}

impl Manifest {
    /// Build the manifest of a loaded project
    #[tracing::instrument(skip(loaded), fields(project = %loaded.project.name))]
    pub fn from_loaded(loaded: &LoadedProject) -> Result<Self> {
        let project = &loaded.project;
        let names = Names::new(&project.name);

        let data = data_stack(project, &names)?;
        let backend = backend_stack(loaded, &names, &data.name)?;
        let mut stacks = vec![data];
        let frontend = project
            .frontend
            .as_ref()
            .map(|_| frontend_stack(project, &names, &backend.name))
            .transpose()?;
        stacks.push(backend);
        stacks.extend(frontend);

        info!(
            stacks = stacks.len(),
            resources = stacks.iter().map(|s| s.resources.len()).sum::<usize>(),
            "Manifest built"
        );

        Ok(Self {
            project: project.name.clone(),
            stage: project.api.stage.clone(),
            stacks,
        })
    }

    pub fn stack(&self, name: &str) -> Option<&Stack> {
        self.stacks.iter().find(|s| s.name == name)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()? + "\n")?;
        debug!(path = %path.display(), "Manifest written");
        Ok(())
    }
}

/// Resource and export names derived from the project name
struct Names {
    project: String,
    pascal: String,
}

impl Names {
    fn new(project: &str) -> Self {
        Self {
            project: project.to_string(),
            pascal: pascal_case(project),
        }
    }

    fn stack(&self, kind: &str) -> String {
        format!("{}{}Stack", self.pascal, kind)
    }

    /// Resource ids and export names: "<project>-<suffix>"
    fn scoped(&self, suffix: &str) -> String {
        format!("{}-{}", self.project, suffix)
    }
}

/// "song-book" → "SongBook"
fn pascal_case(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn attr(resource_type: &str, id: &str, attribute: &str) -> Value {
    json!({ "ref": resource_key(resource_type, id), "attr": attribute })
}

fn import(export_name: &str) -> Value {
    json!({ "import": export_name })
}

fn data_stack(project: &Project, names: &Names) -> Result<Stack> {
    let mut stack = Stack::new(names.stack("Data"));

    if let Some(table) = &project.table {
        stack.resources.add(ResourceConfig::new(
            "table",
            table.name.clone(),
            json!({
                "partition_key": table.partition_key,
                "sort_key": table.sort_key,
                "billing_mode": "PAY_PER_REQUEST",
                "point_in_time_recovery": table.point_in_time_recovery,
            }),
        ))?;
        stack.export(
            "TableName",
            names.scoped("table-name"),
            attr("table", &table.name, "name"),
        );
        stack.export(
            "TableArn",
            names.scoped("table-arn"),
            attr("table", &table.name, "arn"),
        );
    }

    if let Some(bucket) = &project.backup_bucket {
        let id = names.scoped("backup");
        stack.resources.add(ResourceConfig::new(
            "bucket",
            id.clone(),
            json!({
                "versioned": bucket.versioned,
                "block_public_access": true,
                "encryption": "S3_MANAGED",
                "lifecycle": {
                    "transitions": bucket.transitions,
                    "expire_after_days": bucket.expire_after_days,
                },
            }),
        ))?;
        stack.export(
            "BackupBucketName",
            names.scoped("backup-bucket-name"),
            attr("bucket", &id, "name"),
        );
    }

    Ok(stack)
}

fn backend_stack(loaded: &LoadedProject, names: &Names, data_stack: &str) -> Result<Stack> {
    let project = &loaded.project;
    let mut stack = Stack::new(names.stack("Backend"));
    stack.depends_on.push(data_stack.to_string());

    if let (Some(pool), Some(auth)) = (&project.user_pool, project.authorization_context()) {
        let client = format!("{}-client", pool.name);
        let sign_in_aliases: Vec<&str> = if pool.email_sign_in {
            vec!["email"]
        } else {
            Vec::new()
        };
        stack.resources.add(ResourceConfig::new(
            "user-pool",
            pool.name.clone(),
            json!({
                "self_sign_up": pool.self_sign_up,
                "sign_in_aliases": sign_in_aliases,
                "mfa": pool.mfa,
                "mfa_second_factor": {
                    "otp": pool.otp && pool.mfa != MfaMode::Off,
                    "sms": false,
                },
            }),
        ))?;
        stack.resources.add(
            ResourceConfig::new(
                "user-pool-client",
                client.clone(),
                json!({
                    "user_pool": attr("user-pool", &pool.name, "id"),
                    "auth_flows": ["USER_PASSWORD", "USER_SRP"],
                    "generate_secret": false,
                    "token_validity_hours": {
                        "id": pool.token_validity_hours,
                        "access": pool.token_validity_hours,
                        "refresh": pool.token_validity_hours,
                    },
                }),
            )
            .depends_on(resource_key("user-pool", &pool.name)),
        )?;
        stack.resources.add(
            ResourceConfig::new(
                "authorizer",
                auth.name.clone(),
                json!({
                    "type": auth.mode,
                    "user_pool": attr("user-pool", &auth.user_pool, "arn"),
                    "identity_source": auth.identity_source,
                }),
            )
            .depends_on(resource_key("user-pool", &pool.name)),
        )?;
        stack.export(
            "UserPoolId",
            names.scoped("user-pool-id"),
            attr("user-pool", &pool.name, "id"),
        );
        stack.export(
            "UserPoolClientId",
            names.scoped("user-pool-client-id"),
            attr("user-pool-client", &client, "id"),
        );
    }

    for handler in project.handlers.values() {
        let mut environment = serde_json::Map::new();
        let mut permissions = Vec::new();
        if project.table.is_some() {
            environment.insert("TABLE_NAME".to_string(), import(&names.scoped("table-name")));
            permissions.push(json!({
                "action": "table:read-write",
                "resource": import(&names.scoped("table-arn")),
            }));
        }

        stack.resources.add(ResourceConfig::new(
            "function",
            handler.qualified_name(&project.name),
            json!({
                "handler": handler.name,
                "runtime": handler.runtime,
                "entrypoint": handler.entrypoint,
                "code_path": handler.code_path,
                "timeout_secs": handler.timeout_secs,
                "memory_mb": handler.memory_mb,
                "environment": environment,
                "permissions": permissions,
            }),
        ))?;
    }

    let api = names.scoped("api");
    let domain = project.frontend.as_ref().and_then(|f| f.domain.as_deref());
    stack.resources.add(ResourceConfig::new(
        "rest-api",
        api.clone(),
        json!({
            "stage": project.api.stage,
            "cors": {
                "allow_origins": project.api.allowed_origins(domain),
                "allow_headers": project.api.cors_headers,
                "allow_methods": CORS_METHODS,
            },
            "logging": project.api.logging,
            "metrics": project.api.metrics,
            "root_resource": "/",
        }),
    ))?;

    let methods = emit_routes(&loaded.routes, project, &mut stack.resources)?;
    debug!(methods, "Routes emitted");

    stack.export("ApiUrl", names.scoped("api-url"), attr("rest-api", &api, "url"));

    Ok(stack)
}

fn frontend_stack(project: &Project, names: &Names, backend_stack: &str) -> Result<Stack> {
    let mut stack = Stack::new(names.stack("Frontend"));
    stack.depends_on.push(backend_stack.to_string());
    let Some(frontend) = &project.frontend else {
        return Ok(stack);
    };

    let bucket = names.scoped("frontend-assets");
    let distribution = names.scoped("distribution");

    stack.resources.add(ResourceConfig::new(
        "bucket",
        bucket.clone(),
        json!({
            "block_public_access": true,
            "encryption": "S3_MANAGED",
        }),
    ))?;

    let error_responses: Vec<Value> = if frontend.spa_fallback {
        [403, 404]
            .into_iter()
            .map(|status| {
                json!({
                    "status": status,
                    "response_status": 200,
                    "response_page": format!("/{}", frontend.root_object),
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    stack.resources.add(
        ResourceConfig::new(
            "distribution",
            distribution.clone(),
            json!({
                "origin": resource_key("bucket", &bucket),
                "domain": frontend.domain,
                "root_object": frontend.root_object,
                "viewer_protocol": "redirect-to-https",
                "error_responses": error_responses,
            }),
        )
        .depends_on(resource_key("bucket", &bucket)),
    )?;

    let mut values = serde_json::Map::new();
    values.insert(
        "API_URL".to_string(),
        json!({ "import": names.scoped("api-url"), "trim_end": "/" }),
    );
    if project.user_pool.is_some() {
        values.insert(
            "USER_POOL_ID".to_string(),
            import(&names.scoped("user-pool-id")),
        );
        values.insert(
            "USER_POOL_CLIENT_ID".to_string(),
            import(&names.scoped("user-pool-client-id")),
        );
    }

    stack.resources.add(
        ResourceConfig::new(
            "deployment",
            names.scoped("frontend-deployment"),
            json!({
                "source": frontend.asset_path,
                "destination": resource_key("bucket", &bucket),
                "invalidate": resource_key("distribution", &distribution),
                "runtime_config": {
                    "file": "config.js",
                    "global": frontend.config_global,
                    "values": values,
                },
            }),
        )
        .depends_on(resource_key("bucket", &bucket))
        .depends_on(resource_key("distribution", &distribution)),
    )?;

    stack.export(
        "DistributionDomain",
        names.scoped("distribution-domain"),
        attr("distribution", &distribution, "domain_name"),
    );

    Ok(stack)
}
