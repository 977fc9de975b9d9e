//! Template expansion
//!
//! Every KDL file is rendered through Tera before it is parsed, so values
//! can come from `variables { }` blocks, `.env` or the environment.

use crate::error::{GrammyError, Result};
use std::collections::HashMap;
use std::path::Path;
use tera::{Context, Tera};
use tracing::{debug, info};

/// Environment variables with these prefixes are visible to templates
const ALLOWED_ENV_PREFIXES: &[&str] = &["GRAMMY_", "CI_"];

/// Variable context
pub type Variables = HashMap<String, serde_json::Value>;

pub struct TemplateProcessor {
    tera: Tera,
    context: Context,
}

impl TemplateProcessor {
    pub fn new() -> Self {
        Self {
            tera: Tera::default(),
            context: Context::new(),
        }
    }

    pub fn add_variable(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.context.insert(key.into(), &value);
    }

    pub fn add_variables(&mut self, variables: Variables) {
        for (key, value) in variables {
            self.context.insert(key, &value);
        }
    }

    /// Add the environment variables prefixed with `GRAMMY_` or `CI_`
    #[tracing::instrument(skip(self))]
    pub fn add_env_variables(&mut self) {
        let mut count = 0;

        for (key, value) in std::env::vars() {
            if ALLOWED_ENV_PREFIXES
                .iter()
                .any(|prefix| key.starts_with(prefix))
            {
                debug!(key = %key, "Adding environment variable");
                self.context.insert(key, &serde_json::Value::String(value));
                count += 1;
            }
        }

        info!(
            env_var_count = count,
            "Added filtered environment variables"
        );
    }

    /// Add every `KEY=VALUE` line of a `.env` file
    ///
    /// Unlike the process environment, no prefix filter applies.
    #[tracing::instrument(skip(self))]
    pub fn add_env_file_variables(&mut self, env_file_path: &Path) -> Result<()> {
        let content =
            std::fs::read_to_string(env_file_path).map_err(|e| GrammyError::IoError {
                path: env_file_path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut count = 0;
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().trim_start_matches("export ").trim();
                let value = strip_quotes(value.trim());

                debug!(key = %key, "Adding variable from .env file");
                self.context
                    .insert(key, &serde_json::Value::String(value.to_string()));
                count += 1;
            }
        }

        info!(
            env_file = %env_file_path.display(),
            variable_count = count,
            "Loaded variables from .env file"
        );

        Ok(())
    }

    pub fn render_str(&mut self, template: &str) -> Result<String> {
        self.tera
            .render_str(template, &self.context)
            .map_err(|e| GrammyError::TemplateRenderError(tera_error_detail(&e)))
    }

    pub fn render_file(&mut self, path: &Path) -> Result<String> {
        let content = std::fs::read_to_string(path).map_err(|e| GrammyError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        self.render_str(&content).map_err(|e| match e {
            GrammyError::TemplateRenderError(message) => GrammyError::TemplateError {
                file: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }
}

impl Default for TemplateProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect the `variables { ... }` blocks of a KDL file
///
/// The blocks are cut out with a regex and parsed on their own, so template
/// expressions elsewhere in the file do not break extraction. Later blocks
/// win.
pub fn extract_variables(kdl_content: &str) -> Result<Variables> {
    let re = regex::Regex::new(r"(?s)variables\s*\{(?P<content>.*?)\}")
        .map_err(|e| GrammyError::InvalidConfig(format!("invalid variables pattern: {}", e)))?;

    let mut variables = HashMap::new();

    for cap in re.captures_iter(kdl_content) {
        let Some(block) = cap.name("content") else {
            continue;
        };
        let doc: kdl::KdlDocument = block.as_str().parse().map_err(|e| {
            GrammyError::InvalidConfig(format!("KDL parse error in variables block: {}", e))
        })?;

        for var_node in doc.nodes() {
            if let Some(entry) = var_node.entries().first() {
                variables.insert(
                    var_node.name().value().to_string(),
                    kdl_value_to_json(entry.value()),
                );
            }
        }
    }

    Ok(variables)
}

/// `"value"` and `'value'` become `value`
fn strip_quotes(s: &str) -> &str {
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Flatten a Tera error chain, naming the variable when one is undefined
fn tera_error_detail(e: &tera::Error) -> String {
    use std::error::Error;

    let mut details = vec![e.to_string()];
    let mut source = e.source();
    while let Some(err) = source {
        details.push(err.to_string());
        source = err.source();
    }
    let full_error = details.join(" | ");

    if full_error.contains("not found in context")
        && let Some(start) = full_error.find("Variable `")
        && let Some(end) = full_error[start..].find("` not found")
    {
        let var_name = &full_error[start + 10..start + end];
        return format!(
            "undefined variable `{}`\nhint: define it in a variables block or in .env",
            var_name
        );
    }

    full_error
}

fn kdl_value_to_json(value: &kdl::KdlValue) -> serde_json::Value {
    if let Some(s) = value.as_string() {
        serde_json::Value::String(s.to_string())
    } else if let Some(i) = value.as_integer() {
        i64::try_from(i)
            .map(|n| serde_json::Value::Number(n.into()))
            .unwrap_or(serde_json::Value::Null)
    } else if let Some(f) = value.as_float() {
        serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    } else if let Some(b) = value.as_bool() {
        serde_json::Value::Bool(b)
    } else {
        serde_json::Value::Null
    }
}
