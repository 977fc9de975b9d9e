//! REST API settings

use serde::{Deserialize, Serialize};

/// Origin of the local frontend dev server
pub const LOCAL_DEV_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Deployment stage name
    pub stage: String,

    /// Extra CORS origins; the frontend domain is appended at load time
    pub cors_origins: Vec<String>,

    pub cors_headers: Vec<String>,

    pub logging: bool,

    pub metrics: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            stage: "dev".to_string(),
            cors_origins: vec![LOCAL_DEV_ORIGIN.to_string()],
            cors_headers: vec!["Content-Type".to_string(), "Authorization".to_string()],
            logging: true,
            metrics: true,
        }
    }
}

impl ApiSettings {
    /// CORS origins including the frontend domain, without duplicates
    pub fn allowed_origins(&self, frontend_domain: Option<&str>) -> Vec<String> {
        let mut origins = Vec::new();
        if let Some(domain) = frontend_domain {
            origins.push(format!("https://{}", domain));
        }
        for origin in &self.cors_origins {
            if !origins.contains(origin) {
                origins.push(origin.clone());
            }
        }
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_origins_with_domain() {
        let api = ApiSettings::default();
        let origins = api.allowed_origins(Some("d111.cloudfront.net"));
        assert_eq!(
            origins,
            vec!["https://d111.cloudfront.net", "http://localhost:5173"]
        );
    }

    #[test]
    fn test_allowed_origins_dedup() {
        let api = ApiSettings {
            cors_origins: vec![
                "https://app.example.com".to_string(),
                LOCAL_DEV_ORIGIN.to_string(),
            ],
            ..Default::default()
        };
        let origins = api.allowed_origins(Some("app.example.com"));
        assert_eq!(origins.len(), 2);
    }
}
