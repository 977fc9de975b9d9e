//! Static frontend (bucket + distribution) settings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Directory of the built frontend assets
    pub asset_path: String,

    /// Public domain of the distribution, used for CORS
    pub domain: Option<String>,

    pub root_object: String,

    /// Serve the root object for 403/404 so client side routing works
    pub spa_fallback: bool,

    /// Name of the global the runtime config script assigns
    pub config_global: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            asset_path: "../../frontend/dist".to_string(),
            domain: None,
            root_object: "index.html".to_string(),
            spa_fallback: true,
            config_global: "__GRAMMY_CONFIG__".to_string(),
        }
    }
}
