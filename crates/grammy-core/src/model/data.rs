//! Storage settings (table and backup bucket)

use serde::{Deserialize, Serialize};

/// Key-value table shared by all handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub name: String,
    pub partition_key: String,
    pub sort_key: Option<String>,
    pub point_in_time_recovery: bool,
}

impl TableConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            partition_key: "PK".to_string(),
            sort_key: Some("SK".to_string()),
            point_in_time_recovery: true,
        }
    }
}

/// Storage class transition of the backup lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub storage_class: String,
    pub after_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupBucketConfig {
    pub versioned: bool,
    pub transitions: Vec<Transition>,
    pub expire_after_days: Option<u32>,
}

impl Default for BackupBucketConfig {
    fn default() -> Self {
        Self {
            versioned: true,
            transitions: vec![
                Transition {
                    storage_class: "INFREQUENT_ACCESS".to_string(),
                    after_days: 30,
                },
                Transition {
                    storage_class: "GLACIER".to_string(),
                    after_days: 90,
                },
            ],
            expire_after_days: Some(365),
        }
    }
}
