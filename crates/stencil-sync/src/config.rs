//! Sync engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the sync engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Maximum number of in-flight per-parent diff workers during bulk
    /// reconciliation.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Task kind under which sync tasks are submitted to the runner.
    #[serde(default = "default_task_kind")]
    pub task_kind: String,
}

fn default_concurrency() -> usize {
    10
}

fn default_task_kind() -> String {
    "template_sync".to_string()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            task_kind: default_task_kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_config_default() {
        let config = SyncConfig::default();
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.task_kind, "template_sync");
    }

    #[test]
    fn test_sync_config_serde_defaults() {
        let config: SyncConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.concurrency, 10);

        let config: SyncConfig = serde_json::from_str(r#"{"concurrency": 4}"#).unwrap();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.task_kind, "template_sync");
    }
}
