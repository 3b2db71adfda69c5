//! Sync task dispatcher.
//!
//! Packages reconciliation results into opaque task payloads and hands
//! them to the external task runner. The dispatcher never interprets
//! diff content and never retries; retry policy, if any, belongs to
//! the runner.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use stencil_core::{ParentId, TaskId};

use crate::collab::TaskRunner;
use crate::error::{SyncError, SyncResult};
use crate::types::{ParentDiff, SyncTaskItem};

/// Submits assembled sync tasks to the task runner.
#[derive(Clone)]
pub struct TaskDispatcher {
    runner: Arc<dyn TaskRunner>,
}

impl TaskDispatcher {
    /// Create a dispatcher over a task runner.
    #[must_use]
    pub fn new(runner: Arc<dyn TaskRunner>) -> Self {
        Self { runner }
    }

    /// Package one or more reconciliation results into a single task
    /// and submit it under the given grouping key.
    ///
    /// Each diff entry becomes one [`SyncTaskItem`] carrying the parent
    /// snapshot and ancestry path, so the runner can apply the change
    /// without a second lookup. Returns the runner-assigned task id;
    /// submission failure is surfaced verbatim.
    pub async fn dispatch(
        &self,
        kind: &str,
        group_key: ParentId,
        results: &[ParentDiff],
    ) -> SyncResult<TaskId> {
        let assembled_at = Utc::now();
        let mut payload = Vec::new();
        for result in results {
            for entry in &result.entries {
                let item = SyncTaskItem {
                    parent: result.parent.clone(),
                    entry: entry.clone(),
                    path: result.path.clone(),
                    created_at: assembled_at,
                };
                // SyncTaskItem serialization cannot fail: every field
                // serializes infallibly.
                let value = serde_json::to_value(&item)
                    .unwrap_or(serde_json::Value::Null);
                payload.push(value);
            }
        }

        debug!(
            kind = kind,
            group_key = %group_key,
            items = payload.len(),
            "submitting sync task"
        );

        let task_id = self
            .runner
            .submit(kind, group_key, payload)
            .await
            .map_err(|source| {
                error!(kind = kind, group_key = %group_key, error = %source,
                    "sync task submission failed");
                SyncError::Dispatch {
                    parent: group_key,
                    source,
                }
            })?;

        info!(
            kind = kind,
            group_key = %group_key,
            task_id = %task_id,
            "dispatched sync task"
        );
        Ok(task_id)
    }
}
