//! Reconciliation orchestrator.
//!
//! Entry point for diffing a template group against its live parents
//! and fanning bulk reconciliation out across many parents under a
//! fixed concurrency cap.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use stencil_core::{ChildId, ParentId, ResourceKind, ScopeId, TemplateGroupId};

use crate::collab::{InstanceStore, TaskRunner, TopologyService};
use crate::config::SyncConfig;
use crate::diff;
use crate::dispatcher::TaskDispatcher;
use crate::error::{SyncError, SyncResult};
use crate::fetcher::ResourceFetcher;
use crate::types::{DiffKind, ParentDiff};

/// Orchestrates template/instance diffing and sync task dispatch.
///
/// Cheap to clone; all collaborators live behind `Arc`.
#[derive(Clone)]
pub struct TemplateSyncEngine {
    pub(crate) fetcher: ResourceFetcher,
    pub(crate) topology: Arc<dyn TopologyService>,
    pub(crate) dispatcher: TaskDispatcher,
    pub(crate) config: SyncConfig,
}

impl TemplateSyncEngine {
    /// Create an engine with the default configuration.
    #[must_use]
    pub fn new(
        store: Arc<dyn InstanceStore>,
        topology: Arc<dyn TopologyService>,
        runner: Arc<dyn TaskRunner>,
    ) -> Self {
        Self::with_config(store, topology, runner, SyncConfig::default())
    }

    /// Create an engine with a custom configuration.
    #[must_use]
    pub fn with_config(
        store: Arc<dyn InstanceStore>,
        topology: Arc<dyn TopologyService>,
        runner: Arc<dyn TaskRunner>,
        config: SyncConfig,
    ) -> Self {
        Self {
            fetcher: ResourceFetcher::new(store),
            topology,
            dispatcher: TaskDispatcher::new(runner),
            config,
        }
    }

    /// Get the engine configuration.
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Compute the full reconciliation result for one parent.
    ///
    /// Loads the template set, the parent record, its live children and
    /// its ancestry path, then derives the structural diff, the
    /// attribute diff and the need-sync verdict. Deterministic given
    /// deterministic collaborator responses.
    #[instrument(skip(self))]
    pub async fn diff_one(
        &self,
        scope: ScopeId,
        group: TemplateGroupId,
        parent_id: ParentId,
    ) -> SyncResult<ParentDiff> {
        let templates = self.fetcher.list_templates(scope, group).await?;
        let parent = self.fetcher.get_parent(scope, group, parent_id).await?;
        let children = self.fetcher.list_children(scope, group, parent_id).await?;

        let path = self
            .topology
            .ancestry_path(scope, ResourceKind::Parent, parent_id.as_i64())
            .await
            .map_err(|source| {
                error!(scope = %scope, group = %group, parent = %parent_id, error = %source,
                    "ancestry path lookup failed");
                SyncError::Collaborator {
                    scope,
                    group,
                    parent: Some(parent_id),
                    source,
                }
            })?;

        let entries = diff::diff_templates_with_children(&templates, &children);
        let attributes = self.fetcher.attribute_diffs(scope, group, &parent).await?;
        let need_sync = diff::need_sync(&entries, &attributes);

        debug!(
            scope = %scope,
            group = %group,
            parent = %parent_id,
            entries = entries.len(),
            attributes = attributes.len(),
            need_sync,
            "computed parent diff"
        );

        Ok(ParentDiff {
            parent,
            entries,
            attributes,
            path,
            need_sync,
        })
    }

    /// Reconcile many parents against their template group and dispatch
    /// one sync task per parent that diffed cleanly.
    ///
    /// Fan-out runs one [`diff_one`](Self::diff_one) worker per parent,
    /// never more than `config.concurrency` in flight; a permit is
    /// taken before each spawn, so excess parents wait for a free slot.
    /// Every worker runs to completion before any dispatch happens.
    ///
    /// This is a best-effort batch: one parent's failure does not block
    /// dispatch for parents that succeeded, but if any parent failed,
    /// the first captured error is returned after all work settles.
    #[instrument(skip(self, parents), fields(parents = parents.len()))]
    pub async fn reconcile_many(
        &self,
        scope: ScopeId,
        group: TemplateGroupId,
        parents: &[ParentId],
    ) -> SyncResult<()> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let first_err: Arc<Mutex<Option<SyncError>>> = Arc::new(Mutex::new(None));

        let mut handles: Vec<(ParentId, JoinHandle<Option<ParentDiff>>)> = Vec::new();
        for parent in crate::fetcher::dedup_preserving_order(parents) {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                // The semaphore is never closed.
                Err(_) => break,
            };
            let engine = self.clone();
            let first_err = Arc::clone(&first_err);
            let handle = tokio::spawn(async move {
                // Hold the slot until the diff settles.
                let _permit = permit;
                match engine.diff_one(scope, group, parent).await {
                    Ok(parent_diff) => Some(parent_diff),
                    Err(err) => {
                        error!(scope = %scope, group = %group, parent = %parent, error = %err,
                            "diff failed during bulk reconciliation");
                        let mut slot = first_err.lock().await;
                        if slot.is_none() {
                            *slot = Some(err);
                        }
                        None
                    }
                }
            });
            handles.push((parent, handle));
        }

        // Completion barrier: every worker settles before any dispatch.
        let mut diffs = Vec::with_capacity(handles.len());
        for (parent, handle) in handles {
            match handle.await {
                Ok(Some(parent_diff)) => diffs.push(parent_diff),
                Ok(None) => {}
                Err(join_err) => {
                    error!(parent = %parent, error = %join_err,
                        "reconciliation worker did not settle");
                    let mut slot = first_err.lock().await;
                    if slot.is_none() {
                        *slot = Some(SyncError::Worker {
                            parent,
                            message: join_err.to_string(),
                        });
                    }
                }
            }
        }

        for parent_diff in &diffs {
            let parent = parent_diff.parent.id;
            info!(
                scope = %scope,
                group = %group,
                parent = %parent,
                parent_name = %parent_diff.parent.name,
                need_sync = parent_diff.need_sync,
                "dispatching sync task for parent"
            );
            let dispatched = self
                .dispatcher
                .dispatch(
                    &self.config.task_kind,
                    parent,
                    std::slice::from_ref(parent_diff),
                )
                .await;
            if let Err(err) = dispatched {
                let mut slot = first_err.lock().await;
                if slot.is_none() {
                    *slot = Some(err);
                }
            }
        }

        let captured = first_err.lock().await.take();
        match captured {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Preview which children a sync would remove, per parent.
    ///
    /// The requested parent set must fully resolve. For each parent the
    /// structural diff is reduced to the child identities of its
    /// `removed` entries; parents with nothing to remove map to an
    /// empty list.
    #[instrument(skip(self, parents), fields(parents = parents.len()))]
    pub async fn removed_children(
        &self,
        scope: ScopeId,
        group: TemplateGroupId,
        parents: &[ParentId],
    ) -> SyncResult<HashMap<ParentId, Vec<ChildId>>> {
        let templates = self.fetcher.list_templates(scope, group).await?;
        let resolved = self.fetcher.list_parents(scope, group, parents).await?;

        let mut removed_by_parent = HashMap::with_capacity(resolved.len());
        for parent in resolved {
            let children = self.fetcher.list_children(scope, group, parent.id).await?;
            let removed: Vec<ChildId> = diff::diff_templates_with_children(&templates, &children)
                .into_iter()
                .filter(|entry| entry.kind == DiffKind::Removed)
                .map(|entry| entry.child_id)
                .collect();
            removed_by_parent.insert(parent.id, removed);
        }
        Ok(removed_by_parent)
    }
}
