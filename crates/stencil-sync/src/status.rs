//! Need-sync status aggregation.
//!
//! Lighter-weight than full reconciliation: re-derives the per-parent
//! need-sync boolean through the same diff machinery, but skips the
//! ancestry lookup and never hands diff entries back to the caller.

use tracing::{debug, instrument};

use stencil_core::{ParentResource, ScopeId, Template, TemplateGroupId};

use crate::diff;
use crate::engine::TemplateSyncEngine;
use crate::error::SyncResult;
use crate::types::{ParentSyncStatus, TemplateSyncStatus};

impl TemplateSyncEngine {
    /// Report whether any parent of a template group has drifted.
    ///
    /// Lists all live parents of the group; zero parents is a valid
    /// "nothing is stale" outcome, not an error. The template set is
    /// fetched once and treated as an immutable snapshot for the whole
    /// pass.
    #[instrument(skip(self))]
    pub async fn check_needs_sync(
        &self,
        scope: ScopeId,
        group: TemplateGroupId,
    ) -> SyncResult<TemplateSyncStatus> {
        let parents = self.fetcher.list_parents(scope, group, &[]).await?;
        if parents.is_empty() {
            debug!(scope = %scope, group = %group, "template group has no live parents");
            return Ok(TemplateSyncStatus {
                template_group: group,
                need_sync: false,
                parents: Vec::new(),
            });
        }

        let templates = self.fetcher.list_templates(scope, group).await?;

        let mut statuses = Vec::with_capacity(parents.len());
        let mut any_need_sync = false;
        for parent in &parents {
            let need_sync = self
                .parent_needs_sync(scope, group, &templates, parent)
                .await?;
            any_need_sync = any_need_sync || need_sync;
            statuses.push(ParentSyncStatus {
                parent_id: parent.id,
                need_sync,
            });
        }

        debug!(
            scope = %scope,
            group = %group,
            parents = statuses.len(),
            need_sync = any_need_sync,
            "aggregated need-sync status"
        );

        Ok(TemplateSyncStatus {
            template_group: group,
            need_sync: any_need_sync,
            parents: statuses,
        })
    }

    /// Re-derive the need-sync boolean for one parent without keeping
    /// the diff entries.
    async fn parent_needs_sync(
        &self,
        scope: ScopeId,
        group: TemplateGroupId,
        templates: &[Template],
        parent: &ParentResource,
    ) -> SyncResult<bool> {
        let children = self.fetcher.list_children(scope, group, parent.id).await?;
        let entries = diff::diff_templates_with_children(templates, &children);
        let attributes = self.fetcher.attribute_diffs(scope, group, parent).await?;
        Ok(diff::need_sync(&entries, &attributes))
    }
}
