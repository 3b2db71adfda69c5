//! Resource fetcher.
//!
//! Thin layer over the instance store that attaches request context to
//! collaborator failures and owns the input-validation rules: a
//! requested parent set must fully resolve, and a templated parent
//! must have at least one resolvable child.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::error;

use stencil_core::{
    AttributeId, ChildResource, ParentId, ParentResource, ScopeId, Template, TemplateGroupId,
};

use crate::collab::InstanceStore;
use crate::error::{SyncError, SyncResult};
use crate::types::AttributeDiff;

/// Loads template definitions, attribute overrides and live records
/// for a reconciliation scope.
#[derive(Clone)]
pub struct ResourceFetcher {
    store: Arc<dyn InstanceStore>,
}

impl ResourceFetcher {
    /// Create a fetcher over an instance store.
    #[must_use]
    pub fn new(store: Arc<dyn InstanceStore>) -> Self {
        Self { store }
    }

    /// List the templates of a template group.
    pub async fn list_templates(
        &self,
        scope: ScopeId,
        group: TemplateGroupId,
    ) -> SyncResult<Vec<Template>> {
        self.store
            .list_templates(scope, group)
            .await
            .map_err(|source| {
                error!(scope = %scope, group = %group, error = %source, "list templates failed");
                SyncError::Collaborator {
                    scope,
                    group,
                    parent: None,
                    source,
                }
            })
    }

    /// Fetch exactly one live parent record.
    pub async fn get_parent(
        &self,
        scope: ScopeId,
        group: TemplateGroupId,
        parent: ParentId,
    ) -> SyncResult<ParentResource> {
        let mut parents = self
            .store
            .list_parents(scope, group, &[parent])
            .await
            .map_err(|source| {
                error!(scope = %scope, group = %group, parent = %parent, error = %source,
                    "get parent failed");
                SyncError::Collaborator {
                    scope,
                    group,
                    parent: Some(parent),
                    source,
                }
            })?;

        if parents.len() != 1 {
            error!(scope = %scope, group = %group, parent = %parent, resolved = parents.len(),
                "parent did not resolve to exactly one record");
            return Err(SyncError::ParentResolution {
                requested: 1,
                resolved: parents.len(),
            });
        }
        Ok(parents.remove(0))
    }

    /// List live parents of a template group.
    ///
    /// The requested identity set is deduplicated (order-preserving)
    /// before the query; if fewer live parents resolve than were
    /// requested, that is caller input error, not a partial result. An
    /// empty request means "all parents of this group" and is exempt
    /// from count validation.
    pub async fn list_parents(
        &self,
        scope: ScopeId,
        group: TemplateGroupId,
        parents: &[ParentId],
    ) -> SyncResult<Vec<ParentResource>> {
        let unique = dedup_preserving_order(parents);
        let resolved = self
            .store
            .list_parents(scope, group, &unique)
            .await
            .map_err(|source| {
                error!(scope = %scope, group = %group, error = %source, "list parents failed");
                SyncError::Collaborator {
                    scope,
                    group,
                    parent: None,
                    source,
                }
            })?;

        if !unique.is_empty() && resolved.len() != unique.len() {
            error!(scope = %scope, group = %group, requested = unique.len(),
                resolved = resolved.len(), "some requested parents did not resolve");
            return Err(SyncError::ParentResolution {
                requested: unique.len(),
                resolved: resolved.len(),
            });
        }
        Ok(resolved)
    }

    /// List the live children of one parent.
    ///
    /// Zero children under a templated parent is an inconsistent state
    /// in this design, reported as [`SyncError::EmptyChildren`].
    pub async fn list_children(
        &self,
        scope: ScopeId,
        group: TemplateGroupId,
        parent: ParentId,
    ) -> SyncResult<Vec<ChildResource>> {
        let children = self
            .store
            .list_children(scope, group, parent)
            .await
            .map_err(|source| {
                error!(scope = %scope, group = %group, parent = %parent, error = %source,
                    "list children failed");
                SyncError::Collaborator {
                    scope,
                    group,
                    parent: Some(parent),
                    source,
                }
            })?;

        if children.is_empty() {
            error!(scope = %scope, group = %group, parent = %parent,
                "templated parent has no resolvable children");
            return Err(SyncError::EmptyChildren { parent });
        }
        Ok(children)
    }

    /// Assemble the attribute-level diff for one parent.
    ///
    /// Resolves the template group's declared overrides, keeps only the
    /// ones bound to an editable property key, and reads the observed
    /// value out of the parent's property bag (absent means `Null`).
    /// Zero overrides or zero editable keys is a valid "nothing to
    /// diff" outcome, not an error.
    pub async fn attribute_diffs(
        &self,
        scope: ScopeId,
        group: TemplateGroupId,
        parent: &ParentResource,
    ) -> SyncResult<Vec<AttributeDiff>> {
        let overrides = self
            .store
            .list_template_attributes(scope, group)
            .await
            .map_err(|source| {
                error!(scope = %scope, group = %group, error = %source,
                    "list template attributes failed");
                SyncError::Collaborator {
                    scope,
                    group,
                    parent: Some(parent.id),
                    source,
                }
            })?;
        if overrides.is_empty() {
            return Ok(Vec::new());
        }

        let attribute_ids: Vec<AttributeId> =
            overrides.iter().map(|o| o.attribute_id).collect();
        let keys = self
            .store
            .editable_attribute_keys(&attribute_ids)
            .await
            .map_err(|source| {
                error!(scope = %scope, group = %group, error = %source,
                    "resolve editable attribute keys failed");
                SyncError::Collaborator {
                    scope,
                    group,
                    parent: Some(parent.id),
                    source,
                }
            })?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut diffs = Vec::with_capacity(overrides.len());
        for declared in overrides {
            // Non-editable overrides resolve no key and are excluded.
            let Some(key) = keys.get(&declared.attribute_id) else {
                continue;
            };
            let observed = parent
                .properties
                .get(key)
                .cloned()
                .unwrap_or(serde_json::Value::Null);
            diffs.push(AttributeDiff {
                attribute_id: declared.attribute_id,
                template_value: declared.value,
                instance_value: observed,
            });
        }
        Ok(diffs)
    }
}

/// Deduplicate parent identities while keeping first-seen order.
pub(crate) fn dedup_preserving_order(parents: &[ParentId]) -> Vec<ParentId> {
    let mut seen = HashSet::with_capacity(parents.len());
    parents
        .iter()
        .copied()
        .filter(|p| seen.insert(*p))
        .collect()
}
