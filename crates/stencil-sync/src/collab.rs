//! Collaborator contracts
//!
//! Narrow async trait contracts for the external services the engine
//! consumes: the generic instance store, the topology-tree lookup
//! service and the asynchronous task runner. Transport is out of
//! scope; implementations wrap whatever client the deployment uses.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use stencil_core::{
    AttributeId, ChildResource, ParentId, ParentResource, PathNode, ResourceKind, ScopeId, TaskId,
    Template, TemplateAttribute, TemplateGroupId,
};

/// Result type for collaborator calls.
pub type CollabResult<T> = Result<T, CollabError>;

/// Errors reported by external collaborators.
///
/// Messages are opaque to the engine; they are propagated verbatim
/// (with request context attached one layer up) and never retried
/// here.
#[derive(Debug, Error)]
pub enum CollabError {
    /// Instance store error.
    #[error("instance store error: {0}")]
    Store(String),

    /// Topology service error.
    #[error("topology service error: {0}")]
    Topology(String),

    /// Task runner error.
    #[error("task runner error: {0}")]
    TaskRunner(String),
}

/// Read access to the generic instance store.
///
/// All queries are scope-qualified. Count and emptiness validation is
/// deliberately not done at this layer; the fetcher owns those rules.
#[async_trait]
pub trait InstanceStore: Send + Sync {
    /// List the templates belonging to a template group.
    async fn list_templates(
        &self,
        scope: ScopeId,
        group: TemplateGroupId,
    ) -> CollabResult<Vec<Template>>;

    /// List live parents instantiated from a template group.
    ///
    /// An empty `parents` filter means "all parents of this group".
    async fn list_parents(
        &self,
        scope: ScopeId,
        group: TemplateGroupId,
        parents: &[ParentId],
    ) -> CollabResult<Vec<ParentResource>>;

    /// List the live children of one parent under a template group.
    async fn list_children(
        &self,
        scope: ScopeId,
        group: TemplateGroupId,
        parent: ParentId,
    ) -> CollabResult<Vec<ChildResource>>;

    /// List the declared attribute overrides of a template group.
    async fn list_template_attributes(
        &self,
        scope: ScopeId,
        group: TemplateGroupId,
    ) -> CollabResult<Vec<TemplateAttribute>>;

    /// Resolve attribute identities to the property keys they bind to.
    ///
    /// Only attributes flagged editable appear in the result map;
    /// non-editable identities are silently excluded.
    async fn editable_attribute_keys(
        &self,
        attributes: &[AttributeId],
    ) -> CollabResult<HashMap<AttributeId, String>>;
}

/// Ancestry lookup against the topology tree.
#[async_trait]
pub trait TopologyService: Send + Sync {
    /// Resolve the ancestry path of a resource, ordered root first.
    async fn ancestry_path(
        &self,
        scope: ScopeId,
        kind: ResourceKind,
        id: i64,
    ) -> CollabResult<Vec<PathNode>>;
}

/// Hand-off to the asynchronous task-execution service.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// Submit a task payload for later execution and return the
    /// identity the runner assigned to it.
    ///
    /// The payload is opaque at this seam; the runner interprets it.
    async fn submit(
        &self,
        kind: &str,
        group_key: ParentId,
        payload: Vec<serde_json::Value>,
    ) -> CollabResult<TaskId>;
}
