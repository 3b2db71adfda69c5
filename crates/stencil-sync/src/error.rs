//! Sync engine error types.

use thiserror::Error;

use stencil_core::{ParentId, ScopeId, TemplateGroupId};

use crate::collab::CollabError;

/// Result type for sync engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur while diffing or synchronizing.
///
/// Nothing here is fatal to the process; every failure is scoped to a
/// single reconciliation request. Retry policy belongs to the caller
/// or the collaborator, never to this layer.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A collaborator call failed; the underlying error is surfaced
    /// verbatim with the request context attached for diagnosis.
    #[error(
        "collaborator call failed (scope {scope}, template group {group}{}): {source}",
        parent.map(|p| format!(", parent {p}")).unwrap_or_default()
    )]
    Collaborator {
        /// Scope the request operated in.
        scope: ScopeId,
        /// Template group being reconciled.
        group: TemplateGroupId,
        /// Parent the call was about, when the call was parent-scoped.
        parent: Option<ParentId>,
        /// The collaborator's error.
        #[source]
        source: CollabError,
    },

    /// A requested parent identity set did not fully resolve. This is
    /// caller input error, not a partial result.
    #[error("requested {requested} parent(s) but only {resolved} resolved")]
    ParentResolution {
        /// Number of distinct parent identities requested.
        requested: usize,
        /// Number of live parents the store returned.
        resolved: usize,
    },

    /// A templated parent resolved zero live children, which is an
    /// inconsistent state in this design rather than "no children".
    #[error("parent {parent} has no resolvable child resources")]
    EmptyChildren {
        /// The parent whose children query came back empty.
        parent: ParentId,
    },

    /// Submitting a sync task to the task runner failed.
    #[error("failed to dispatch sync task for parent {parent}: {source}")]
    Dispatch {
        /// The parent the task was grouped under.
        parent: ParentId,
        /// The task runner's error.
        #[source]
        source: CollabError,
    },

    /// A fan-out worker did not settle (it panicked or was aborted).
    #[error("reconciliation worker for parent {parent} did not settle: {message}")]
    Worker {
        /// The parent the worker was diffing.
        parent: ParentId,
        /// Join failure description.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_error_context() {
        let err = SyncError::Collaborator {
            scope: ScopeId::new(2),
            group: TemplateGroupId::new(30),
            parent: Some(ParentId::new(20)),
            source: CollabError::Store("connection reset".to_string()),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("scope 2"));
        assert!(rendered.contains("template group 30"));
        assert!(rendered.contains("parent 20"));
        assert!(rendered.contains("connection reset"));
    }

    #[test]
    fn test_parent_resolution_message() {
        let err = SyncError::ParentResolution {
            requested: 3,
            resolved: 1,
        };
        assert_eq!(err.to_string(), "requested 3 parent(s) but only 1 resolved");
    }
}
