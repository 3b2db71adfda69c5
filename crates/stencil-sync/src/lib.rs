//! # Stencil Sync Engine
//!
//! Desired-state / actual-state reconciliation for hierarchical
//! resource templates: a template group (the desired shape of a
//! parent's children) is compared against the live children attached
//! to that parent, producing a structured diff that can be converted
//! into asynchronous sync tasks.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────┐     ┌────────────────┐
//! │ Resource Fetcher │────►│ Diff Engine  │────►│  Orchestrator  │
//! │ (instance store) │     │ (pure logic) │     │ (fan-out, ≤N)  │
//! └──────────────────┘     └──────────────┘     └───────┬────────┘
//!          ▲                                            │
//!          │               ┌──────────────┐     ┌───────▼────────┐
//!          └───────────────┤    Status    │     │   Dispatcher   │
//!                          │  Aggregator  │     │ (task runner)  │
//!                          └──────────────┘     └────────────────┘
//! ```
//!
//! Storage, topology lookup, attribute metadata and task execution are
//! external collaborators behind the [`collab`] trait contracts. The
//! engine only reads; writes to live state happen indirectly through
//! dispatched sync tasks, which this crate assembles but never
//! executes.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use stencil_core::{ParentId, ScopeId, TemplateGroupId};
//! use stencil_sync::TemplateSyncEngine;
//!
//! let engine = TemplateSyncEngine::new(store, topology, runner);
//!
//! // One parent: full diff with ancestry path and need-sync verdict.
//! let diff = engine
//!     .diff_one(ScopeId::new(2), TemplateGroupId::new(30), ParentId::new(20))
//!     .await?;
//!
//! // Many parents: bounded fan-out, one sync task per clean parent.
//! engine
//!     .reconcile_many(ScopeId::new(2), TemplateGroupId::new(30), &parent_ids)
//!     .await?;
//! ```

pub mod collab;
pub mod config;
pub mod diff;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod status;
pub mod types;

// Re-exports for convenience
pub use collab::{CollabError, CollabResult, InstanceStore, TaskRunner, TopologyService};
pub use config::SyncConfig;
pub use diff::{diff_templates_with_children, need_sync};
pub use dispatcher::TaskDispatcher;
pub use engine::TemplateSyncEngine;
pub use error::{SyncError, SyncResult};
pub use fetcher::ResourceFetcher;
pub use types::{
    AttributeDiff, DiffEntry, DiffKind, ParentDiff, ParentSyncStatus, SyncTaskItem,
    TemplateSyncStatus,
};
