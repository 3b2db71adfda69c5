//! Stencil Core Library
//!
//! Shared identifiers and data model for the stencil template engine.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers (`ScopeId`, `TemplateId`, `ParentId`, ...)
//! - [`model`] - Resource records (templates, parents, children, path nodes)
//!
//! # Example
//!
//! ```
//! use stencil_core::{ChildId, ParentId, TemplateId};
//!
//! let parent = ParentId::new(20);
//! let template = TemplateId::new(1);
//!
//! // The zero sentinel marks a diff entry with no live counterpart.
//! assert!(ChildId::NONE.is_none());
//! assert_eq!(parent.as_i64(), 20);
//! assert_ne!(template, TemplateId::NONE);
//! ```

pub mod ids;
pub mod model;

// Re-export main types for convenient access
pub use ids::{
    AttributeId, ChildId, ParentId, ParseIdError, ScopeId, TaskId, TemplateGroupId, TemplateId,
};
pub use model::{
    ChildResource, ParentResource, PathNode, PropertyMap, ResourceKind, Template,
    TemplateAttribute,
};
