//! Strongly Typed Identifiers
//!
//! Type-safe identifier types for stencil resources. The underlying
//! storage layer keys every record by a signed 64-bit integer; the
//! newtype pattern prevents accidental misuse of different ID kinds at
//! compile time.
//!
//! # Example
//!
//! ```
//! use stencil_core::{ParentId, TemplateId};
//!
//! let parent = ParentId::new(20);
//! let template = TemplateId::new(3);
//!
//! // Type safety: cannot pass a TemplateId where a ParentId is expected
//! fn requires_parent(id: ParentId) -> String {
//!     id.to_string()
//! }
//!
//! let rendered = requires_parent(parent);
//! // requires_parent(template); // This would not compile!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Error type for ID parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse
    pub id_type: &'static str,
    /// The underlying integer parse error message
    pub message: String,
}

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse {}: {}", self.id_type, self.message)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to define a strongly-typed numeric ID type.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// The zero sentinel, meaning "no such resource".
            pub const NONE: Self = Self(0);

            /// Creates an ID from a raw storage identity.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the underlying storage identity.
            #[must_use]
            pub const fn as_i64(self) -> i64 {
                self.0
            }

            /// Whether this is the zero sentinel.
            #[must_use]
            pub const fn is_none(self) -> bool {
                self.0 == 0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                s.parse::<i64>().map(Self).map_err(|e| ParseIdError {
                    id_type: stringify!($name),
                    message: e.to_string(),
                })
            }
        }
    };
}

define_id!(
    /// Identifier of a scope (the business or environment a
    /// reconciliation request operates in). Every collaborator call is
    /// qualified by a scope.
    ScopeId
);

define_id!(
    /// Identifier of a template group: the named desired-state bundle a
    /// parent resource was instantiated from.
    TemplateGroupId
);

define_id!(
    /// Identifier of a single template inside a group. A diff entry with
    /// `TemplateId::NONE` describes a live child no template accounts
    /// for.
    TemplateId
);

define_id!(
    /// Identifier of a parent (container) resource.
    ParentId
);

define_id!(
    /// Identifier of a live child resource. A diff entry with
    /// `ChildId::NONE` describes a template with no live counterpart.
    ChildId
);

define_id!(
    /// Identifier of an attribute definition on the parent model.
    AttributeId
);

/// Identity of a dispatched sync task, assigned by the task runner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps a runner-assigned task identity.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = ParentId::new(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!("42".parse::<ParentId>().unwrap(), id);
    }

    #[test]
    fn test_id_parse_failure() {
        let err = "not-a-number".parse::<TemplateId>().unwrap_err();
        assert_eq!(err.id_type, "TemplateId");
    }

    #[test]
    fn test_zero_sentinel() {
        assert!(ChildId::NONE.is_none());
        assert!(TemplateId::default().is_none());
        assert!(!ChildId::new(100).is_none());
    }

    #[test]
    fn test_serde_transparent() {
        let id = TemplateGroupId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let back: TemplateGroupId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_task_id() {
        let id = TaskId::new("task-a1b2");
        assert_eq!(id.as_str(), "task-a1b2");
        assert_eq!(id.to_string(), "task-a1b2");
    }
}
