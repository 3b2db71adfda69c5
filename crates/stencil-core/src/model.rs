//! Resource data model.
//!
//! Records describing desired state (templates and their attribute
//! overrides) and actual state (parent containers and their live
//! children). These are read-only snapshots from the engine's
//! perspective; the instance store owns them and writes happen only
//! indirectly through dispatched sync tasks.

use serde::{Deserialize, Serialize};

use crate::ids::{AttributeId, ChildId, ParentId, TemplateGroupId, TemplateId};

/// Free-form property bag carried by live resources.
pub type PropertyMap = serde_json::Map<String, serde_json::Value>;

/// A desired-state definition for one child resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Template identity.
    pub id: TemplateId,
    /// Template name; a matched child whose name diverges from this is
    /// reported as changed.
    pub name: String,
}

impl Template {
    /// Create a new template record.
    #[must_use]
    pub fn new(id: TemplateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One declared attribute override of a template group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateAttribute {
    /// Attribute identity.
    pub attribute_id: AttributeId,
    /// Desired value for the attribute.
    pub value: serde_json::Value,
}

/// A live child resource (actual state).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildResource {
    /// Child identity.
    pub id: ChildId,
    /// Display name.
    pub name: String,
    /// The parent container this child lives under.
    pub parent_id: ParentId,
    /// The template this child was instantiated from, or
    /// [`TemplateId::NONE`] if it was created by hand.
    pub template_id: TemplateId,
    /// Free-form properties.
    #[serde(default)]
    pub properties: PropertyMap,
}

/// A live parent (container) resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentResource {
    /// Parent identity.
    pub id: ParentId,
    /// Display name.
    pub name: String,
    /// The template group this parent was instantiated from.
    pub template_group_id: TemplateGroupId,
    /// Free-form properties; attribute diffs read live values out of
    /// this bag.
    #[serde(default)]
    pub properties: PropertyMap,
}

/// One hop of an ancestry path, ordered root first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathNode {
    /// Object kind of the node (e.g. "biz", "set", "module").
    pub kind: String,
    /// Instance identity of the node.
    pub id: i64,
    /// Instance name of the node.
    pub name: String,
}

impl PathNode {
    /// Create a new path node.
    #[must_use]
    pub fn new(kind: impl Into<String>, id: i64, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id,
            name: name.into(),
        }
    }
}

/// Kind of resource an ancestry lookup starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A parent (container) resource.
    Parent,
    /// A child resource.
    Child,
}

impl ResourceKind {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Parent => "parent",
            ResourceKind::Child => "child",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
