//! Diff and sync result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use stencil_core::{
    AttributeId, ChildId, ParentId, ParentResource, PathNode, TemplateGroupId, TemplateId,
};

/// Outcome of comparing one template against the live children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    /// Template has no matching live child; a sync would create one.
    Added,
    /// Live child has no matching template; a sync would remove it.
    Removed,
    /// Matched, but name or content diverged.
    Changed,
    /// Matched and identical.
    Unchanged,
}

impl DiffKind {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffKind::Added => "added",
            DiffKind::Removed => "removed",
            DiffKind::Changed => "changed",
            DiffKind::Unchanged => "unchanged",
        }
    }

    /// Whether entries of this kind require a sync to converge.
    #[must_use]
    pub fn needs_sync(&self) -> bool {
        !matches!(self, DiffKind::Unchanged)
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DiffKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "added" => Ok(DiffKind::Added),
            "removed" => Ok(DiffKind::Removed),
            "changed" => Ok(DiffKind::Changed),
            "unchanged" => Ok(DiffKind::Unchanged),
            _ => Err(format!("Unknown diff kind: {s}")),
        }
    }
}

/// One structural comparison outcome between a template and a live
/// child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// Live child identity; [`ChildId::NONE`] for `added` entries.
    pub child_id: ChildId,
    /// Live child name; the template name for `added` entries.
    pub child_name: String,
    /// Template identity the entry refers to; `removed` entries keep
    /// whatever dangling reference the child carries.
    pub template_id: TemplateId,
    /// Template name; empty for `removed` entries.
    pub template_name: String,
    /// Comparison outcome.
    pub kind: DiffKind,
}

/// Desired versus observed value of one overridden attribute.
///
/// No diff tag is computed here; the caller decides materiality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDiff {
    /// Attribute identity.
    pub attribute_id: AttributeId,
    /// Desired value declared on the template group.
    pub template_value: serde_json::Value,
    /// Observed value on the live parent; `Null` when the parent has
    /// no value at the bound property key.
    pub instance_value: serde_json::Value,
}

impl AttributeDiff {
    /// Whether the desired and observed values diverge.
    #[must_use]
    pub fn differs(&self) -> bool {
        self.template_value != self.instance_value
    }
}

/// Aggregate reconciliation result for one parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentDiff {
    /// Snapshot of the parent record.
    pub parent: ParentResource,
    /// Structural diff entries, ordered children-first.
    pub entries: Vec<DiffEntry>,
    /// Attribute-level diff entries.
    pub attributes: Vec<AttributeDiff>,
    /// Ancestry path of the parent, root first.
    pub path: Vec<PathNode>,
    /// Whether anything in this diff requires a sync to converge.
    pub need_sync: bool,
}

/// One unit inside a dispatched sync task payload.
///
/// Carries the parent snapshot and ancestry path alongside each diff
/// entry so the task runner can apply and render the change without a
/// second lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncTaskItem {
    /// Snapshot of the parent the entry belongs to.
    pub parent: ParentResource,
    /// The diff entry to apply.
    pub entry: DiffEntry,
    /// Ancestry path of the parent, root first.
    pub path: Vec<PathNode>,
    /// When the item was assembled.
    pub created_at: DateTime<Utc>,
}

/// Per-parent need-sync verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentSyncStatus {
    /// Parent identity.
    pub parent_id: ParentId,
    /// Whether this parent has drifted from its template group.
    pub need_sync: bool,
}

/// Aggregated need-sync status across all parents of a template group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSyncStatus {
    /// Template group identity.
    pub template_group: TemplateGroupId,
    /// True if any parent needs a sync; vacuously false when the group
    /// has no live parents.
    pub need_sync: bool,
    /// Per-parent verdicts.
    pub parents: Vec<ParentSyncStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_diff_kind_roundtrip() {
        for kind in [
            DiffKind::Added,
            DiffKind::Removed,
            DiffKind::Changed,
            DiffKind::Unchanged,
        ] {
            let parsed: DiffKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
        assert!("drifted".parse::<DiffKind>().is_err());
    }

    #[test]
    fn test_diff_kind_serde_snake_case() {
        assert_eq!(serde_json::to_string(&DiffKind::Added).unwrap(), "\"added\"");
        let kind: DiffKind = serde_json::from_str("\"unchanged\"").unwrap();
        assert_eq!(kind, DiffKind::Unchanged);
    }

    #[test]
    fn test_diff_kind_needs_sync() {
        assert!(DiffKind::Added.needs_sync());
        assert!(DiffKind::Removed.needs_sync());
        assert!(DiffKind::Changed.needs_sync());
        assert!(!DiffKind::Unchanged.needs_sync());
    }

    #[test]
    fn test_attribute_diff_differs() {
        let same = AttributeDiff {
            attribute_id: AttributeId::new(5),
            template_value: json!(8),
            instance_value: json!(8),
        };
        assert!(!same.differs());

        let absent = AttributeDiff {
            attribute_id: AttributeId::new(5),
            template_value: json!(8),
            instance_value: serde_json::Value::Null,
        };
        assert!(absent.differs());
    }
}
