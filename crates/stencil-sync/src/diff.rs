//! Structural diff engine.
//!
//! Pure comparison logic between a template set and the live children
//! of one parent. No I/O happens here; the fetcher supplies immutable
//! snapshots and the index built for the hash-join is discarded when
//! the call returns.

use std::collections::{HashMap, HashSet};

use stencil_core::{ChildId, ChildResource, Template};

use crate::types::{AttributeDiff, DiffEntry, DiffKind};

/// Compute the structural diff between a template set and the live
/// children attached to one parent.
///
/// Matching is strictly by exact template identity. Every live child
/// produces exactly one entry, in input order: `removed` when its
/// template reference is absent from the set, `changed` when the names
/// diverge, `unchanged` otherwise. Every template no child matched
/// produces exactly one `added` entry with [`ChildId::NONE`], in
/// template input order.
#[must_use]
pub fn diff_templates_with_children(
    templates: &[Template],
    children: &[ChildResource],
) -> Vec<DiffEntry> {
    let index: HashMap<_, _> = templates.iter().map(|t| (t.id, t)).collect();
    let mut matched: HashSet<_> = HashSet::with_capacity(templates.len());

    let mut entries = Vec::with_capacity(children.len());
    for child in children {
        let Some(template) = index.get(&child.template_id) else {
            entries.push(DiffEntry {
                child_id: child.id,
                child_name: child.name.clone(),
                template_id: child.template_id,
                template_name: String::new(),
                kind: DiffKind::Removed,
            });
            continue;
        };
        matched.insert(child.template_id);

        let kind = if child.name == template.name {
            DiffKind::Unchanged
        } else {
            DiffKind::Changed
        };
        entries.push(DiffEntry {
            child_id: child.id,
            child_name: child.name.clone(),
            template_id: template.id,
            template_name: template.name.clone(),
            kind,
        });
    }

    for template in templates {
        if matched.contains(&template.id) {
            continue;
        }
        entries.push(DiffEntry {
            child_id: ChildId::NONE,
            child_name: template.name.clone(),
            template_id: template.id,
            template_name: template.name.clone(),
            kind: DiffKind::Added,
        });
    }

    entries
}

/// Derive the need-sync verdict from a structural and attribute diff.
///
/// True if any structural entry is not `unchanged`, or any overridden
/// attribute's desired and observed values diverge.
#[must_use]
pub fn need_sync(entries: &[DiffEntry], attributes: &[AttributeDiff]) -> bool {
    entries.iter().any(|e| e.kind.needs_sync()) || attributes.iter().any(AttributeDiff::differs)
}
