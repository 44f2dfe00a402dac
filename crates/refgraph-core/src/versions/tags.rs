//! Tag manager
//!
//! Every item carries two tags: FIRST, set once at item creation, and LAST,
//! recomputed on every new version. Linear items keep exactly one LAST
//! version; forkable items keep one entry per branch tip.

use std::collections::BTreeSet;

use refgraph_core_types::Oid;

use crate::errors::{RefGraphError, Result};
use crate::model::{RefType, ResourceKind};
use crate::transaction::{Content, Transaction};

/// Tag of `item` named `name`, looked up through the item's tags field
pub fn find_tag(content: &Content, item: Oid, name: &str) -> Option<Oid> {
    content
        .graph
        .targets(item, RefType::TagsElements)
        .iter()
        .copied()
        .find(|tag| content.resolve(*tag).is_some_and(|node| node.name == name))
}

pub fn tag_elements(content: &Content, tag: Oid) -> Vec<Oid> {
    content.graph.targets(tag, RefType::TagElements).to_vec()
}

fn tagged(content: &Content, item: Oid, name: &str) -> Vec<Oid> {
    find_tag(content, item, name)
        .map(|tag| tag_elements(content, tag))
        .unwrap_or_default()
}

/// Versions currently tagged FIRST on `item`
pub fn first_versions(content: &Content, item: Oid, first_tag: &str) -> Vec<Oid> {
    tagged(content, item, first_tag)
}

/// Versions currently tagged LAST on `item`
pub fn last_versions(content: &Content, item: Oid, last_tag: &str) -> Vec<Oid> {
    tagged(content, item, last_tag)
}

/// Names of the tags currently pointing at `version`
pub fn tag_names(content: &Content, version: Oid) -> Vec<String> {
    content
        .graph
        .get_back_reference_sources(version, RefType::TagElements)
        .into_iter()
        .filter_map(|tag| content.resolve(tag))
        .filter(|node| node.kind() == ResourceKind::Tag)
        .map(|node| node.name.clone())
        .collect()
}

/// LAST update computed before a new version exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastTagPlan {
    pub tag: Oid,
    /// Current tips that survive; the new version is appended to these
    pub kept: Vec<Oid>,
}

/// Decide the LAST update for a version of `item` following `follows`.
///
/// # Errors
///
/// Returns `NoForkAllowed` for a linear item unless `follows` is exactly
/// the current LAST, and `TagInvariantViolation` if the item has no LAST.
pub fn plan_last_tag(
    content: &Content,
    last_tag: &str,
    item: Oid,
    follows: &[Oid],
) -> Result<LastTagPlan> {
    let node = content.node(item)?;
    let tag = find_tag(content, item, last_tag).ok_or_else(|| {
        RefGraphError::TagInvariantViolation {
            item,
            reason: format!("missing {last_tag} tag"),
        }
    })?;
    let current = tag_elements(content, tag);
    let predecessors: BTreeSet<Oid> = follows.iter().copied().collect();

    if node.resource_type.is_forkable() {
        let kept = current
            .into_iter()
            .filter(|tip| !predecessors.contains(tip))
            .collect();
        return Ok(LastTagPlan { tag, kept });
    }

    let current_set: BTreeSet<Oid> = current.iter().copied().collect();
    if follows.len() != 1 || current_set != predecessors {
        return Err(RefGraphError::NoForkAllowed {
            resource: item,
            predecessors: follows.to_vec(),
        });
    }
    Ok(LastTagPlan {
        tag,
        kept: Vec::new(),
    })
}

/// Point LAST at the planned tips plus `new_version`
///
/// # Errors
///
/// Propagates errors from event dispatch.
pub fn apply_last_tag(
    tx: &mut Transaction<'_>,
    plan: LastTagPlan,
    new_version: Oid,
) -> Result<()> {
    let mut elements = plan.kept;
    elements.push(new_version);
    set_tag_elements(tx, plan.tag, &elements)
}

/// Replace the elements of `tag` and reindex every version that gained or
/// lost the tag.
///
/// # Errors
///
/// Propagates errors from event dispatch.
pub fn set_tag_elements(tx: &mut Transaction<'_>, tag: Oid, elements: &[Oid]) -> Result<()> {
    let change = tx.set_references(tag, elements, RefType::TagElements, true)?;
    let index = &tx.config().catalog.tag_index;
    for version in change.added.iter().chain(change.removed.iter()) {
        tx.reindex(*version, index);
    }
    if !change.is_empty() {
        tx.mark_modified(tag);
    }
    Ok(())
}
