//! New versions and the notifications they trigger

use std::collections::BTreeSet;

use refgraph_core_types::Oid;

use crate::errors::{RefGraphError, Result};
use crate::events::{Event, NewVersionEvent, ReferencedItemHasNewVersion};
use crate::model::{Appstructs, FieldValue, RefType, ResourceKind, Sheet, SheetData};
use crate::resources::create_child_resource;
use crate::transaction::Transaction;
use crate::versions::tags::{apply_last_tag, plan_last_tag};

/// Copy of `appstructs` without any `follows` entry
pub(crate) fn strip_follows(appstructs: &Appstructs) -> Appstructs {
    appstructs
        .iter()
        .map(|(sheet, data)| {
            let data: SheetData = data
                .iter()
                .filter(|(field, _)| {
                    sheet.reftype_for_field(field) != Some(RefType::VersionableFollows)
                })
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect();
            (*sheet, data)
        })
        .filter(|(_, data)| !data.is_empty())
        .collect()
}

/// Create a new version of `item` following `follows`.
///
/// The fork guard is evaluated before anything is written. After the version
/// exists, every predecessor gets an `ItemVersionNewVersionAdded`, then every
/// sheet-to-sheet back reference of every predecessor gets a
/// `SheetReferencedItemHasNewVersion` carrying `root_versions`; finally the
/// item's LAST tag is moved.
///
/// # Errors
///
/// Returns `EmptyFollows`, `NotAVersionOf`, `NotAnItem`, `NoForkAllowed`,
/// and any error raised while cascading the notifications (notably
/// `AutoUpdateNoForkAllowed`).
pub fn create_version(
    tx: &mut Transaction<'_>,
    item: Oid,
    follows: &[Oid],
    appstructs: &Appstructs,
    root_versions: &[Oid],
) -> Result<Oid> {
    let item_node = tx.node(item)?;
    if item_node.kind() != ResourceKind::Item {
        return Err(RefGraphError::NotAnItem { oid: item });
    }
    let version_type = item_node
        .resource_type
        .item_type()
        .ok_or(RefGraphError::NotAnItem { oid: item })?;

    let mut seen = BTreeSet::new();
    let follows: Vec<Oid> = follows.iter().copied().filter(|v| seen.insert(*v)).collect();
    if follows.is_empty() {
        return Err(RefGraphError::EmptyFollows { item });
    }
    for version in &follows {
        let is_version_of_item = tx.content().resolve(*version).is_some_and(|node| {
            node.parent == Some(item) && node.kind() == ResourceKind::ItemVersion
        });
        if !is_version_of_item {
            return Err(RefGraphError::NotAVersionOf {
                version: *version,
                item,
            });
        }
    }

    let plan = plan_last_tag(tx.content(), &tx.config().versions.last_tag, item, &follows)?;

    let mut version_appstructs = strip_follows(appstructs);
    version_appstructs
        .entry(Sheet::Versionable)
        .or_default()
        .insert("follows".to_string(), FieldValue::References(follows.clone()));
    let new_version = create_child_resource(tx, item, None, version_type, &version_appstructs)?;
    tracing::debug!(
        item = %item,
        version = %new_version,
        predecessors = follows.len(),
        "version created"
    );

    let creator = tx.creator();
    for predecessor in &follows {
        tx.notify(Event::ItemVersionNewVersionAdded(NewVersionEvent {
            object: *predecessor,
            new_version,
            creator,
        }))?;
    }
    for predecessor in &follows {
        let back_references: Vec<_> = tx
            .graph()
            .get_back_references(*predecessor, Some(RefType::SheetToSheet), None)
            .collect();
        for reference in back_references {
            tx.notify(Event::SheetReferencedItemHasNewVersion(
                ReferencedItemHasNewVersion {
                    object: reference.source,
                    isheet: reference.isheet,
                    isheet_field: reference.field,
                    reftype: reference.reftype,
                    old_version: *predecessor,
                    new_version,
                    root_versions: root_versions.to_vec(),
                    creator,
                },
            ))?;
        }
    }

    apply_last_tag(tx, plan, new_version)?;
    Ok(new_version)
}
