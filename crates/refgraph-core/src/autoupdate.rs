//! Auto-update propagation
//!
//! When a referenced version gets a successor, sheets that opt in through
//! `AutoUpdatable` have their reference repointed at the new version. Sheets
//! are looked up in a static registry; a sheet inherits the behaviour of the
//! sheets it extends.
//!
//! Repointing goes back through `Transaction::set_references`, so every
//! rewrite raises its own back-reference events and new versions cascade to
//! further levels.

use refgraph_core_types::Oid;

use crate::errors::{RefGraphError, Result};
use crate::events::ReferencedItemHasNewVersion;
use crate::model::{Appstructs, FieldValue, ResourceKind, Sheet};
use crate::sheets::get_sheet_data;
use crate::transaction::Transaction;
use crate::versions::create_version;

/// Per-sheet opt-in to reference auto-updating
pub trait AutoUpdatable: Sync {
    fn sheet(&self) -> Sheet;

    /// Whether references stored in `field` should follow new versions
    fn follows_new_versions(&self, _field: &str) -> bool {
        true
    }

    /// New target list for a field that referenced `old` before `new` existed
    fn rewrite(&self, targets: &[Oid], old: Oid, new: Oid) -> Vec<Oid> {
        targets
            .iter()
            .map(|target| if *target == old { new } else { *target })
            .collect()
    }
}

struct DocumentAutoUpdate;

impl AutoUpdatable for DocumentAutoUpdate {
    fn sheet(&self) -> Sheet {
        Sheet::Document
    }

    fn follows_new_versions(&self, field: &str) -> bool {
        field == "elements"
    }
}

struct FeaturedAutoUpdate;

impl AutoUpdatable for FeaturedAutoUpdate {
    fn sheet(&self) -> Sheet {
        Sheet::Featured
    }
}

static REGISTRY: [&dyn AutoUpdatable; 2] = [&DocumentAutoUpdate, &FeaturedAutoUpdate];

/// Auto-update behaviour of `sheet`, searching the sheets it extends
pub fn lookup(sheet: Sheet) -> Option<&'static dyn AutoUpdatable> {
    let mut current = Some(sheet);
    while let Some(candidate) = current {
        if let Some(found) = REGISTRY.iter().find(|entry| entry.sheet() == candidate) {
            return Some(*found);
        }
        current = candidate.extends();
    }
    None
}

pub fn is_auto_updatable(sheet: Sheet) -> bool {
    lookup(sheet).is_some()
}

/// Subscriber for `SheetReferencedItemHasNewVersion`
///
/// # Errors
///
/// Returns `AutoUpdateNoForkAllowed` when the referencing resource is a
/// version whose item would be forked by the update, and propagates any
/// error of the cascade it starts.
pub fn handle(tx: &mut Transaction<'_>, event: &ReferencedItemHasNewVersion) -> Result<()> {
    if !tx.config().auto_update.enabled {
        return Ok(());
    }
    let Some(updater) = lookup(event.isheet) else {
        return Ok(());
    };
    if !updater.follows_new_versions(event.isheet_field) {
        return Ok(());
    }
    if !event.root_versions.is_empty()
        && !tx.graph().is_in_subtree(event.object, &event.root_versions)
    {
        tracing::debug!(
            resource = %event.object,
            old_version = %event.old_version,
            "auto-update skipped: outside root versions"
        );
        return Ok(());
    }

    // Non-versioned resources and versions created in this transaction are
    // still mutable.
    let kind = tx.node(event.object)?.kind();
    if kind != ResourceKind::ItemVersion || tx.changelog().was_created(event.object) {
        return rewrite_in_place(tx, event.object, event, updater);
    }
    if let Some(follower) = tx.changelog().followed_by(event.object) {
        return rewrite_in_place(tx, follower, event, updater);
    }
    update_by_new_version(tx, event, updater)
}

fn rewrite_in_place(
    tx: &mut Transaction<'_>,
    resource: Oid,
    event: &ReferencedItemHasNewVersion,
    updater: &dyn AutoUpdatable,
) -> Result<()> {
    let current = tx.graph().targets(resource, event.reftype).to_vec();
    if !current.contains(&event.old_version) {
        return Ok(());
    }
    let targets = updater.rewrite(&current, event.old_version, event.new_version);
    tx.set_references(resource, &targets, event.reftype, true)?;
    tx.mark_modified(resource);
    tracing::debug!(
        resource = %resource,
        old_version = %event.old_version,
        new_version = %event.new_version,
        "auto-updated in place"
    );
    Ok(())
}

/// Versions are immutable: follow the referencing version with a copy whose
/// reference points at the new version.
fn update_by_new_version(
    tx: &mut Transaction<'_>,
    event: &ReferencedItemHasNewVersion,
    updater: &dyn AutoUpdatable,
) -> Result<()> {
    let source = tx.node(event.object)?;
    let item = source.parent.ok_or_else(|| RefGraphError::Internal {
        reason: format!("version {} has no item", event.object),
    })?;

    let mut appstructs = Appstructs::new();
    for sheet in source.resource_type.sheets() {
        if sheet.is_a(Sheet::Versionable) {
            continue;
        }
        let mut data = get_sheet_data(tx.content(), event.object, *sheet)?;
        if *sheet == event.isheet {
            let current = tx.graph().targets(event.object, event.reftype);
            let targets = updater.rewrite(current, event.old_version, event.new_version);
            data.insert(
                event.isheet_field.to_string(),
                FieldValue::References(targets),
            );
        }
        appstructs.insert(*sheet, data);
    }

    let follows = [event.object];
    let new_version = create_version(tx, item, &follows, &appstructs, &event.root_versions)
        .map_err(|err| match err {
            RefGraphError::NoForkAllowed { .. } => RefGraphError::AutoUpdateNoForkAllowed {
                resource: event.object,
                event: Box::new(event.clone()),
            },
            other => other,
        })?;
    tracing::debug!(
        resource = %event.object,
        new_resource_version = %new_version,
        new_version = %event.new_version,
        "auto-updated by new version"
    );
    Ok(())
}
