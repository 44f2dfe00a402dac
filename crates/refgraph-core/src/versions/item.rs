use refgraph_core_types::Oid;

use crate::errors::{RefGraphError, Result};
use crate::model::{Appstructs, RefType, ResourceKind, ResourceType};
use crate::resources::create_child_resource;
use crate::sheets;
use crate::transaction::Transaction;
use crate::versions::itemversion::strip_follows;
use crate::versions::tags::set_tag_elements;

/// Oids created by `create_item`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemHandle {
    pub item: Oid,
    pub first_version: Oid,
    pub first_tag: Oid,
    pub last_tag: Oid,
}

/// Create an item with its first version and its FIRST and LAST tags.
///
/// `version_appstructs` seeds the first version; any `follows` it carries is
/// ignored since a first version has no predecessor.
///
/// # Errors
///
/// Returns `InvalidChildType` if `item_type` is not an item type,
/// `InvalidFieldValue` if `item_appstructs` sets the item's tags, plus any
/// error of resource creation.
pub fn create_item(
    tx: &mut Transaction<'_>,
    parent: Oid,
    name: Option<&str>,
    item_type: ResourceType,
    item_appstructs: &Appstructs,
    version_appstructs: &Appstructs,
) -> Result<ItemHandle> {
    if item_type.kind() != ResourceKind::Item {
        return Err(RefGraphError::InvalidChildType {
            parent,
            child_type: item_type,
        });
    }
    let version_type = item_type.item_type().ok_or_else(|| RefGraphError::Internal {
        reason: format!("{item_type} declares no version type"),
    })?;

    sheets::ensure_unmanaged_appstructs(item_appstructs)?;
    let item = create_child_resource(tx, parent, name, item_type, item_appstructs)?;
    let first_version = create_child_resource(
        tx,
        item,
        None,
        version_type,
        &strip_follows(version_appstructs),
    )?;

    let versions = tx.config().versions.clone();
    let no_data = Appstructs::new();
    let first_tag = create_child_resource(
        tx,
        item,
        Some(&versions.first_tag),
        ResourceType::Tag,
        &no_data,
    )?;
    set_tag_elements(tx, first_tag, &[first_version])?;
    let last_tag = create_child_resource(
        tx,
        item,
        Some(&versions.last_tag),
        ResourceType::Tag,
        &no_data,
    )?;
    set_tag_elements(tx, last_tag, &[first_version])?;
    tx.set_references(item, &[first_tag, last_tag], RefType::TagsElements, true)?;

    tracing::debug!(
        item = %item,
        version = %first_version,
        item_type = %item_type,
        "item created"
    );
    Ok(ItemHandle {
        item,
        first_version,
        first_tag,
        last_tag,
    })
}
