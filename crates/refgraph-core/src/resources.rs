//! Resource creation
//!
//! Creates a node below its parent, enforcing the containment rules of the
//! resource types, then writes the initial sheet data.

use refgraph_core_types::Oid;

use crate::errors::{RefGraphError, Result};
use crate::model::{Appstructs, ResourceKind, ResourceType};
use crate::sheets;
use crate::transaction::Transaction;

/// Create a resource of `resource_type` below `parent`.
///
/// Versions and tags only come into existence through `create_item` and
/// `create_version`, so they are refused here, as is initial data for
/// `follows` or tag elements.
///
/// Without a `name`, resources are named from their type name.
///
/// # Errors
///
/// Returns `InvalidChildType` for versions and tags, `InvalidFieldValue`
/// for managed fields, plus every error of resource creation.
pub fn create_resource(
    tx: &mut Transaction<'_>,
    parent: Oid,
    name: Option<&str>,
    resource_type: ResourceType,
    appstructs: &Appstructs,
) -> Result<Oid> {
    if matches!(
        resource_type.kind(),
        ResourceKind::ItemVersion | ResourceKind::Tag
    ) {
        return Err(RefGraphError::InvalidChildType {
            parent,
            child_type: resource_type,
        });
    }
    sheets::ensure_unmanaged_appstructs(appstructs)?;
    create_child_resource(tx, parent, name, resource_type, appstructs)
}

/// Create any resource, versions and tags included.
///
/// Without a `name`, versions are named from the configured autonaming
/// prefix and other resources from their type name.
///
/// # Errors
///
/// Returns `ParentNotFound`, `InvalidChildType`, `NameConflict`,
/// `Configuration` for sheets the type does not provide, or any sheet
/// validation error.
pub(crate) fn create_child_resource(
    tx: &mut Transaction<'_>,
    parent: Oid,
    name: Option<&str>,
    resource_type: ResourceType,
    appstructs: &Appstructs,
) -> Result<Oid> {
    let parent_type = tx
        .content()
        .resolve(parent)
        .map(|node| node.resource_type)
        .ok_or(RefGraphError::ParentNotFound { oid: parent })?;
    if !parent_type.allows_child(resource_type) {
        return Err(RefGraphError::InvalidChildType {
            parent,
            child_type: resource_type,
        });
    }
    if let Some(sheet) = appstructs
        .keys()
        .copied()
        .find(|sheet| !resource_type.provides(*sheet))
    {
        return Err(RefGraphError::Configuration {
            details: format!("{resource_type} does not provide sheet {sheet}"),
        });
    }

    let name = match name {
        Some(name) => name.to_string(),
        None if resource_type.kind() == ResourceKind::ItemVersion => {
            let prefix = tx.config().versions.autonaming_prefix.clone();
            tx.autoname(parent, &prefix)
        }
        None => tx.autoname(parent, &format!("{}_", resource_type.as_str())),
    };

    let oid = tx.create_child(parent, &name, resource_type)?;
    for (sheet, data) in appstructs {
        sheets::set_sheet_data(tx, oid, *sheet, data)?;
    }
    tracing::debug!(
        oid = %oid,
        parent = %parent,
        resource_type = %resource_type,
        name = %name,
        "resource created"
    );
    Ok(oid)
}
