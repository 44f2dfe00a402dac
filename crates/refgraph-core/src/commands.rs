//! Command enum for the functional-boundary `apply` entry point

use refgraph_core_types::Oid;

use crate::graph::ReferenceChange;
use crate::model::{Appstructs, RefType, ResourceType, Sheet, SheetData};
use crate::versions::ItemHandle;

/// One atomic engine operation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a non-versioned resource (pool, process, comment, ...)
    CreateResource {
        parent: Oid,
        name: Option<String>,
        resource_type: ResourceType,
        appstructs: Appstructs,
    },

    /// Create an item with its first version and FIRST/LAST tags
    CreateItem {
        parent: Oid,
        name: Option<String>,
        item_type: ResourceType,
        appstructs: Appstructs,
        version_appstructs: Appstructs,
    },

    /// Create a new version following `follows`
    CreateVersion {
        item: Oid,
        follows: Vec<Oid>,
        appstructs: Appstructs,
        root_versions: Vec<Oid>,
    },

    /// Write fields of one sheet, except `follows` and tag elements
    SetSheet {
        resource: Oid,
        sheet: Sheet,
        data: SheetData,
    },

    /// Replace the targets of one reference type directly
    ///
    /// Checked like a write of the declaring sheet field; `follows` and tag
    /// elements are left to `CreateItem` and `CreateVersion`.
    SetReferences {
        source: Oid,
        targets: Vec<Oid>,
        reftype: RefType,
        send_event: bool,
    },

    /// Announce that the subtree below `resource` is about to be removed
    NotifyRemoval { resource: Oid },
}

impl Command {
    /// Operation name used in structured logs
    pub fn op_name(&self) -> &'static str {
        match self {
            Command::CreateResource { .. } => "create_resource",
            Command::CreateItem { .. } => "create_item",
            Command::CreateVersion { .. } => "create_version",
            Command::SetSheet { .. } => "set_sheet",
            Command::SetReferences { .. } => "set_references",
            Command::NotifyRemoval { .. } => "notify_removal",
        }
    }
}

/// Result payload of a successfully applied command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(Oid),
    ItemCreated(ItemHandle),
    VersionCreated(Oid),
    Updated,
    ReferencesSet(ReferenceChange),
    RemovalNotified(usize),
}

impl Outcome {
    /// The oid created by the command, if any
    pub fn created(&self) -> Option<Oid> {
        match self {
            Outcome::Created(oid) | Outcome::VersionCreated(oid) => Some(*oid),
            Outcome::ItemCreated(handle) => Some(handle.item),
            _ => None,
        }
    }
}
