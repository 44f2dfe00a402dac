//! Resource types and content nodes

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use refgraph_core_types::Oid;
use serde::{Deserialize, Serialize};

use crate::model::Sheet;

/// Structural role of a resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Root,
    Pool,
    Item,
    ItemVersion,
    Tag,
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Root,
    Pool,
    /// Non-versioned container that features versions of other items
    Process,
    Item,
    ItemVersion,
    ForkableItem,
    ForkableItemVersion,
    Document,
    DocumentVersion,
    Paragraph,
    ParagraphVersion,
    Tag,
    Comment,
}

impl ResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Root => "root",
            ResourceType::Pool => "pool",
            ResourceType::Process => "process",
            ResourceType::Item => "item",
            ResourceType::ItemVersion => "item_version",
            ResourceType::ForkableItem => "forkable_item",
            ResourceType::ForkableItemVersion => "forkable_item_version",
            ResourceType::Document => "document",
            ResourceType::DocumentVersion => "document_version",
            ResourceType::Paragraph => "paragraph",
            ResourceType::ParagraphVersion => "paragraph_version",
            ResourceType::Tag => "tag",
            ResourceType::Comment => "comment",
        }
    }

    pub fn kind(self) -> ResourceKind {
        match self {
            ResourceType::Root => ResourceKind::Root,
            ResourceType::Pool => ResourceKind::Pool,
            ResourceType::Item
            | ResourceType::ForkableItem
            | ResourceType::Document
            | ResourceType::Paragraph => ResourceKind::Item,
            ResourceType::ItemVersion
            | ResourceType::ForkableItemVersion
            | ResourceType::DocumentVersion
            | ResourceType::ParagraphVersion => ResourceKind::ItemVersion,
            ResourceType::Tag => ResourceKind::Tag,
            ResourceType::Process | ResourceType::Comment => ResourceKind::Simple,
        }
    }

    pub fn sheets(self) -> &'static [Sheet] {
        match self {
            ResourceType::Root => &[],
            ResourceType::Pool => &[Sheet::Name],
            ResourceType::Process => &[Sheet::Name, Sheet::Featured],
            ResourceType::Item
            | ResourceType::ForkableItem
            | ResourceType::Document
            | ResourceType::Paragraph => &[Sheet::Name, Sheet::Tags],
            ResourceType::ItemVersion => &[Sheet::Versionable],
            ResourceType::ForkableItemVersion => &[Sheet::ForkableVersionable],
            ResourceType::DocumentVersion => &[Sheet::Versionable, Sheet::Document],
            ResourceType::ParagraphVersion => &[Sheet::Versionable, Sheet::Paragraph],
            ResourceType::Tag => &[Sheet::Name, Sheet::Tag],
            ResourceType::Comment => &[Sheet::Comment],
        }
    }

    /// Version type stored inside an item of this type
    pub fn item_type(self) -> Option<ResourceType> {
        match self {
            ResourceType::Item => Some(ResourceType::ItemVersion),
            ResourceType::ForkableItem => Some(ResourceType::ForkableItemVersion),
            ResourceType::Document => Some(ResourceType::DocumentVersion),
            ResourceType::Paragraph => Some(ResourceType::ParagraphVersion),
            _ => None,
        }
    }

    /// True if one of the declared sheets is or extends `sheet`
    pub fn provides(self, sheet: Sheet) -> bool {
        self.sheets().iter().any(|declared| declared.is_a(sheet))
    }

    /// True if new versions of items of this type may fork
    pub fn is_forkable(self) -> bool {
        let version_type = self.item_type().unwrap_or(self);
        version_type.sheets().iter().any(|sheet| sheet.is_forkable())
    }

    /// Whether `child` may be created directly below a resource of this type
    pub fn allows_child(self, child: ResourceType) -> bool {
        match self.kind() {
            ResourceKind::Root | ResourceKind::Pool => matches!(
                child.kind(),
                ResourceKind::Pool | ResourceKind::Item | ResourceKind::Simple
            ),
            ResourceKind::Item => child == ResourceType::Tag || Some(child) == self.item_type(),
            ResourceKind::ItemVersion | ResourceKind::Tag | ResourceKind::Simple => false,
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content node as held by the object store.
///
/// Reference-valued fields are not stored here; they live in the reference
/// graph and are materialized through the sheet layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub oid: Oid,
    pub name: String,
    pub parent: Option<Oid>,
    pub resource_type: ResourceType,
    pub children: BTreeMap<String, Oid>,
    pub attributes: BTreeMap<Sheet, BTreeMap<String, serde_json::Value>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Node {
    pub fn new(oid: Oid, name: String, parent: Option<Oid>, resource_type: ResourceType) -> Self {
        let now = Utc::now();
        Self {
            oid,
            name,
            parent,
            resource_type,
            children: BTreeMap::new(),
            attributes: BTreeMap::new(),
            created_at: now,
            modified_at: now,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.resource_type.kind()
    }

    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}
