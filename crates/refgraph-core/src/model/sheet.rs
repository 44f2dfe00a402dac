//! Sheets: typed capability views of a resource's data

use serde::{Deserialize, Serialize};

use crate::model::RefType;

/// Closed set of sheet capabilities.
///
/// Sheets form a single-inheritance hierarchy rooted at `Base`; a sheet
/// inherits every reference field declared on the sheets it extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sheet {
    Base,
    Name,
    Versionable,
    /// Versionable whose items may carry several LAST tips
    ForkableVersionable,
    Tag,
    Tags,
    Document,
    Paragraph,
    Featured,
    Comment,
}

impl Sheet {
    pub const ALL: [Sheet; 10] = [
        Sheet::Base,
        Sheet::Name,
        Sheet::Versionable,
        Sheet::ForkableVersionable,
        Sheet::Tag,
        Sheet::Tags,
        Sheet::Document,
        Sheet::Paragraph,
        Sheet::Featured,
        Sheet::Comment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Sheet::Base => "base",
            Sheet::Name => "name",
            Sheet::Versionable => "versionable",
            Sheet::ForkableVersionable => "forkable_versionable",
            Sheet::Tag => "tag",
            Sheet::Tags => "tags",
            Sheet::Document => "document",
            Sheet::Paragraph => "paragraph",
            Sheet::Featured => "featured",
            Sheet::Comment => "comment",
        }
    }

    /// The sheet this one specializes; `None` only for `Base`
    pub fn extends(self) -> Option<Sheet> {
        match self {
            Sheet::Base => None,
            Sheet::ForkableVersionable => Some(Sheet::Versionable),
            _ => Some(Sheet::Base),
        }
    }

    /// Reflexive "is or extends" relation
    pub fn is_a(self, other: Sheet) -> bool {
        let mut current = Some(self);
        while let Some(sheet) = current {
            if sheet == other {
                return true;
            }
            current = sheet.extends();
        }
        false
    }

    /// True for sheets whose items may hold several branch tips in LAST
    pub fn is_forkable(self) -> bool {
        self.is_a(Sheet::ForkableVersionable)
    }

    /// Plain (non-reference) fields stored on the node itself
    pub fn scalar_fields(self) -> &'static [&'static str] {
        match self {
            Sheet::Name => &["name"],
            Sheet::Document => &["title"],
            Sheet::Paragraph => &["text"],
            Sheet::Comment => &["content"],
            _ => &[],
        }
    }

    /// Reference fields, including those inherited from extended sheets
    pub fn reference_fields(self) -> impl Iterator<Item = (&'static str, RefType)> {
        RefType::concrete()
            .filter(move |reftype| self.is_a(reftype.meta().source_sheet))
            .map(|reftype| (reftype.meta().source_field, reftype))
    }

    /// The concrete reftype backing `field`, if it is a reference field
    pub fn reftype_for_field(self, field: &str) -> Option<RefType> {
        self.reference_fields()
            .find(|(name, _)| *name == field)
            .map(|(_, reftype)| reftype)
    }

    pub fn has_scalar_field(self, field: &str) -> bool {
        self.scalar_fields().iter().any(|name| *name == field)
    }

    pub fn has_field(self, field: &str) -> bool {
        self.has_scalar_field(field) || self.reftype_for_field(field).is_some()
    }
}

impl std::fmt::Display for Sheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
