//! Reference type registry
//!
//! Reference types form a closed subtype lattice. Every stored edge belongs to
//! exactly one concrete (leaf) type; queries may filter by any base type.

use serde::{Deserialize, Serialize};

use crate::model::Sheet;

/// Static metadata attached to a reference type.
///
/// Subtypes inherit every value from their base unless they override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefTypeMeta {
    /// Sheet declaring the reference field
    pub source_sheet: Sheet,
    pub source_field: &'static str,
    /// Sheet every target must provide
    pub target_sheet: Sheet,
    /// Targets form a sequence rather than a set
    pub ordered: bool,
    /// Field holds at most one target
    pub single_valued: bool,
    pub source_unique: bool,
    pub target_unique: bool,
}

impl RefTypeMeta {
    const ROOT: RefTypeMeta = RefTypeMeta {
        source_sheet: Sheet::Base,
        source_field: "",
        target_sheet: Sheet::Base,
        ordered: false,
        single_valued: false,
        source_unique: false,
        target_unique: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefType {
    /// Root of the lattice
    SheetReference,
    /// Generic sheet-to-sheet reference; followed by subtree reachability
    SheetToSheet,
    /// Base of every "new version follows old version" edge
    NewVersionToOldVersion,
    VersionableFollows,
    TagElements,
    TagsElements,
    DocumentElements,
    FeaturedElements,
    CommentRefersTo,
}

impl RefType {
    pub const ALL: [RefType; 9] = [
        RefType::SheetReference,
        RefType::SheetToSheet,
        RefType::NewVersionToOldVersion,
        RefType::VersionableFollows,
        RefType::TagElements,
        RefType::TagsElements,
        RefType::DocumentElements,
        RefType::FeaturedElements,
        RefType::CommentRefersTo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RefType::SheetReference => "sheet_reference",
            RefType::SheetToSheet => "sheet_to_sheet",
            RefType::NewVersionToOldVersion => "new_version_to_old_version",
            RefType::VersionableFollows => "versionable_follows",
            RefType::TagElements => "tag_elements",
            RefType::TagsElements => "tags_elements",
            RefType::DocumentElements => "document_elements",
            RefType::FeaturedElements => "featured_elements",
            RefType::CommentRefersTo => "comment_refers_to",
        }
    }

    pub fn base(self) -> Option<RefType> {
        match self {
            RefType::SheetReference => None,
            RefType::SheetToSheet | RefType::NewVersionToOldVersion => {
                Some(RefType::SheetReference)
            }
            RefType::VersionableFollows => Some(RefType::NewVersionToOldVersion),
            RefType::TagElements
            | RefType::TagsElements
            | RefType::DocumentElements
            | RefType::FeaturedElements
            | RefType::CommentRefersTo => Some(RefType::SheetToSheet),
        }
    }

    /// Reflexive subtype check
    pub fn is_subtype_of(self, other: RefType) -> bool {
        let mut current = Some(self);
        while let Some(reftype) = current {
            if reftype == other {
                return true;
            }
            current = reftype.base();
        }
        false
    }

    /// Only leaf types may label stored edges
    pub fn is_concrete(self) -> bool {
        RefType::ALL.iter().all(|other| other.base() != Some(self))
    }

    pub fn concrete() -> impl Iterator<Item = RefType> {
        RefType::ALL.into_iter().filter(|reftype| reftype.is_concrete())
    }

    /// Follows-style edges, excluded from subtree reachability
    pub fn is_version_link(self) -> bool {
        self.is_subtype_of(RefType::NewVersionToOldVersion)
    }

    pub fn meta(self) -> RefTypeMeta {
        match self {
            RefType::SheetReference => RefTypeMeta::ROOT,
            RefType::SheetToSheet => RefType::SheetReference.meta(),
            RefType::NewVersionToOldVersion => RefType::SheetReference.meta(),
            RefType::VersionableFollows => RefTypeMeta {
                source_sheet: Sheet::Versionable,
                source_field: "follows",
                target_sheet: Sheet::Versionable,
                ..RefType::NewVersionToOldVersion.meta()
            },
            RefType::TagElements => RefTypeMeta {
                source_sheet: Sheet::Tag,
                source_field: "elements",
                target_sheet: Sheet::Versionable,
                ..RefType::SheetToSheet.meta()
            },
            RefType::TagsElements => RefTypeMeta {
                source_sheet: Sheet::Tags,
                source_field: "elements",
                target_sheet: Sheet::Tag,
                ordered: true,
                target_unique: true,
                ..RefType::SheetToSheet.meta()
            },
            RefType::DocumentElements => RefTypeMeta {
                source_sheet: Sheet::Document,
                source_field: "elements",
                target_sheet: Sheet::Paragraph,
                ordered: true,
                ..RefType::SheetToSheet.meta()
            },
            RefType::FeaturedElements => RefTypeMeta {
                source_sheet: Sheet::Featured,
                source_field: "elements",
                target_sheet: Sheet::Versionable,
                ..RefType::SheetToSheet.meta()
            },
            RefType::CommentRefersTo => RefTypeMeta {
                source_sheet: Sheet::Comment,
                source_field: "refers_to",
                target_sheet: Sheet::Versionable,
                single_valued: true,
                ..RefType::SheetToSheet.meta()
            },
        }
    }
}

impl std::fmt::Display for RefType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
