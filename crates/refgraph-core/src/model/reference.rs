//! References and sheet payloads

use std::collections::BTreeMap;

use refgraph_core_types::Oid;
use serde::{Deserialize, Serialize};

use crate::model::{RefType, Sheet};

/// One edge as reported by graph queries: `source.isheet.field -> target`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reference {
    pub source: Oid,
    pub isheet: Sheet,
    pub field: &'static str,
    pub target: Oid,
    pub reftype: RefType,
}

impl Reference {
    pub fn new(source: Oid, reftype: RefType, target: Oid) -> Self {
        let meta = reftype.meta();
        Self {
            source,
            isheet: meta.source_sheet,
            field: meta.source_field,
            target,
            reftype,
        }
    }
}

/// Value of a single sheet field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// Multi-valued reference field
    References(Vec<Oid>),
    /// Single-valued reference field; `None` means "leave untouched" in mappings
    Reference(Option<Oid>),
    /// Scalar field
    Value(serde_json::Value),
}

impl FieldValue {
    /// Reference targets carried by this value, if it is reference-valued
    pub fn targets(&self) -> Option<Vec<Oid>> {
        match self {
            FieldValue::References(targets) => Some(targets.clone()),
            FieldValue::Reference(target) => Some(target.iter().copied().collect()),
            FieldValue::Value(_) => None,
        }
    }
}

/// Field name -> value for one sheet
pub type SheetData = BTreeMap<String, FieldValue>;

/// Sheet -> data, as passed to resource creation
pub type Appstructs = BTreeMap<Sheet, SheetData>;
