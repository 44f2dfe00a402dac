//! Static schema of the engine: sheets, reference types and resource types,
//! plus the node and reference records built from them.

pub mod reference;
pub mod reftype;
pub mod resource;
pub mod sheet;

pub use reference::{Appstructs, FieldValue, Reference, SheetData};
pub use reftype::{RefType, RefTypeMeta};
pub use resource::{Node, ResourceKind, ResourceType};
pub use sheet::Sheet;
