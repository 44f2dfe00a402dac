//! refgraph core - typed reference graph and version DAG engine
//!
//! This crate provides the consistency engine underneath a tree of typed,
//! versioned resources:
//! - A reference store keeping forward and backward edge indices in sync
//! - The Item / ItemVersion / Tag version model built on top of it
//! - Auto-update propagation of new versions with a linear-history fork guard
//! - Transactions with all-or-nothing cascades and a functional `apply` boundary
//!
//! Collaborators (object store, catalog, event bus) are injected as traits,
//! with in-memory implementations suitable for tests and embedding.

pub mod apply;
pub mod autoupdate;
pub mod catalog;
pub mod changelog;
pub mod commands;
pub mod config;
pub mod content;
pub mod errors;
pub mod events;
pub mod graph;
pub mod logging_facility;
pub mod model;
pub mod resources;
pub mod rules;
pub mod sheets;
pub mod transaction;
pub mod versions;

pub use refgraph_core_types as core_types;
pub use refgraph_core_types::{Oid, RequestContext};

// Re-export commonly used types
pub use apply::{apply, Applied};
pub use commands::{Command, Outcome};
pub use config::EngineConfig;
pub use errors::{RefGraphError, Result, RgError, RgErrorKind};
pub use events::{Event, EventKind, EventSink, RecordingSink};
pub use graph::Graph;
pub use model::{Appstructs, FieldValue, RefType, Reference, ResourceType, Sheet, SheetData};
pub use transaction::{Content, Environment, Transaction};
pub use versions::{create_item, create_version, ItemHandle};
