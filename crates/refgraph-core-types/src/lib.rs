//! Core types shared across the refgraph crates
//!
//! This crate provides foundational types used by the engine, its error
//! facility and its logging facility:
//!
//! - **Object identifiers**: `Oid`, the stable integer id of a content node
//! - **Correlation types**: `TransactionId`, `RequestContext`
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod oid;
pub mod schema;

pub use correlation::{RequestContext, TransactionId};
pub use oid::Oid;
