//! Object store collaborator
//!
//! The engine consumes the object store only through `ObjectStore`: id
//! allocation, child creation and lookup by id or path.

pub mod memory;

use refgraph_core_types::Oid;

use crate::errors::Result;
use crate::model::{Node, ResourceType};

pub use memory::MemoryObjectStore;

pub trait ObjectStore {
    fn allocate_id(&mut self) -> Oid;

    /// Create a node below `parent`
    ///
    /// # Errors
    ///
    /// Returns `ParentNotFound` for an unknown parent and `NameConflict`
    /// when the name is already taken below it.
    fn create_child(&mut self, parent: Oid, name: &str, resource_type: ResourceType)
        -> Result<Oid>;

    fn resolve(&self, oid: Oid) -> Option<&Node>;

    fn resolve_mut(&mut self, oid: Oid) -> Option<&mut Node>;

    fn resolve_path(&self, path: &str) -> Option<Oid>;

    fn path_of(&self, oid: Oid) -> Option<String>;

    fn root(&self) -> Oid;

    /// True if `oid` lies strictly below `ancestor` in the containment tree
    fn is_descendant(&self, oid: Oid, ancestor: Oid) -> bool {
        let mut current = self.resolve(oid).and_then(|node| node.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.resolve(parent).and_then(|node| node.parent);
        }
        false
    }

    /// All nodes strictly below `oid`, depth first
    fn descendants(&self, oid: Oid) -> Vec<Oid> {
        let mut found = Vec::new();
        let mut stack: Vec<Oid> = self
            .resolve(oid)
            .map(|node| node.children.values().rev().copied().collect())
            .unwrap_or_default();
        while let Some(next) = stack.pop() {
            found.push(next);
            if let Some(node) = self.resolve(next) {
                stack.extend(node.children.values().rev().copied());
            }
        }
        found
    }
}
