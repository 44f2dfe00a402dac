//! In-memory object store

use std::collections::BTreeMap;

use refgraph_core_types::Oid;

use crate::content::ObjectStore;
use crate::errors::{RefGraphError, Result};
use crate::model::{Node, ResourceType};

/// Object store keeping every node in a map; the root lives at `/`.
#[derive(Debug, Clone)]
pub struct MemoryObjectStore {
    nodes: BTreeMap<Oid, Node>,
    next_id: u64,
    root: Oid,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        let root = Oid::new(0);
        let mut nodes = BTreeMap::new();
        nodes.insert(root, Node::new(root, String::new(), None, ResourceType::Root));
        Self {
            nodes,
            next_id: 1,
            root,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First free child name of the form `{prefix}{n}` with `n` zero-padded
    pub fn next_name(&self, parent: Oid, prefix: &str, width: usize) -> String {
        let taken = self.nodes.get(&parent).map(|node| &node.children);
        (0u64..)
            .map(|n| format!("{prefix}{n:0width$}"))
            .find(|candidate| taken.map_or(true, |children| !children.contains_key(candidate)))
            .unwrap_or_else(|| prefix.to_string())
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn allocate_id(&mut self) -> Oid {
        let oid = Oid::new(self.next_id);
        self.next_id += 1;
        oid
    }

    fn create_child(
        &mut self,
        parent: Oid,
        name: &str,
        resource_type: ResourceType,
    ) -> Result<Oid> {
        let parent_node = self
            .nodes
            .get(&parent)
            .ok_or(RefGraphError::ParentNotFound { oid: parent })?;
        if name.is_empty() || name.contains('/') || parent_node.children.contains_key(name) {
            return Err(RefGraphError::NameConflict {
                parent,
                name: name.to_string(),
            });
        }

        let oid = self.allocate_id();
        self.nodes.insert(
            oid,
            Node::new(oid, name.to_string(), Some(parent), resource_type),
        );
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.insert(name.to_string(), oid);
        }
        tracing::trace!(parent = %parent, oid = %oid, name, "created child");
        Ok(oid)
    }

    fn resolve(&self, oid: Oid) -> Option<&Node> {
        self.nodes.get(&oid)
    }

    fn resolve_mut(&mut self, oid: Oid) -> Option<&mut Node> {
        self.nodes.get_mut(&oid)
    }

    fn resolve_path(&self, path: &str) -> Option<Oid> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self.root, |current, segment| {
                self.nodes
                    .get(&current)
                    .and_then(|node| node.children.get(segment))
                    .copied()
            })
    }

    fn path_of(&self, oid: Oid) -> Option<String> {
        let mut segments = Vec::new();
        let mut current = self.nodes.get(&oid)?;
        while let Some(parent) = current.parent {
            segments.push(current.name.as_str());
            current = self.nodes.get(&parent)?;
        }
        segments.reverse();
        Some(format!("/{}", segments.join("/")))
    }

    fn root(&self) -> Oid {
        self.root
    }
}
