//! Subtree reachability over sheet-to-sheet references

use std::collections::{BTreeSet, VecDeque};

use refgraph_core_types::Oid;

use crate::graph::Graph;
use crate::model::RefType;

impl Graph {
    /// True iff `descendant` is reachable from one of `ancestors` by zero or
    /// more sheet-to-sheet references. Version links (`follows`) are never
    /// traversed. An empty `ancestors` list reaches nothing.
    pub fn is_in_subtree(&self, descendant: Oid, ancestors: &[Oid]) -> bool {
        if ancestors.contains(&descendant) {
            return true;
        }
        let mut visited: BTreeSet<Oid> = ancestors.iter().copied().collect();
        let mut queue: VecDeque<Oid> = ancestors.iter().copied().collect();
        while let Some(current) = queue.pop_front() {
            let next = self
                .get_references(current, Some(RefType::SheetToSheet), None)
                .filter(|reference| !reference.reftype.is_version_link())
                .map(|reference| reference.target);
            for target in next {
                if target == descendant {
                    return true;
                }
                if visited.insert(target) {
                    queue.push_back(target);
                }
            }
        }
        false
    }
}
