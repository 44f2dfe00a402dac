//! Forward and backward edge indices
//!
//! The two maps are one logical relation; `replace` is the only mutator and
//! always updates both.

use std::collections::{BTreeMap, BTreeSet};

use refgraph_core_types::Oid;

use crate::model::RefType;

/// Targets added and removed by one `replace`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceChange {
    pub added: Vec<Oid>,
    pub removed: Vec<Oid>,
}

impl ReferenceChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceIndex {
    forward: BTreeMap<(Oid, RefType), Vec<Oid>>,
    backward: BTreeMap<(Oid, RefType), BTreeSet<Oid>>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn targets(&self, source: Oid, reftype: RefType) -> &[Oid] {
        self.forward
            .get(&(source, reftype))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace the whole target list of `(source, reftype)`.
    ///
    /// Duplicates collapse to their first occurrence.
    pub fn replace(&mut self, source: Oid, reftype: RefType, targets: &[Oid]) -> ReferenceChange {
        let mut seen = BTreeSet::new();
        let new_targets: Vec<Oid> = targets.iter().copied().filter(|t| seen.insert(*t)).collect();

        let old_targets = self.forward.remove(&(source, reftype)).unwrap_or_default();
        let old_set: BTreeSet<Oid> = old_targets.iter().copied().collect();

        let change = ReferenceChange {
            added: new_targets
                .iter()
                .copied()
                .filter(|t| !old_set.contains(t))
                .collect(),
            removed: old_targets
                .iter()
                .copied()
                .filter(|t| !seen.contains(t))
                .collect(),
        };

        for target in &change.removed {
            if let Some(sources) = self.backward.get_mut(&(*target, reftype)) {
                sources.remove(&source);
                if sources.is_empty() {
                    self.backward.remove(&(*target, reftype));
                }
            }
        }
        for target in &change.added {
            self.backward
                .entry((*target, reftype))
                .or_default()
                .insert(source);
        }
        if !new_targets.is_empty() {
            self.forward.insert((source, reftype), new_targets);
        }
        change
    }

    /// Outgoing `(reftype, targets)` entries of `source`
    pub fn outgoing(&self, source: Oid) -> impl Iterator<Item = (RefType, &[Oid])> + Clone + '_ {
        self.forward
            .range((source, RefType::SheetReference)..)
            .take_while(move |((s, _), _)| *s == source)
            .map(|((_, reftype), targets)| (*reftype, targets.as_slice()))
    }

    /// Incoming `(reftype, sources)` entries of `target`
    pub fn incoming(
        &self,
        target: Oid,
    ) -> impl Iterator<Item = (RefType, &BTreeSet<Oid>)> + Clone + '_ {
        self.backward
            .range((target, RefType::SheetReference)..)
            .take_while(move |((t, _), _)| *t == target)
            .map(|((_, reftype), sources)| (*reftype, sources))
    }

    /// Edges present in one map but missing from the other
    pub fn asymmetries(&self) -> Vec<(Oid, RefType, Oid)> {
        let mut broken = Vec::new();
        for ((source, reftype), targets) in &self.forward {
            for target in targets {
                let mirrored = self
                    .backward
                    .get(&(*target, *reftype))
                    .is_some_and(|sources| sources.contains(source));
                if !mirrored {
                    broken.push((*source, *reftype, *target));
                }
            }
        }
        for ((target, reftype), sources) in &self.backward {
            for source in sources {
                if !self.targets(*source, *reftype).contains(target) {
                    broken.push((*source, *reftype, *target));
                }
            }
        }
        broken
    }

    /// Reftypes labelling at least one stored edge
    pub fn reftypes(&self) -> BTreeSet<RefType> {
        self.forward.keys().map(|(_, reftype)| *reftype).collect()
    }

    pub fn edge_count(&self) -> usize {
        self.forward.values().map(Vec::len).sum()
    }
}
