//! Per-transaction changelog

use std::collections::BTreeMap;

use refgraph_core_types::Oid;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    pub created: bool,
    pub modified: bool,
    /// Version created after this one in the current transaction
    pub followed_by: Option<Oid>,
}

/// What happened to which resource during one transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Changelog {
    entries: BTreeMap<Oid, ChangelogEntry>,
}

impl Changelog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, oid: Oid) -> Option<&ChangelogEntry> {
        self.entries.get(&oid)
    }

    pub fn mark_created(&mut self, oid: Oid) {
        self.entries.entry(oid).or_default().created = true;
    }

    pub fn mark_modified(&mut self, oid: Oid) {
        self.entries.entry(oid).or_default().modified = true;
    }

    pub fn set_followed_by(&mut self, oid: Oid, follower: Oid) {
        self.entries.entry(oid).or_default().followed_by = Some(follower);
    }

    pub fn was_created(&self, oid: Oid) -> bool {
        self.get(oid).is_some_and(|entry| entry.created)
    }

    pub fn was_modified(&self, oid: Oid) -> bool {
        self.get(oid).is_some_and(|entry| entry.modified)
    }

    pub fn followed_by(&self, oid: Oid) -> Option<Oid> {
        self.get(oid).and_then(|entry| entry.followed_by)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Oid, &ChangelogEntry)> {
        self.entries.iter().map(|(oid, entry)| (*oid, entry))
    }

    pub fn created(&self) -> Vec<Oid> {
        self.iter()
            .filter(|(_, entry)| entry.created)
            .map(|(oid, _)| oid)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
