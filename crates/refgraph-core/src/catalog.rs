//! Index/catalog collaborator
//!
//! The engine never searches; it only tells the catalog which resources
//! need reindexing after tag or reference changes.

use refgraph_core_types::Oid;

pub trait Catalog {
    fn reindex(&mut self, oid: Oid, index: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullCatalog;

impl Catalog for NullCatalog {
    fn reindex(&mut self, _oid: Oid, _index: &str) {}
}

/// Records reindex requests in call order
#[derive(Debug, Default, Clone)]
pub struct RecordingCatalog {
    calls: Vec<(Oid, String)>,
}

impl RecordingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[(Oid, String)] {
        &self.calls
    }

    /// Oids reindexed in `index`, in call order
    pub fn reindexed(&self, index: &str) -> Vec<Oid> {
        self.calls
            .iter()
            .filter(|(_, name)| name == index)
            .map(|(oid, _)| *oid)
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Catalog for RecordingCatalog {
    fn reindex(&mut self, oid: Oid, index: &str) {
        self.calls.push((oid, index.to_string()));
    }
}
