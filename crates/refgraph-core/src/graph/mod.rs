//! Reference store
//!
//! `Graph` records typed edges between node ids and answers forward and
//! backward queries over them. It is a derived index of what sheet fields
//! contain: sheets resynchronize it through `set_references`.
//!
//! A graph without a backing index (`Graph::detached`) answers every read
//! with an empty result and ignores writes.

pub mod index;
pub mod removal;
pub mod subtree;

use std::collections::BTreeMap;

use refgraph_core_types::Oid;

use crate::errors::{RefGraphError, Result};
use crate::events::{Event, EventSink};
use crate::model::{FieldValue, RefType, Reference, Sheet, SheetData};

pub use index::{ReferenceChange, ReferenceIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    index: Option<ReferenceIndex>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_filter(
    reftype: RefType,
    base_reftype: Option<RefType>,
    base_isheet: Option<Sheet>,
) -> bool {
    base_reftype.map_or(true, |base| reftype.is_subtype_of(base))
        && base_isheet.map_or(true, |sheet| reftype.meta().source_sheet.is_a(sheet))
}

impl Graph {
    pub fn new() -> Self {
        Self {
            index: Some(ReferenceIndex::new()),
        }
    }

    /// A graph with no backing index
    pub fn detached() -> Self {
        Self { index: None }
    }

    pub fn is_attached(&self) -> bool {
        self.index.is_some()
    }

    pub fn index(&self) -> Option<&ReferenceIndex> {
        self.index.as_ref()
    }

    /// Current targets of `(source, reftype)` in stored order
    pub fn targets(&self, source: Oid, reftype: RefType) -> &[Oid] {
        self.index
            .as_ref()
            .map(|index| index.targets(source, reftype))
            .unwrap_or(&[])
    }

    /// Replace the entire target list of `(source, reftype)`.
    ///
    /// Publishes one `BackReferenceAdded` per added target and one
    /// `BackReferenceRemoved` per removed target when `send_event` is set.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if `reftype` is not a concrete reference type.
    pub fn set_references(
        &mut self,
        source: Oid,
        targets: &[Oid],
        reftype: RefType,
        events: &mut dyn EventSink,
        send_event: bool,
    ) -> Result<ReferenceChange> {
        if !reftype.is_concrete() {
            return Err(RefGraphError::Configuration {
                details: format!("{reftype} is not a concrete reference type"),
            });
        }
        let Some(index) = self.index.as_mut() else {
            return Ok(ReferenceChange::default());
        };

        let change = index.replace(source, reftype, targets);
        if change.is_empty() {
            return Ok(change);
        }
        tracing::trace!(
            source = %source,
            reftype = %reftype,
            added = change.added.len(),
            removed = change.removed.len(),
            "references replaced"
        );
        if send_event {
            for target in &change.added {
                events.publish(&Event::back_reference_added(Reference::new(
                    source, reftype, *target,
                )));
            }
            for target in &change.removed {
                events.publish(&Event::back_reference_removed(Reference::new(
                    source, reftype, *target,
                )));
            }
        }
        Ok(change)
    }

    /// Set every reference field of `isheet` named in `references`.
    ///
    /// `Reference(None)` leaves its field untouched; `Reference(Some(x))` is
    /// stored as `[x]`.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if a field is not a reference field of
    /// `isheet` or carries a scalar value. Nothing is written in that case.
    pub fn set_references_for_isheet(
        &mut self,
        source: Oid,
        isheet: Sheet,
        references: &SheetData,
        events: &mut dyn EventSink,
        send_event: bool,
    ) -> Result<()> {
        let mut writes = Vec::new();
        for (field, value) in references {
            let reftype = isheet.reftype_for_field(field).ok_or_else(|| {
                RefGraphError::Configuration {
                    details: format!("{isheet} has no reference field '{field}'"),
                }
            })?;
            match value {
                FieldValue::Reference(None) => {}
                FieldValue::Value(_) => {
                    return Err(RefGraphError::Configuration {
                        details: format!("{isheet}.{field} expects references"),
                    })
                }
                other => writes.push((reftype, other.targets().unwrap_or_default())),
            }
        }
        for (reftype, targets) in writes {
            self.set_references(source, &targets, reftype, events, send_event)?;
        }
        Ok(())
    }

    /// Edges out of `source`, optionally restricted to subtypes of
    /// `base_reftype` and to reftypes declared on (subsheets of) `base_isheet`.
    ///
    /// The returned iterator is lazy and can be cloned to restart it.
    pub fn get_references(
        &self,
        source: Oid,
        base_reftype: Option<RefType>,
        base_isheet: Option<Sheet>,
    ) -> impl Iterator<Item = Reference> + Clone + '_ {
        self.index
            .iter()
            .flat_map(move |index| index.outgoing(source))
            .filter(move |(reftype, _)| matches_filter(*reftype, base_reftype, base_isheet))
            .flat_map(move |(reftype, targets)| {
                targets
                    .iter()
                    .map(move |target| Reference::new(source, reftype, *target))
            })
    }

    /// Edges into `target`, filtered like `get_references`
    pub fn get_back_references(
        &self,
        target: Oid,
        base_reftype: Option<RefType>,
        base_isheet: Option<Sheet>,
    ) -> impl Iterator<Item = Reference> + Clone + '_ {
        self.index
            .iter()
            .flat_map(move |index| index.incoming(target))
            .filter(move |(reftype, _)| matches_filter(*reftype, base_reftype, base_isheet))
            .flat_map(move |(reftype, sources)| {
                sources
                    .iter()
                    .map(move |source| Reference::new(*source, reftype, target))
            })
    }

    /// Targets of `source` grouped by field, for fields declared on `isheet`
    /// or its subsheets
    pub fn get_references_for_isheet(
        &self,
        source: Oid,
        isheet: Sheet,
    ) -> BTreeMap<&'static str, Vec<Oid>> {
        let mut grouped: BTreeMap<&'static str, Vec<Oid>> = BTreeMap::new();
        for reference in self.get_references(source, None, Some(isheet)) {
            grouped
                .entry(reference.field)
                .or_default()
                .push(reference.target);
        }
        grouped
    }

    /// Sources referencing `target` grouped by field, for fields declared on
    /// `isheet` or its subsheets
    pub fn get_back_references_for_isheet(
        &self,
        target: Oid,
        isheet: Sheet,
    ) -> BTreeMap<&'static str, Vec<Oid>> {
        let mut grouped: BTreeMap<&'static str, Vec<Oid>> = BTreeMap::new();
        for reference in self.get_back_references(target, None, Some(isheet)) {
            grouped
                .entry(reference.field)
                .or_default()
                .push(reference.source);
        }
        grouped
    }

    /// Sources referencing `target` through `reftype` or one of its subtypes
    pub fn get_back_reference_sources(&self, target: Oid, reftype: RefType) -> Vec<Oid> {
        let mut sources: Vec<Oid> = self
            .get_back_references(target, Some(reftype), None)
            .map(|reference| reference.source)
            .collect();
        sources.sort_unstable();
        sources.dedup();
        sources
    }

    /// Reftypes registered on this store, filtered by base type and
    /// declaring sheet.
    ///
    /// A reftype is registered once an edge of that type is stored and stays
    /// registered while any such edge exists. Empty for a detached graph.
    pub fn get_reftypes(
        &self,
        base_reftype: Option<RefType>,
        base_isheet: Option<Sheet>,
    ) -> Vec<RefType> {
        let Some(index) = &self.index else {
            return Vec::new();
        };
        index
            .reftypes()
            .into_iter()
            .filter(|reftype| matches_filter(*reftype, base_reftype, base_isheet))
            .collect()
    }
}
