//! Transactions
//!
//! A `Transaction` owns a working copy of the committed `Content`. Every
//! cascaded mutation (edges, tags, auto-updated versions) is applied to that
//! copy; `commit` hands it back, dropping the transaction discards it.
//!
//! Events raised while the transaction runs are delivered synchronously to
//! the injected sink and to the engine's own subscribers (catalog reindexing,
//! changelog bookkeeping, auto-update propagation).

use refgraph_core_types::{Oid, RequestContext};

use crate::autoupdate;
use crate::catalog::Catalog;
use crate::changelog::Changelog;
use crate::config::EngineConfig;
use crate::content::{MemoryObjectStore, ObjectStore};
use crate::errors::{RefGraphError, Result};
use crate::events::{Event, EventSink};
use crate::graph::removal::send_back_reference_removal_notifications;
use crate::graph::{Graph, ReferenceChange};
use crate::model::{Node, RefType, Reference, ResourceType, Sheet, SheetData};

/// Committed state: object tree plus reference graph
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub objects: MemoryObjectStore,
    pub graph: Graph,
}

impl Content {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Oid {
        self.objects.root()
    }

    pub fn resolve(&self, oid: Oid) -> Option<&Node> {
        self.objects.resolve(oid)
    }

    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown oid.
    pub fn node(&self, oid: Oid) -> Result<&Node> {
        self.objects
            .resolve(oid)
            .ok_or(RefGraphError::ResourceNotFound { oid })
    }
}

/// Collaborators a transaction publishes to
pub struct Environment<'e> {
    pub config: &'e EngineConfig,
    pub events: &'e mut dyn EventSink,
    pub catalog: &'e mut dyn Catalog,
    pub context: RequestContext,
}

impl<'e> Environment<'e> {
    pub fn new(
        config: &'e EngineConfig,
        events: &'e mut dyn EventSink,
        catalog: &'e mut dyn Catalog,
    ) -> Self {
        Self {
            config,
            events,
            catalog,
            context: RequestContext::new(),
        }
    }

    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }
}

pub struct Transaction<'e> {
    content: Content,
    changelog: Changelog,
    config: &'e EngineConfig,
    events: &'e mut dyn EventSink,
    catalog: &'e mut dyn Catalog,
    context: RequestContext,
}

impl<'e> Transaction<'e> {
    pub fn begin(content: Content, env: Environment<'e>) -> Self {
        tracing::debug!(transaction_id = %env.context.transaction_id, "transaction begin");
        Self {
            content,
            changelog: Changelog::new(),
            config: env.config,
            events: env.events,
            catalog: env.catalog,
            context: env.context,
        }
    }

    /// Finish the transaction, returning the new state and what changed
    pub fn commit(self) -> (Content, Changelog) {
        tracing::debug!(
            transaction_id = %self.context.transaction_id,
            changed = self.changelog.len(),
            "transaction commit"
        );
        (self.content, self.changelog)
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn objects(&self) -> &MemoryObjectStore {
        &self.content.objects
    }

    pub fn graph(&self) -> &Graph {
        &self.content.graph
    }

    pub fn changelog(&self) -> &Changelog {
        &self.changelog
    }

    pub fn config(&self) -> &'e EngineConfig {
        self.config
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    pub fn creator(&self) -> Option<Oid> {
        self.context.creator
    }

    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown oid.
    pub fn node(&self, oid: Oid) -> Result<&Node> {
        self.content.node(oid)
    }

    pub(crate) fn create_child(
        &mut self,
        parent: Oid,
        name: &str,
        resource_type: ResourceType,
    ) -> Result<Oid> {
        let oid = self
            .content
            .objects
            .create_child(parent, name, resource_type)?;
        self.changelog.mark_created(oid);
        Ok(oid)
    }

    pub(crate) fn autoname(&self, parent: Oid, prefix: &str) -> String {
        self.content
            .objects
            .next_name(parent, prefix, self.config.versions.autonaming_width)
    }

    pub(crate) fn node_mut(&mut self, oid: Oid) -> Result<&mut Node> {
        self.content
            .objects
            .resolve_mut(oid)
            .ok_or(RefGraphError::ResourceNotFound { oid })
    }

    /// Record a modification of an existing resource
    pub fn mark_modified(&mut self, oid: Oid) {
        if let Some(node) = self.content.objects.resolve_mut(oid) {
            node.touch();
        }
        if !self.changelog.was_created(oid) {
            self.changelog.mark_modified(oid);
        }
    }

    pub fn reindex(&mut self, oid: Oid, index: &str) {
        self.catalog.reindex(oid, index);
    }

    /// `Graph::set_references` with the resulting events dispatched
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for a non-concrete reftype, or any error raised
    /// by event subscribers.
    pub fn set_references(
        &mut self,
        source: Oid,
        targets: &[Oid],
        reftype: RefType,
        send_event: bool,
    ) -> Result<ReferenceChange> {
        let mut raised: Vec<Event> = Vec::new();
        let change =
            self.content
                .graph
                .set_references(source, targets, reftype, &mut raised, send_event)?;
        self.dispatch(raised)?;
        Ok(change)
    }

    /// `Graph::set_references_for_isheet` with the resulting events dispatched
    ///
    /// # Errors
    ///
    /// Returns `Configuration` for fields that are not reference fields.
    pub fn set_references_for_isheet(
        &mut self,
        source: Oid,
        isheet: Sheet,
        references: &SheetData,
        send_event: bool,
    ) -> Result<()> {
        let mut raised: Vec<Event> = Vec::new();
        self.content.graph.set_references_for_isheet(
            source,
            isheet,
            references,
            &mut raised,
            send_event,
        )?;
        self.dispatch(raised)
    }

    /// Publish `BackReferenceRemoved` for every reference leaving the
    /// subtree of `resource`; returns the number of notifications sent.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown resource.
    pub fn notify_removal(&mut self, resource: Oid) -> Result<usize> {
        self.node(resource)?;
        let references = self
            .content
            .graph
            .get_references_for_removal_notification(resource, &self.content.objects);
        let mut raised: Vec<Event> = Vec::new();
        send_back_reference_removal_notifications(&references, &mut raised);
        let sent = raised.len();
        self.dispatch(raised)?;
        Ok(sent)
    }

    fn dispatch(&mut self, raised: Vec<Event>) -> Result<()> {
        for event in raised {
            self.notify(event)?;
        }
        Ok(())
    }

    /// Deliver one event to the sink and to the engine's subscribers
    ///
    /// # Errors
    ///
    /// Propagates errors from auto-update handling, which aborts the
    /// transaction.
    pub fn notify(&mut self, event: Event) -> Result<()> {
        tracing::trace!(kind = ?event.kind(), object = %event.object(), "event");
        self.events.publish(&event);
        match &event {
            Event::BackReferenceAdded(e) | Event::BackReferenceRemoved(e) => {
                let index = &self.config.catalog.reference_index;
                self.catalog.reindex(e.object, index);
                Ok(())
            }
            Event::ItemVersionNewVersionAdded(e) => {
                self.changelog.set_followed_by(e.object, e.new_version);
                Ok(())
            }
            Event::SheetReferencedItemHasNewVersion(e) => autoupdate::handle(self, e),
        }
    }

    /// References out of `source` as a snapshot, safe to hold across
    /// mutations of the transaction
    pub fn references_of(&self, source: Oid, base_reftype: Option<RefType>) -> Vec<Reference> {
        self.content
            .graph
            .get_references(source, base_reftype, None)
            .collect()
    }
}
