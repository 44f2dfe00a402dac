//! Change events and the publish/subscribe handles they travel through
//!
//! Events are delivered synchronously and in-process. Every operation that
//! may raise events receives an explicit `EventSink`; there is no global bus.

use refgraph_core_types::Oid;

use crate::model::{RefType, Reference, Sheet};

/// Payload of back-reference events, keyed on the reference target
#[derive(Debug, Clone, PartialEq)]
pub struct BackReferenceEvent {
    /// The target that gained or lost a back reference
    pub object: Oid,
    /// Sheet declaring the reference field on the source
    pub isheet: Sheet,
    pub reference: Reference,
}

/// A new version was added after `object`
#[derive(Debug, Clone, PartialEq)]
pub struct NewVersionEvent {
    pub object: Oid,
    pub new_version: Oid,
    pub creator: Option<Oid>,
}

/// `object` references `old_version` through `isheet.isheet_field`, and
/// `new_version` now follows it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencedItemHasNewVersion {
    pub object: Oid,
    pub isheet: Sheet,
    pub isheet_field: &'static str,
    pub reftype: RefType,
    pub old_version: Oid,
    pub new_version: Oid,
    /// Auto-update scope; empty means unrestricted
    pub root_versions: Vec<Oid>,
    pub creator: Option<Oid>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    BackReferenceAdded(BackReferenceEvent),
    BackReferenceRemoved(BackReferenceEvent),
    ItemVersionNewVersionAdded(NewVersionEvent),
    SheetReferencedItemHasNewVersion(ReferencedItemHasNewVersion),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BackReferenceAdded,
    BackReferenceRemoved,
    ItemVersionNewVersionAdded,
    SheetReferencedItemHasNewVersion,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::BackReferenceAdded(_) => EventKind::BackReferenceAdded,
            Event::BackReferenceRemoved(_) => EventKind::BackReferenceRemoved,
            Event::ItemVersionNewVersionAdded(_) => EventKind::ItemVersionNewVersionAdded,
            Event::SheetReferencedItemHasNewVersion(_) => {
                EventKind::SheetReferencedItemHasNewVersion
            }
        }
    }

    /// The resource the event is about
    pub fn object(&self) -> Oid {
        match self {
            Event::BackReferenceAdded(e) | Event::BackReferenceRemoved(e) => e.object,
            Event::ItemVersionNewVersionAdded(e) => e.object,
            Event::SheetReferencedItemHasNewVersion(e) => e.object,
        }
    }

    pub(crate) fn back_reference_added(reference: Reference) -> Self {
        Event::BackReferenceAdded(BackReferenceEvent {
            object: reference.target,
            isheet: reference.isheet,
            reference,
        })
    }

    pub(crate) fn back_reference_removed(reference: Reference) -> Self {
        Event::BackReferenceRemoved(BackReferenceEvent {
            object: reference.target,
            isheet: reference.isheet,
            reference,
        })
    }
}

/// Receiving end of published events
pub trait EventSink {
    fn publish(&mut self, event: &Event);
}

impl EventSink for Vec<Event> {
    fn publish(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&mut self, _event: &Event) {}
}

/// Keeps every published event for later inspection
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Vec<Event>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn of_kind(&self, kind: EventKind) -> Vec<&Event> {
        self.events.iter().filter(|e| e.kind() == kind).collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn publish(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}

type Handler<'a> = Box<dyn FnMut(&Event) + 'a>;

/// Publish/subscribe handle dispatching by event kind
#[derive(Default)]
pub struct EventBus<'a> {
    subscribers: Vec<(EventKind, Handler<'a>)>,
}

impl<'a> EventBus<'a> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, kind: EventKind, handler: impl FnMut(&Event) + 'a) {
        self.subscribers.push((kind, Box::new(handler)));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl EventSink for EventBus<'_> {
    fn publish(&mut self, event: &Event) {
        let kind = event.kind();
        for (subscribed, handler) in self.subscribers.iter_mut() {
            if *subscribed == kind {
                handler(event);
            }
        }
    }
}

impl std::fmt::Debug for EventBus<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
