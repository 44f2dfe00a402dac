//! Back-reference notifications for resources about to be removed

use std::collections::BTreeSet;

use refgraph_core_types::Oid;

use crate::content::ObjectStore;
use crate::events::{Event, EventSink};
use crate::graph::Graph;
use crate::model::Reference;

impl Graph {
    /// Outgoing references of `source` and its descendants whose target lies
    /// outside that subtree.
    ///
    /// References between members of the removed subtree are skipped so a
    /// subtree removal does not notify its own children.
    pub fn get_references_for_removal_notification(
        &self,
        source: Oid,
        objects: &dyn ObjectStore,
    ) -> Vec<Reference> {
        let mut subtree = vec![source];
        subtree.extend(objects.descendants(source));
        let members: BTreeSet<Oid> = subtree.iter().copied().collect();

        subtree
            .into_iter()
            .flat_map(|member| self.get_references(member, None, None))
            .filter(|reference| !members.contains(&reference.target))
            .collect()
    }
}

/// Publish one `BackReferenceRemoved` per reference
pub fn send_back_reference_removal_notifications(
    references: &[Reference],
    events: &mut dyn EventSink,
) {
    for reference in references {
        events.publish(&Event::back_reference_removed(*reference));
    }
}
