#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{oids, refs};
use refgraph_core::errors::RefGraphError;
use refgraph_core::events::NullSink;
use refgraph_core::model::SheetData;
use refgraph_core::{Event, FieldValue, Graph, Oid, RefType, Sheet};

fn removed_targets(events: &[Event]) -> Vec<Oid> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::BackReferenceRemoved(e) => Some(e.object),
            _ => None,
        })
        .collect()
}

fn added_targets(events: &[Event]) -> Vec<Oid> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::BackReferenceAdded(e) => Some(e.object),
            _ => None,
        })
        .collect()
}

#[test]
fn test_replacing_targets_notifies_only_the_difference() {
    // GIVEN A -> [B, C]
    let mut graph = Graph::new();
    let [a, b, c]: [Oid; 3] = oids(&[1, 2, 3]).try_into().unwrap();
    graph
        .set_references(a, &[b, c], RefType::FeaturedElements, &mut NullSink, true)
        .unwrap();

    // WHEN the target set shrinks to [C]
    let mut events: Vec<Event> = Vec::new();
    graph
        .set_references(a, &[c], RefType::FeaturedElements, &mut events, true)
        .unwrap();

    // THEN exactly one removal for B and nothing for C
    assert_eq!(events.len(), 1);
    match &events[0] {
        Event::BackReferenceRemoved(e) => {
            assert_eq!(e.object, b);
            assert_eq!(e.isheet, Sheet::Featured);
            assert_eq!(e.reference.source, a);
            assert_eq!(e.reference.reftype, RefType::FeaturedElements);
            assert_eq!(e.reference.field, "elements");
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(graph.targets(a, RefType::FeaturedElements), &[c]);
}

#[test]
fn test_added_events_come_before_removed_events() {
    // GIVEN A -> [B]
    let mut graph = Graph::new();
    let [a, b, c, d]: [Oid; 4] = oids(&[1, 2, 3, 4]).try_into().unwrap();
    graph
        .set_references(a, &[b], RefType::FeaturedElements, &mut NullSink, true)
        .unwrap();

    // WHEN B is swapped for C and D
    let mut events: Vec<Event> = Vec::new();
    let change = graph
        .set_references(a, &[c, d], RefType::FeaturedElements, &mut events, true)
        .unwrap();

    // THEN additions are reported first, then the removal
    assert_eq!(change.added, vec![c, d]);
    assert_eq!(change.removed, vec![b]);
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], Event::BackReferenceAdded(_)));
    assert!(matches!(events[1], Event::BackReferenceAdded(_)));
    assert!(matches!(events[2], Event::BackReferenceRemoved(_)));
    assert_eq!(added_targets(&events), vec![c, d]);
    assert_eq!(removed_targets(&events), vec![b]);
}

#[test]
fn test_setting_the_same_targets_twice_is_silent() {
    let mut graph = Graph::new();
    let [a, b, c]: [Oid; 3] = oids(&[1, 2, 3]).try_into().unwrap();
    graph
        .set_references(a, &[b, c], RefType::TagElements, &mut NullSink, true)
        .unwrap();

    let mut events: Vec<Event> = Vec::new();
    let change = graph
        .set_references(a, &[b, c], RefType::TagElements, &mut events, true)
        .unwrap();

    assert!(change.is_empty());
    assert!(events.is_empty());
}

#[test]
fn test_send_event_false_still_updates_the_index() {
    let mut graph = Graph::new();
    let [a, b]: [Oid; 2] = oids(&[1, 2]).try_into().unwrap();

    let mut events: Vec<Event> = Vec::new();
    let change = graph
        .set_references(a, &[b], RefType::CommentRefersTo, &mut events, false)
        .unwrap();

    assert!(events.is_empty());
    assert_eq!(change.added, vec![b]);
    assert_eq!(graph.get_back_reference_sources(b, RefType::SheetToSheet), vec![a]);
}

#[test]
fn test_duplicate_targets_collapse_to_first_occurrence() {
    let mut graph = Graph::new();
    let [a, b, c]: [Oid; 3] = oids(&[1, 2, 3]).try_into().unwrap();

    let mut events: Vec<Event> = Vec::new();
    graph
        .set_references(a, &[c, b, c, b], RefType::DocumentElements, &mut events, true)
        .unwrap();

    assert_eq!(graph.targets(a, RefType::DocumentElements), &[c, b]);
    assert_eq!(added_targets(&events), vec![c, b]);
}

#[test]
fn test_ordered_reftype_keeps_caller_order() {
    let mut graph = Graph::new();
    let [a, b, c, d]: [Oid; 4] = oids(&[1, 2, 3, 4]).try_into().unwrap();
    graph
        .set_references(a, &[d, b, c], RefType::DocumentElements, &mut NullSink, true)
        .unwrap();

    // WHEN only the order changes
    let mut events: Vec<Event> = Vec::new();
    graph
        .set_references(a, &[b, c, d], RefType::DocumentElements, &mut events, true)
        .unwrap();

    // THEN the stored sequence follows, without any back-reference churn
    assert_eq!(graph.targets(a, RefType::DocumentElements), &[b, c, d]);
    assert!(events.is_empty());
}

#[test]
fn test_clearing_targets_removes_back_references() {
    let mut graph = Graph::new();
    let [a, b]: [Oid; 2] = oids(&[1, 2]).try_into().unwrap();
    graph
        .set_references(a, &[b], RefType::FeaturedElements, &mut NullSink, true)
        .unwrap();

    let mut events: Vec<Event> = Vec::new();
    graph
        .set_references(a, &[], RefType::FeaturedElements, &mut events, true)
        .unwrap();

    assert!(graph.targets(a, RefType::FeaturedElements).is_empty());
    assert_eq!(graph.get_back_references(b, None, None).count(), 0);
    assert_eq!(removed_targets(&events), vec![b]);
}

#[test]
fn test_abstract_reftype_is_rejected() {
    let mut graph = Graph::new();
    let [a, b]: [Oid; 2] = oids(&[1, 2]).try_into().unwrap();

    let result = graph.set_references(a, &[b], RefType::SheetToSheet, &mut NullSink, true);

    assert!(matches!(result, Err(RefGraphError::Configuration { .. })));
    assert_eq!(graph.get_references(a, None, None).count(), 0);
}

#[test]
fn test_reftypes_of_one_source_are_independent() {
    let mut graph = Graph::new();
    let [a, b, c]: [Oid; 3] = oids(&[1, 2, 3]).try_into().unwrap();
    graph
        .set_references(a, &[b], RefType::FeaturedElements, &mut NullSink, true)
        .unwrap();
    graph
        .set_references(a, &[c], RefType::VersionableFollows, &mut NullSink, true)
        .unwrap();

    graph
        .set_references(a, &[], RefType::FeaturedElements, &mut NullSink, true)
        .unwrap();

    assert_eq!(graph.targets(a, RefType::VersionableFollows), &[c]);
}

#[test]
fn test_set_references_for_isheet_writes_each_field() {
    // GIVEN a comment sheet mapping with a single reference
    let mut graph = Graph::new();
    let [a, b]: [Oid; 2] = oids(&[1, 2]).try_into().unwrap();
    let mut data = SheetData::new();
    data.insert("refers_to".to_string(), FieldValue::Reference(Some(b)));

    // WHEN the mapping is applied
    let mut events: Vec<Event> = Vec::new();
    graph
        .set_references_for_isheet(a, Sheet::Comment, &data, &mut events, true)
        .unwrap();

    // THEN the single value is stored as a one-element list
    assert_eq!(graph.targets(a, RefType::CommentRefersTo), &[b]);
    assert_eq!(added_targets(&events), vec![b]);
}

#[test]
fn test_set_references_for_isheet_skips_absent_single_reference() {
    let mut graph = Graph::new();
    let [a, b]: [Oid; 2] = oids(&[1, 2]).try_into().unwrap();
    graph
        .set_references(a, &[b], RefType::CommentRefersTo, &mut NullSink, true)
        .unwrap();
    let mut data = SheetData::new();
    data.insert("refers_to".to_string(), FieldValue::Reference(None));

    let mut events: Vec<Event> = Vec::new();
    graph
        .set_references_for_isheet(a, Sheet::Comment, &data, &mut events, true)
        .unwrap();

    assert_eq!(graph.targets(a, RefType::CommentRefersTo), &[b]);
    assert!(events.is_empty());
}

#[test]
fn test_set_references_for_isheet_uses_inherited_fields() {
    let mut graph = Graph::new();
    let [a, b]: [Oid; 2] = oids(&[1, 2]).try_into().unwrap();
    let mut data = SheetData::new();
    data.insert("follows".to_string(), refs(&[b]));

    graph
        .set_references_for_isheet(a, Sheet::ForkableVersionable, &data, &mut NullSink, true)
        .unwrap();

    assert_eq!(graph.targets(a, RefType::VersionableFollows), &[b]);
}

#[test]
fn test_set_references_for_isheet_rejects_unknown_fields_before_writing() {
    // GIVEN a mapping with one valid and one unknown field
    let mut graph = Graph::new();
    let [a, b]: [Oid; 2] = oids(&[1, 2]).try_into().unwrap();
    let mut data = SheetData::new();
    data.insert("elements".to_string(), refs(&[b]));
    data.insert("title".to_string(), refs(&[b]));

    // WHEN applied to the document sheet
    let result = graph.set_references_for_isheet(a, Sheet::Document, &data, &mut NullSink, true);

    // THEN nothing is written
    assert!(matches!(result, Err(RefGraphError::Configuration { .. })));
    assert!(graph.targets(a, RefType::DocumentElements).is_empty());
}

#[test]
fn test_set_references_for_isheet_rejects_scalar_values() {
    let mut graph = Graph::new();
    let a = Oid::new(1);
    let mut data = SheetData::new();
    data.insert("elements".to_string(), FieldValue::Value(serde_json::json!(3)));

    let result = graph.set_references_for_isheet(a, Sheet::Featured, &data, &mut NullSink, true);

    assert!(matches!(result, Err(RefGraphError::Configuration { .. })));
}

#[test]
fn test_empty_mapping_is_a_no_op() {
    let mut graph = Graph::new();
    let mut events: Vec<Event> = Vec::new();

    graph
        .set_references_for_isheet(Oid::new(1), Sheet::Featured, &SheetData::new(), &mut events, true)
        .unwrap();

    assert!(events.is_empty());
    assert_eq!(graph.index().unwrap().edge_count(), 0);
}
