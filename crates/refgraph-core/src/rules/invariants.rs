use std::collections::BTreeSet;

use refgraph_core_types::Oid;

use crate::config::EngineConfig;
use crate::model::{RefType, ResourceKind};
use crate::transaction::Content;
use crate::versions::tags::{find_tag, last_versions, tag_elements};

/// Edges recorded in only one direction of the reference index
pub fn find_index_asymmetries(content: &Content) -> Vec<(Oid, RefType, Oid)> {
    content
        .graph
        .index()
        .map(|index| index.asymmetries())
        .unwrap_or_default()
}

/// Items whose FIRST/LAST tags are missing, empty, point outside the item,
/// or hold several tips on a linear item
///
/// Returns list of (item, reason) tuples
pub fn find_items_with_broken_tags(
    content: &Content,
    config: &EngineConfig,
) -> Vec<(Oid, String)> {
    let mut broken = Vec::new();
    let items = content
        .objects
        .nodes()
        .filter(|node| node.kind() == ResourceKind::Item);

    for item in items {
        for name in [&config.versions.first_tag, &config.versions.last_tag] {
            let Some(tag) = find_tag(content, item.oid, name) else {
                broken.push((item.oid, format!("missing {name} tag")));
                continue;
            };
            let elements = tag_elements(content, tag);
            if elements.is_empty() {
                broken.push((item.oid, format!("{name} tag is empty")));
            }
            let foreign = elements.iter().find(|version| {
                !content.resolve(**version).is_some_and(|node| {
                    node.parent == Some(item.oid) && node.kind() == ResourceKind::ItemVersion
                })
            });
            if let Some(version) = foreign {
                broken.push((
                    item.oid,
                    format!("{name} tag points at {version}, not a version of this item"),
                ));
            }
            let linear = !item.resource_type.is_forkable() || *name == config.versions.first_tag;
            if linear && elements.len() > 1 {
                let count = elements.len();
                broken.push((item.oid, format!("{name} tag holds {count} versions")));
            }
        }
    }
    broken
}

/// Versions following something other than a sibling version
///
/// Returns list of (version, predecessor) tuples
pub fn find_foreign_predecessors(content: &Content) -> Vec<(Oid, Oid)> {
    let mut foreign = Vec::new();
    let versions = content
        .objects
        .nodes()
        .filter(|node| node.kind() == ResourceKind::ItemVersion);
    for version in versions {
        for predecessor in content.graph.targets(version.oid, RefType::VersionableFollows) {
            let sibling = content
                .resolve(*predecessor)
                .is_some_and(|node| node.parent == version.parent);
            if !sibling {
                foreign.push((version.oid, *predecessor));
            }
        }
    }
    foreign
}

/// Versions that no LAST version reaches through `follows`
///
/// Every version is created behind the item's LAST tag, so each one stays
/// an ancestor of some current tip.
///
/// Returns list of (item, version) tuples
pub fn find_versions_outside_history(
    content: &Content,
    config: &EngineConfig,
) -> Vec<(Oid, Oid)> {
    let mut outside = Vec::new();
    let items = content
        .objects
        .nodes()
        .filter(|node| node.kind() == ResourceKind::Item);

    for item in items {
        let mut reached = BTreeSet::new();
        let mut pending = last_versions(content, item.oid, &config.versions.last_tag);
        while let Some(version) = pending.pop() {
            if reached.insert(version) {
                let predecessors = content.graph.targets(version, RefType::VersionableFollows);
                pending.extend_from_slice(predecessors);
            }
        }
        let unreached = item.children.values().copied().filter(|child| {
            content
                .resolve(*child)
                .is_some_and(|node| node.kind() == ResourceKind::ItemVersion)
                && !reached.contains(child)
        });
        outside.extend(unreached.map(|version| (item.oid, version)));
    }
    outside
}

/// Versions of linear items that are followed by several versions or follow
/// several versions
///
/// Returns list of (item, version) tuples
pub fn find_forks_in_linear_items(content: &Content) -> Vec<(Oid, Oid)> {
    let mut forks = Vec::new();
    let versions = content.objects.nodes().filter(|node| {
        node.kind() == ResourceKind::ItemVersion && !node.resource_type.is_forkable()
    });
    for version in versions {
        let Some(item) = version.parent else {
            continue;
        };
        let followers = content
            .graph
            .get_back_reference_sources(version.oid, RefType::VersionableFollows)
            .len();
        let predecessors = content
            .graph
            .targets(version.oid, RefType::VersionableFollows)
            .len();
        if followers > 1 || predecessors > 1 {
            forks.push((item, version.oid));
        }
    }
    forks
}
