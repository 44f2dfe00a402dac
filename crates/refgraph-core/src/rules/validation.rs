use crate::config::EngineConfig;
use crate::errors::{RefGraphError, Result};
use crate::transaction::Content;

use super::invariants;

/// Validate the whole content
///
/// 1. Forward and backward reference indices mirror each other
/// 2. Every item has non-empty FIRST and LAST tags holding its own versions,
///    with a single LAST version unless the item is forkable
/// 3. Versions only follow versions of the same item
/// 4. Every version is an ancestor of a LAST version
/// 5. Versions of linear items neither fork nor merge
///
/// # Errors
///
/// Returns the first violation found. Call the individual invariant
/// functions for exhaustive reporting.
pub fn validate_content(content: &Content, config: &EngineConfig) -> Result<()> {
    let asymmetries = invariants::find_index_asymmetries(content);
    if let Some((source_oid, reftype, target)) = asymmetries.first() {
        return Err(RefGraphError::IndexAsymmetry {
            source_oid: *source_oid,
            reftype: *reftype,
            target: *target,
        });
    }

    let broken_tags = invariants::find_items_with_broken_tags(content, config);
    if let Some((item, reason)) = broken_tags.first() {
        return Err(RefGraphError::TagInvariantViolation {
            item: *item,
            reason: reason.clone(),
        });
    }

    let outside = invariants::find_versions_outside_history(content, config);
    if let Some((item, version)) = outside.first() {
        return Err(RefGraphError::TagInvariantViolation {
            item: *item,
            reason: format!("version {version} is not reachable from the LAST tag"),
        });
    }

    let forks = invariants::find_forks_in_linear_items(content);
    if let Some((item, version)) = forks.first() {
        return Err(RefGraphError::TagInvariantViolation {
            item: *item,
            reason: format!("version {version} forks the linear history"),
        });
    }

    let foreign = invariants::find_foreign_predecessors(content);
    if let Some((version, predecessor)) = foreign.first() {
        return Err(RefGraphError::NotAVersionOf {
            version: *predecessor,
            item: content
                .resolve(*version)
                .and_then(|node| node.parent)
                .unwrap_or(*version),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use refgraph_core_types::Oid;

    use super::*;
    use crate::catalog::NullCatalog;
    use crate::events::NullSink;
    use crate::model::{Appstructs, RefType, ResourceType};
    use crate::resources::create_child_resource;
    use crate::transaction::{Environment, Transaction};
    use crate::versions::{create_item, create_version};

    /// Run `f` in a committed transaction without validation
    fn committed<T>(
        content: Content,
        config: &EngineConfig,
        f: impl FnOnce(&mut Transaction<'_>) -> T,
    ) -> (Content, T) {
        let (mut sink, mut catalog) = (NullSink, NullCatalog);
        let mut tx = Transaction::begin(content, Environment::new(config, &mut sink, &mut catalog));
        let value = f(&mut tx);
        let (content, _changelog) = tx.commit();
        (content, value)
    }

    /// Item with V1 and V2 created through the version DAG
    fn two_versions(item_type: ResourceType, config: &EngineConfig) -> (Content, [Oid; 4]) {
        committed(Content::new(), config, |tx| {
            let root = tx.content().root();
            let item = create_item(
                tx,
                root,
                Some("item"),
                item_type,
                &Appstructs::new(),
                &Appstructs::new(),
            )
            .unwrap();
            let v2 = create_version(tx, item.item, &[item.first_version], &Appstructs::new(), &[])
                .unwrap();
            [item.item, item.first_version, v2, item.last_tag]
        })
    }

    #[test]
    fn test_empty_content_is_valid() {
        let content = Content::new();
        assert!(validate_content(&content, &EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_history_built_by_create_version_is_valid() {
        let config = EngineConfig::default();
        let (content, _) = two_versions(ResourceType::Item, &config);

        assert!(validate_content(&content, &config).is_ok());
    }

    #[test]
    fn test_version_created_beside_the_history_is_rejected() {
        // GIVEN V1 -> V2 and a second successor of V1 made without create_version
        let config = EngineConfig::default();
        let (content, [item, v1, _, _]) = two_versions(ResourceType::Item, &config);
        let (content, stray) = committed(content, &config, |tx| {
            let stray =
                create_child_resource(tx, item, None, ResourceType::ItemVersion, &Appstructs::new())
                    .unwrap();
            tx.set_references(stray, &[v1], RefType::VersionableFollows, true)
                .unwrap();
            stray
        });

        // WHEN the content is validated
        let result = validate_content(&content, &config);

        // THEN the stray version is reported as unreachable from LAST
        assert_eq!(
            invariants::find_versions_outside_history(&content, &config),
            vec![(item, stray)]
        );
        assert!(matches!(
            result,
            Err(RefGraphError::TagInvariantViolation { item: broken, ref reason })
                if broken == item && reason.contains("not reachable")
        ));
    }

    #[test]
    fn test_fork_of_a_linear_item_is_rejected_even_when_tagged() {
        // GIVEN V1 -> V2 plus a V3 following both, tagged LAST
        let config = EngineConfig::default();
        let (content, [item, v1, v2, last_tag]) = two_versions(ResourceType::Item, &config);
        let (content, v3) = committed(content, &config, |tx| {
            let v3 =
                create_child_resource(tx, item, None, ResourceType::ItemVersion, &Appstructs::new())
                    .unwrap();
            tx.set_references(v3, &[v1, v2], RefType::VersionableFollows, true)
                .unwrap();
            tx.set_references(last_tag, &[v3], RefType::TagElements, true)
                .unwrap();
            v3
        });

        // WHEN the content is validated
        let forks = invariants::find_forks_in_linear_items(&content);
        let result = validate_content(&content, &config);

        // THEN V1 (two followers) and V3 (two predecessors) are forks
        assert_eq!(forks, vec![(item, v1), (item, v3)]);
        assert!(matches!(
            result,
            Err(RefGraphError::TagInvariantViolation { ref reason, .. }) if reason.contains("forks")
        ));
    }

    #[test]
    fn test_forkable_items_may_branch() {
        let config = EngineConfig::default();
        let (content, [item, v1, _, _]) = two_versions(ResourceType::ForkableItem, &config);
        let (content, _) = committed(content, &config, |tx| {
            create_version(tx, item, &[v1], &Appstructs::new(), &[]).unwrap()
        });

        assert!(invariants::find_forks_in_linear_items(&content).is_empty());
        assert!(validate_content(&content, &config).is_ok());
    }
}
