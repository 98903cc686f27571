//! Inversion engine
//!
//! Computes the complement of a set of action patterns across the whole
//! catalog: every known `service:action` the patterns do not match. This is
//! what a policy's `NotAction` field means, so inverting one produces the
//! equivalent `Action` list.
//!
//! Inversion always walks the entire catalog, however narrow the input
//! patterns are.

use crate::catalog::CatalogProvider;
use crate::error::{ExpandError, Result};
use crate::pattern::{self, WildcardPattern};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};

/// Invert a set of action patterns against the catalog.
///
/// The result is deduplicated and sorted lexicographically. Malformed
/// entries are skipped; an empty input fails with
/// [`ExpandError::EmptyInput`], since inverting nothing would silently mean
/// "everything".
pub async fn invert_actions(
    catalog: &dyn CatalogProvider,
    patterns: &[String],
) -> Result<Vec<String>> {
    if patterns.is_empty() {
        return Err(ExpandError::EmptyInput);
    }

    let mut excluded_services: HashSet<String> = HashSet::new();
    let mut exclusions: HashMap<String, Vec<WildcardPattern>> = HashMap::new();

    for raw in patterns {
        let raw = raw.trim();
        if pattern::is_asterisk_run(raw) {
            // excluding everything dominates every other pattern
            return Ok(Vec::new());
        }
        let Some((service, action_pattern)) = pattern::split_action(raw) else {
            continue;
        };
        let service = service.to_lowercase();
        if pattern::is_asterisk_run(action_pattern) {
            excluded_services.insert(service);
            continue;
        }
        exclusions
            .entry(service)
            .or_default()
            .push(WildcardPattern::compile(action_pattern));
    }

    let services = catalog.service_keys().await;
    let kept_per_service = join_all(services.iter().map(|service| {
        let excluded = excluded_services.contains(service);
        let matchers = exclusions.get(service.as_str());
        async move {
            if excluded {
                return Vec::new();
            }
            let actions = catalog.actions_for_service(service).await;
            actions
                .into_iter()
                .filter(|action| {
                    matchers.is_none_or(|matchers| {
                        !matchers.iter().any(|matcher| matcher.matches(action))
                    })
                })
                .map(|action| format!("{service}:{action}"))
                .collect()
        }
    }))
    .await;

    let mut result: Vec<String> = kept_per_service.into_iter().flatten().collect();
    result.sort();
    result.dedup();
    Ok(result)
}
