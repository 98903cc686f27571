//! Expansion engine
//!
//! Resolves wildcard-bearing action patterns into the concrete
//! `service:action` identifiers they cover. A pattern like `s3:Get*` turns
//! into every `s3` action starting with `Get`, in the casing the catalog
//! declares.
//!
//! How lenient resolution is toward bad input is decided entirely by
//! [`ExpansionConfig`]; with the defaults, everything that cannot be
//! resolved silently drops out of the result.

use crate::catalog::CatalogProvider;
use crate::error::{ExpandError, Result};
use crate::pattern::{self, WildcardPattern};
use tracing::debug;

/// What to do with an exact, wildcard-free action that is not in the
/// catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidActionBehavior {
    /// Drop the action from the output.
    #[default]
    Remove,
    /// Keep the original string in the output.
    Include,
    /// Fail with [`ExpandError::InvalidAction`].
    Error,
}

/// Options for the expansion engine.
///
/// The defaults are maximally conservative: wildcard shorthands that AWS
/// itself accepts (`*`, `service:*`) are passed through unexpanded, and
/// invalid input is dropped rather than reported.
#[derive(Debug, Clone, Default)]
pub struct ExpansionConfig {
    /// Expand a lone `*` to every action of every service.
    pub expand_asterisk: bool,

    /// Expand `service:*` to every action of that service.
    pub expand_service_asterisk: bool,

    /// Fail when an action string is not in the `service:action` format.
    pub error_on_invalid_format: bool,

    /// Fail when the service is not in the catalog.
    pub error_on_invalid_service: bool,

    /// Handling of exact actions missing from the catalog.
    pub invalid_action_behavior: InvalidActionBehavior,
}

/// Expand a list of action patterns.
///
/// Every element is expanded with the same config; the concatenated result
/// is deduplicated and sorted lexicographically. An empty input expands to
/// an empty list and never fails.
pub async fn expand_actions(
    catalog: &dyn CatalogProvider,
    patterns: &[String],
    config: &ExpansionConfig,
) -> Result<Vec<String>> {
    let mut all = Vec::new();
    for pattern in patterns {
        all.extend(expand_action(catalog, pattern, config).await?);
    }
    all.sort();
    all.dedup();
    Ok(all)
}

/// Expand a single action pattern.
///
/// Results come back in catalog order; the sorted/deduplicated guarantee
/// belongs to [`expand_actions`]. An empty string expands to an empty list.
pub async fn expand_action(
    catalog: &dyn CatalogProvider,
    pattern: &str,
    config: &ExpansionConfig,
) -> Result<Vec<String>> {
    if pattern.is_empty() {
        return Ok(Vec::new());
    }
    let pattern = pattern.trim();

    if pattern::is_asterisk_run(pattern) {
        if !config.expand_asterisk {
            return Ok(vec!["*".to_string()]);
        }
        let mut all = Vec::new();
        for service in catalog.service_keys().await {
            for action in catalog.actions_for_service(&service).await {
                all.push(format!("{service}:{action}"));
            }
        }
        return Ok(all);
    }

    let Some((service, action_pattern)) = pattern::split_action(pattern) else {
        if config.error_on_invalid_format {
            return Err(ExpandError::InvalidFormat(pattern.to_string()));
        }
        debug!(pattern, "not service:action shaped, dropping");
        return Ok(Vec::new());
    };
    let service = service.to_lowercase();

    if !catalog.service_exists(&service).await {
        if config.error_on_invalid_service {
            return Err(ExpandError::ServiceNotFound(service));
        }
        debug!(service = %service, "service not in catalog, dropping pattern");
        return Ok(Vec::new());
    }

    if pattern::is_asterisk_run(action_pattern) {
        if !config.expand_service_asterisk {
            return Ok(vec![format!("{service}:*")]);
        }
        let actions = catalog.actions_for_service(&service).await;
        return Ok(actions
            .into_iter()
            .map(|action| format!("{service}:{action}"))
            .collect());
    }

    if !action_pattern.contains('*') && !action_pattern.contains('?') {
        let action_key = action_pattern.to_lowercase();
        if catalog.action_exists(&service, &action_key).await {
            // action_name is Some whenever action_exists is true
            if let Some(name) = catalog.action_name(&service, &action_key).await {
                return Ok(vec![format!("{service}:{name}")]);
            }
        }
        return match config.invalid_action_behavior {
            InvalidActionBehavior::Remove => Ok(Vec::new()),
            InvalidActionBehavior::Include => Ok(vec![pattern.to_string()]),
            InvalidActionBehavior::Error => {
                Err(ExpandError::InvalidAction(pattern.to_string()))
            }
        };
    }

    let matcher = WildcardPattern::compile(action_pattern);
    let actions = catalog.actions_for_service(&service).await;
    Ok(actions
        .into_iter()
        .filter(|action| matcher.matches(action))
        .map(|action| format!("{service}:{action}"))
        .collect())
}
