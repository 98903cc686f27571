//! Expansion and inversion integration tests
//!
//! Exercises the public API end to end against a small but realistic
//! catalog, covering the contracts the engines promise:
//! - wildcard-free expansion yields at most one identifier
//! - every expansion result matches its pattern and is a catalog member
//! - list expansion is the sorted, deduplicated union of the individual
//!   expansions
//! - inversion is the exact catalog complement of expansion
//! - a bare asterisk dominates inversion
//! - expansion is idempotent on already-expanded lists

use iam_expand::{
    ExpansionConfig, InMemoryCatalog, InvalidActionBehavior, action_matches_pattern,
    expand_action, expand_actions, invert_actions, matches_any_action,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new()
        .with_service("s3", &["GetObject", "GetObjectAcl", "PutObject"])
        .with_service("ec2", &["RunInstances"])
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// =============================================================================
// Wildcard-free expansion
// =============================================================================

#[tokio::test]
async fn test_exact_valid_action_yields_one_canonical_identifier() {
    let catalog = catalog();
    let result = expand_action(&catalog, "S3:GETOBJECT", &ExpansionConfig::default())
        .await
        .unwrap();
    assert_eq!(result, ["s3:GetObject"]);
}

#[tokio::test]
async fn test_exact_invalid_action_yields_nothing_by_default() {
    let catalog = catalog();
    let result = expand_action(&catalog, "s3:DoesNotExist", &ExpansionConfig::default())
        .await
        .unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_exact_invalid_action_can_be_included_verbatim() {
    let catalog = catalog();
    let config = ExpansionConfig {
        invalid_action_behavior: InvalidActionBehavior::Include,
        ..Default::default()
    };
    let result = expand_action(&catalog, "s3:DoesNotExist", &config)
        .await
        .unwrap();
    assert_eq!(result, ["s3:DoesNotExist"]);
}

#[tokio::test]
async fn test_exact_invalid_action_can_fail() {
    let catalog = catalog();
    let config = ExpansionConfig {
        invalid_action_behavior: InvalidActionBehavior::Error,
        ..Default::default()
    };
    let err = expand_action(&catalog, "s3:DoesNotExist", &config)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid action: s3:DoesNotExist");
}

// =============================================================================
// Wildcard expansion
// =============================================================================

#[tokio::test]
async fn test_expansion_results_match_pattern_and_catalog() {
    let catalog = catalog();
    let pattern = "s3:Get*";
    let result = expand_action(&catalog, pattern, &ExpansionConfig::default())
        .await
        .unwrap();
    assert_eq!(result, ["s3:GetObject", "s3:GetObjectAcl"]);

    for identifier in &result {
        assert!(
            action_matches_pattern(identifier, pattern),
            "{identifier} should match {pattern}"
        );
        assert!(
            matches_any_action(&catalog, identifier).await,
            "{identifier} should be a catalog member"
        );
    }
}

#[tokio::test]
async fn test_list_expansion_is_union_of_individual_expansions() {
    let catalog = catalog();
    let config = ExpansionConfig::default();

    let p1 = "s3:Get*";
    let p2 = "s3:*Object";
    let combined = expand_actions(&catalog, &strings(&[p1, p2]), &config)
        .await
        .unwrap();

    let mut union = expand_action(&catalog, p1, &config).await.unwrap();
    union.extend(expand_action(&catalog, p2, &config).await.unwrap());
    union.sort();
    union.dedup();

    assert_eq!(combined, union);
    assert_eq!(combined, ["s3:GetObject", "s3:GetObjectAcl", "s3:PutObject"]);
}

#[tokio::test]
async fn test_expansion_is_idempotent_on_expanded_lists() {
    let catalog = catalog();
    let config = ExpansionConfig::default();

    let expanded = expand_actions(&catalog, &strings(&["s3:Get*", "ec2:Run*"]), &config)
        .await
        .unwrap();
    let again = expand_actions(&catalog, &expanded, &config).await.unwrap();
    assert_eq!(again, expanded);
}

// =============================================================================
// Inversion
// =============================================================================

#[tokio::test]
async fn test_inversion_is_the_catalog_complement() {
    let catalog = catalog();
    let result = invert_actions(&catalog, &strings(&["s3:Get*"])).await.unwrap();
    assert_eq!(result, ["ec2:RunInstances", "s3:PutObject"]);
}

#[tokio::test]
async fn test_inversion_and_expansion_are_disjoint() {
    let catalog = catalog();
    let patterns = strings(&["s3:Get*"]);

    let expanded = expand_actions(&catalog, &patterns, &ExpansionConfig::default())
        .await
        .unwrap();
    let inverted = invert_actions(&catalog, &patterns).await.unwrap();

    for identifier in &expanded {
        assert!(
            !inverted.contains(identifier),
            "{identifier} must not appear in both sets"
        );
    }
}

#[tokio::test]
async fn test_bare_asterisk_dominates_inversion() {
    let catalog = catalog();

    let result = invert_actions(&catalog, &strings(&["*"])).await.unwrap();
    assert!(result.is_empty());

    let result = invert_actions(&catalog, &strings(&["*", "s3:Get*"]))
        .await
        .unwrap();
    assert!(result.is_empty());
}

// =============================================================================
// Case folding
// =============================================================================

#[tokio::test]
async fn test_case_folded_lookups_restore_canonical_casing() {
    let catalog = catalog();
    let config = ExpansionConfig::default();

    let result = expand_actions(&catalog, &strings(&["S3:getobject*", "EC2:RUNINSTANCES"]), &config)
        .await
        .unwrap();
    assert_eq!(result, ["ec2:RunInstances", "s3:GetObject", "s3:GetObjectAcl"]);
}
