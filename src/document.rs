//! Document walker
//!
//! Applies the expansion engine to `Action` and `NotAction` fields anywhere
//! inside an arbitrary JSON document, optionally rewriting `NotAction`
//! fields into the `Action` list they are equivalent to. Everything that is
//! not an action-bearing field passes through untouched, so any policy-like
//! document can be piped through whole.

use crate::catalog::CatalogProvider;
use crate::error::Result;
use crate::expand::{ExpansionConfig, expand_action, expand_actions};
use crate::invert::invert_actions;
use futures::future::BoxFuture;
use serde_json::{Map, Value};

/// Options for document transformation.
#[derive(Debug, Clone, Default)]
pub struct DocumentConfig {
    /// Expansion options applied to every action-bearing field.
    pub expand: ExpansionConfig,

    /// Replace each `NotAction` field with an `Action` field holding the
    /// inverted set.
    pub invert_not_actions: bool,
}

/// A field value the walker will rewrite: a string, or a non-empty list
/// whose first element is a string.
fn is_action_bearing(value: &Value) -> bool {
    match value {
        Value::String(_) => true,
        Value::Array(items) => matches!(items.first(), Some(Value::String(_))),
        _ => false,
    }
}

/// Collect the pattern strings out of an action-bearing value.
fn bearing_patterns(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn string_array(values: Vec<String>) -> Value {
    Value::Array(values.into_iter().map(Value::String).collect())
}

/// Expand every action-bearing field in `document`.
///
/// The document's structural shape is preserved; only `Action` and
/// `NotAction` values that are a string or a non-empty list of strings are
/// rewritten (always to a list). Everything else passes through unchanged.
pub async fn expand_document(
    catalog: &dyn CatalogProvider,
    config: &DocumentConfig,
    document: Value,
) -> Result<Value> {
    transform(catalog, config, document, None).await
}

fn transform<'a>(
    catalog: &'a dyn CatalogProvider,
    config: &'a DocumentConfig,
    node: Value,
    key: Option<&'a str>,
) -> BoxFuture<'a, Result<Value>> {
    Box::pin(async move {
        if matches!(key, Some("Action" | "NotAction")) {
            match &node {
                Value::String(s) => {
                    let expanded = expand_action(catalog, s, &config.expand).await?;
                    return Ok(string_array(expanded));
                }
                Value::Array(items) if matches!(items.first(), Some(Value::String(_))) => {
                    let patterns = bearing_patterns(&node);
                    let expanded = expand_actions(catalog, &patterns, &config.expand).await?;
                    return Ok(string_array(expanded));
                }
                _ => {}
            }
        }

        match node {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(transform(catalog, config, item, None).await?);
                }
                Ok(Value::Array(out))
            }
            Value::Object(mut map) => {
                if config.invert_not_actions
                    && map.get("NotAction").is_some_and(is_action_bearing)
                {
                    if let Some(value) = map.remove("NotAction") {
                        // The inversion is resolved fully before any entry
                        // of this object is visited.
                        let inverted =
                            invert_actions(catalog, &bearing_patterns(&value)).await?;
                        map.insert("Action".to_string(), string_array(inverted));
                    }
                }

                let mut out = Map::new();
                for (key, value) in map {
                    let transformed =
                        transform(catalog, config, value, Some(key.as_str())).await?;
                    out.insert(key, transformed);
                }
                Ok(Value::Object(out))
            }
            other => Ok(other),
        }
    })
}
