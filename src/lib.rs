//! Expand and invert wildcard IAM action patterns
//!
//! IAM policies routinely say `s3:Get*` when they mean "some concrete set
//! of S3 actions". This crate resolves such patterns against a catalog of
//! known `service:action` identifiers, in both directions:
//!
//! - **Expansion** - every catalog action a pattern (or list of patterns)
//!   matches. `?` matches one character, `*` matches any run, matching is
//!   case-insensitive, and `\uXXXX` escapes are normalized first.
//! - **Inversion** - every catalog action a set of patterns does *not*
//!   match: the `Action` list equivalent to a `NotAction` field.
//! - **Documents** - a walker that rewrites `Action`/`NotAction` fields
//!   anywhere inside an arbitrary JSON document, leaving the rest of the
//!   document untouched.
//!
//! The catalog itself is behind the [`CatalogProvider`] trait;
//! [`InMemoryCatalog`] loads one from a JSON data file.
//!
//! ## Example
//!
//! ```
//! use iam_expand::{ExpansionConfig, InMemoryCatalog, expand_actions};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> iam_expand::Result<()> {
//! let catalog = InMemoryCatalog::new()
//!     .with_service("s3", &["GetObject", "GetObjectAcl", "PutObject"]);
//!
//! let expanded = expand_actions(
//!     &catalog,
//!     &["s3:Get*".to_string()],
//!     &ExpansionConfig::default(),
//! )
//! .await?;
//! assert_eq!(expanded, ["s3:GetObject", "s3:GetObjectAcl"]);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod cli;
pub mod document;
pub mod error;
pub mod expand;
pub mod invert;
pub mod pattern;

// Re-export main types
pub use catalog::{CatalogProvider, InMemoryCatalog};
pub use document::{DocumentConfig, expand_document};
pub use error::{CatalogError, ExpandError, Result};
pub use expand::{ExpansionConfig, InvalidActionBehavior, expand_action, expand_actions};
pub use invert::invert_actions;
pub use pattern::{WildcardPattern, action_matches_pattern, matches_any_action};
