//! Catalog of known services and actions
//!
//! The engines never hard-code catalog contents; everything goes through
//! the [`CatalogProvider`] trait. The provider is the single source of
//! truth for which `service:action` identifiers exist and for their
//! canonical casing, and it is never mutated by this crate.

pub mod memory;

pub use memory::InMemoryCatalog;

// async_trait required for dyn-compatibility with &dyn CatalogProvider
use async_trait::async_trait;

/// Read-only source of known `service:action` identifiers.
///
/// All lookups take lower-cased keys. Implementations may be backed by
/// asynchronous I/O (for example a lazily loaded data file); every call is
/// expected to be idempotent, so callers are free to batch or repeat them.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Whether a service with this key exists.
    async fn service_exists(&self, service_key: &str) -> bool;

    /// Whether an exact (wildcard-free) action exists under a service.
    async fn action_exists(&self, service_key: &str, action_key: &str) -> bool;

    /// Canonical display name for an action.
    ///
    /// `Some` exactly when [`action_exists`](Self::action_exists) is true.
    async fn action_name(&self, service_key: &str, action_key: &str) -> Option<String>;

    /// Every action of a service, in canonical casing.
    ///
    /// Empty when the service is unknown.
    async fn actions_for_service(&self, service_key: &str) -> Vec<String>;

    /// Every known service key.
    async fn service_keys(&self) -> Vec<String>;
}
