//! In-memory catalog backed by a JSON data file
//!
//! The data file is a snapshot of the known services and their actions:
//!
//! ```json
//! {
//!   "version": "3.2.0",
//!   "updated_at": "2026-07-30T04:11:00Z",
//!   "services": {
//!     "s3": ["GetObject", "GetObjectAcl", "PutObject"],
//!     "ec2": ["RunInstances", "TerminateInstances"]
//!   }
//! }
//! ```
//!
//! Service keys are stored lower-cased; action names keep the casing the
//! data file declares, which is what every lookup hands back out.

use crate::catalog::CatalogProvider;
use crate::error::{CatalogError, CatalogResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Serde shape of the catalog data file.
#[derive(Debug, Deserialize)]
struct CatalogData {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    services: BTreeMap<String, Vec<String>>,
}

/// One service's actions, with a lower-cased lookup index.
#[derive(Debug, Default)]
struct ServiceActions {
    /// Canonical action names in data-file order.
    actions: Vec<String>,
    /// Lower-cased action name to position in `actions`.
    index: HashMap<String, usize>,
}

impl ServiceActions {
    fn from_actions<S: AsRef<str>>(actions: &[S]) -> Self {
        let mut entry = Self::default();
        for action in actions {
            let action = action.as_ref();
            entry.index.insert(action.to_lowercase(), entry.actions.len());
            entry.actions.push(action.to_string());
        }
        entry
    }
}

/// Catalog held entirely in memory.
///
/// This is the concrete [`CatalogProvider`] the CLI uses; tests build one
/// with [`InMemoryCatalog::with_service`].
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    services: BTreeMap<String, ServiceActions>,
    version: Option<String>,
    updated_at: Option<String>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service with its actions, replacing any previous entry for
    /// the same key.
    pub fn with_service(mut self, service_key: &str, actions: &[&str]) -> Self {
        self.services
            .insert(service_key.to_lowercase(), ServiceActions::from_actions(actions));
        self
    }

    /// Parse a catalog from JSON data.
    pub fn from_json(data: &str) -> CatalogResult<Self> {
        let data: CatalogData = serde_json::from_str(data)?;
        let services = data
            .services
            .iter()
            .map(|(key, actions)| (key.to_lowercase(), ServiceActions::from_actions(actions)))
            .collect();
        Ok(Self {
            services,
            version: data.version,
            updated_at: data.updated_at,
        })
    }

    /// Load a catalog from a JSON data file.
    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Version declared by the data file, if any.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Timestamp the data file declares it was generated at, if any.
    pub fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    fn service(&self, service_key: &str) -> Option<&ServiceActions> {
        self.services.get(&service_key.to_lowercase())
    }
}

#[async_trait]
impl CatalogProvider for InMemoryCatalog {
    async fn service_exists(&self, service_key: &str) -> bool {
        self.service(service_key).is_some()
    }

    async fn action_exists(&self, service_key: &str, action_key: &str) -> bool {
        self.service(service_key)
            .is_some_and(|service| service.index.contains_key(&action_key.to_lowercase()))
    }

    async fn action_name(&self, service_key: &str, action_key: &str) -> Option<String> {
        let service = self.service(service_key)?;
        let position = *service.index.get(&action_key.to_lowercase())?;
        service.actions.get(position).cloned()
    }

    async fn actions_for_service(&self, service_key: &str) -> Vec<String> {
        self.service(service_key)
            .map(|service| service.actions.clone())
            .unwrap_or_default()
    }

    async fn service_keys(&self) -> Vec<String> {
        self.services.keys().cloned().collect()
    }
}
