//! Process-wide cache of verified credential bundles

use super::{CredentialBundle, SecretResult};
use dashmap::DashMap;
use std::future::Future;
use std::sync::Arc;

/// Verified bundles keyed by secret name
///
/// Entries are written whole. Two concurrent misses for the same name both
/// fetch; the later write wins, and both values came from the store.
#[derive(Clone, Default)]
pub struct CredentialCache {
    entries: Arc<DashMap<String, CredentialBundle>>,
}

impl CredentialCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<CredentialBundle> {
        self.entries.get(name).map(|entry| entry.value().clone())
    }

    /// Cached value, or the result of `fetch` stored on success
    pub async fn get_or_fetch<F, Fut>(&self, name: &str, fetch: F) -> SecretResult<CredentialBundle>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = SecretResult<CredentialBundle>>,
    {
        if let Some(bundle) = self.get(name) {
            return Ok(bundle);
        }
        let bundle = fetch().await?;
        self.entries.insert(name.to_string(), bundle.clone());
        Ok(bundle)
    }

    pub fn invalidate(&self, name: &str) {
        self.entries.remove(name);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
