use std::sync::Arc;
use tracing::warn;

use crate::error::{KeywordError, KeywordResult};
use crate::provider::{ProviderKind, ProviderRegistry};
use crate::storage::KvStore;

pub const SELECTED_PROVIDER_KEY: &str = "selected_provider";

/// Remembers which data provider the user picked, stored as a plain string
pub struct PreferenceStore {
    store: Arc<dyn KvStore>,
    fallback: ProviderKind,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn KvStore>, fallback: ProviderKind) -> Self {
        Self { store, fallback }
    }

    pub async fn selected_provider(&self) -> ProviderKind {
        match self.store.get(SELECTED_PROVIDER_KEY).await {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Ignoring unknown stored provider");
                self.fallback
            }),
            Ok(None) => self.fallback,
            Err(e) => {
                warn!(error = %e, "Failed to read provider preference");
                self.fallback
            }
        }
    }

    pub async fn select_provider(
        &self,
        kind: ProviderKind,
        registry: &ProviderRegistry,
    ) -> KeywordResult<()> {
        if !registry.is_enabled(kind) {
            return Err(KeywordError::ProviderUnavailable(kind));
        }
        self.store.set(SELECTED_PROVIDER_KEY, kind.as_str()).await?;
        Ok(())
    }
}
