pub mod source;
pub mod store;
pub mod types;

use crate::credentials::source::TokenSource;
use crate::credentials::store::CredentialStore;
use crate::credentials::types::{CLIENT_DATA_KEY, CachedCredential, Clock};
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Cache-aside access to the upstream `client_id`.
///
/// Concurrent misses are not coalesced: each caller that sees a stale entry
/// refreshes on its own and the last write to the store wins.
#[derive(Clone)]
pub struct CredentialCache {
    store: Arc<dyn CredentialStore>,
    source: Arc<dyn TokenSource>,
    clock: Arc<dyn Clock>,
    ttl_millis: i64,
}

impl CredentialCache {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        source: Arc<dyn TokenSource>,
        clock: Arc<dyn Clock>,
        ttl_millis: i64,
    ) -> Self {
        Self {
            store,
            source,
            clock,
            ttl_millis,
        }
    }

    pub async fn get_token(&self) -> Result<String> {
        let now = self.clock.now_millis();

        match self.store.get(CLIENT_DATA_KEY).await {
            Ok(Some(cached)) if cached.is_fresh(now, self.ttl_millis) => {
                debug!("Using cached client_id");
                return Ok(cached.token);
            }
            Ok(_) => {}
            Err(e) => warn!("Credential store read failed, refreshing: {e}"),
        }

        self.refresh().await
    }

    /// Fetches a new token regardless of what the store holds and stamps it
    /// with the clock reading taken once the source answers.
    pub async fn refresh(&self) -> Result<String> {
        info!("Refreshing client_id");
        let token = self.source.refresh().await?;

        let credential = CachedCredential::new(token.clone(), self.clock.now_millis());
        if let Err(e) = self.store.put(CLIENT_DATA_KEY, credential).await {
            warn!("Failed to persist refreshed client_id: {e}");
        }

        Ok(token)
    }
}
