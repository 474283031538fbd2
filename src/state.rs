use crate::config::Config;
use crate::credentials::CredentialCache;
use crate::credentials::source::{ScriptScraper, TokenSource};
use crate::credentials::store::{CredentialStore, FileStore, MemoryStore};
use crate::credentials::types::{Clock, SystemClock};
use crate::soundcloud::{HttpFetch, ReqwestFetcher, SoundCloudClient};
use std::sync::Arc;
use tracing::info;

pub struct AppState {
    pub config: Config,
    pub credentials: CredentialCache,
    pub soundcloud: SoundCloudClient,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let fetcher: Arc<dyn HttpFetch> = Arc::new(ReqwestFetcher::new(&config.user_agent)?);

        let store: Arc<dyn CredentialStore> = match &config.credential_store_path {
            Some(path) => {
                info!("Persisting client_id to {:?}", path);
                Arc::new(FileStore::open(path.clone()).await?)
            }
            None => {
                info!("Keeping client_id in memory");
                Arc::new(MemoryStore::new())
            }
        };

        let source: Arc<dyn TokenSource> = Arc::new(ScriptScraper::new(
            fetcher.clone(),
            config.client_id_source_url.clone(),
        ));

        Ok(Self::from_parts(config, fetcher, store, source, Arc::new(SystemClock)))
    }

    /// Wires the state from explicit collaborators.
    pub fn from_parts(
        config: Config,
        fetcher: Arc<dyn HttpFetch>,
        store: Arc<dyn CredentialStore>,
        source: Arc<dyn TokenSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let credentials = CredentialCache::new(store, source, clock, config.credential_ttl_ms);
        let soundcloud = SoundCloudClient::new(fetcher, &config);

        Self {
            config,
            credentials,
            soundcloud,
        }
    }
}
