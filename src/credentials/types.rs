use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Store key the credential lives under.
pub const CLIENT_DATA_KEY: &str = "client_data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedCredential {
    #[serde(rename = "client_id")]
    pub token: String,
    #[serde(rename = "timestamp")]
    pub fetched_at_millis: i64,
}

impl CachedCredential {
    pub fn new(token: String, fetched_at_millis: i64) -> Self {
        Self {
            token,
            fetched_at_millis,
        }
    }

    pub fn is_fresh(&self, now_millis: i64, ttl_millis: i64) -> bool {
        now_millis.saturating_sub(self.fetched_at_millis) < ttl_millis
    }
}

pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or_default()
    }
}
