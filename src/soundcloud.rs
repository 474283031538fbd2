use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::config::Config;
use crate::error::{ProxyError, Result};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiCollection<T> {
    #[serde(default = "Vec::new")]
    pub collection: Vec<T>,
    pub next_href: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ApiUser {
    pub id: Option<u64>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub followers_count: Option<u64>,
    pub followings_count: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ApiFormat {
    #[serde(default)]
    pub protocol: String,
    pub mime_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiTranscoding {
    pub url: String,
    #[serde(default)]
    pub preset: String,
    #[serde(default)]
    pub format: ApiFormat,
    pub quality: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ApiMedia {
    #[serde(default)]
    pub transcodings: Vec<ApiTranscoding>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ApiTrack {
    pub kind: Option<String>,
    pub id: Option<u64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub tag_list: Option<String>,
    pub created_at: Option<String>,
    pub release_date: Option<String>,
    pub duration: Option<u64>,
    pub permalink_url: Option<String>,
    pub artwork_url: Option<String>,
    pub waveform_url: Option<String>,
    pub user: Option<ApiUser>,
    pub playback_count: Option<u64>,
    pub likes_count: Option<u64>,
    pub reposts_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub download_count: Option<u64>,
    pub downloadable: Option<bool>,
    pub streamable: Option<bool>,
    pub embeddable_by: Option<String>,
    pub media: Option<ApiMedia>,
    pub monetization_model: Option<String>,
    pub policy: Option<String>,
}

impl ApiTrack {
    pub fn transcodings(&self) -> &[ApiTranscoding] {
        self.media
            .as_ref()
            .map(|media| media.transcodings.as_slice())
            .unwrap_or_default()
    }

    pub fn username(&self) -> Option<String> {
        self.user.as_ref().and_then(|user| user.username.clone())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiPlaylistEntry {
    pub id: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiPlaylist {
    pub kind: Option<String>,
    pub id: Option<u64>,
    pub title: Option<String>,
    pub artwork_url: Option<String>,
    pub track_count: Option<u64>,
    #[serde(default)]
    pub tracks: Vec<ApiPlaylistEntry>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiLike {
    pub created_at: Option<String>,
    pub track: Option<ApiTrack>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiStreamLocation {
    pub url: Option<String>,
}

/// Status and body of a completed GET, whatever the status was.
#[derive(Debug, Clone)]
pub struct FetchedBody {
    pub status: u16,
    pub body: String,
}

impl FetchedBody {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchedBody>;
}

pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    pub fn new(user_agent: &str) -> std::result::Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(user_agent) {
            Ok(value) => {
                headers.insert(USER_AGENT, value);
            }
            Err(e) => tracing::warn!("Ignoring invalid user agent {user_agent:?}: {e}"),
        }

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<FetchedBody> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FetchedBody { status, body })
    }
}

#[derive(Clone)]
pub struct SoundCloudClient {
    fetcher: Arc<dyn HttpFetch>,
    api_base: String,
    site_base: String,
    app_version: String,
    app_locale: String,
}

impl SoundCloudClient {
    pub fn new(fetcher: Arc<dyn HttpFetch>, config: &Config) -> Self {
        Self {
            fetcher,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            site_base: config.site_base.trim_end_matches('/').to_string(),
            app_version: config.app_version.clone(),
            app_locale: config.app_locale.clone(),
        }
    }

    /// Builds `{api_base}{path}?{params}&client_id=..&app_version=..&app_locale=..`.
    /// Parameter values are percent-encoded; keys are trusted literals.
    pub fn api_url(&self, path: &str, token: &str, params: &[(&str, &str)]) -> String {
        let query = params
            .iter()
            .copied()
            .chain([
                ("client_id", token),
                ("app_version", self.app_version.as_str()),
                ("app_locale", self.app_locale.as_str()),
            ])
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}{path}?{query}", self.api_base)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, context: &str) -> Result<T> {
        let response = self.fetcher.get(url).await?;
        if !response.is_success() {
            return Err(ProxyError::UpstreamStatus {
                context: context.to_string(),
                status: response.status,
            });
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    pub async fn search(
        &self,
        token: &str,
        query: &str,
        facet: &str,
        limit: u64,
        offset: u64,
    ) -> Result<ApiCollection<Value>> {
        let limit = limit.to_string();
        let offset = offset.to_string();
        let url = self.api_url(
            "/search",
            token,
            &[
                ("q", query),
                ("facet", facet),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
                ("linked_partitioning", "1"),
            ],
        );
        self.get_json(&url, "Search request failed").await
    }

    /// Resolves a public soundcloud.com URL into its API resource.
    pub async fn resolve(&self, token: &str, public_url: &str) -> Result<Value> {
        let url = self.api_url("/resolve", token, &[("url", public_url)]);
        self.get_json(&url, "Failed to resolve URL").await
    }

    pub async fn tracks_by_ids(&self, token: &str, ids: &[u64]) -> Result<Vec<ApiTrack>> {
        let ids = ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let url = self.api_url("/tracks", token, &[("ids", ids.as_str())]);
        self.get_json(&url, "Failed batch fetch").await
    }

    pub async fn track_likes(
        &self,
        token: &str,
        user_id: &str,
        limit: u64,
    ) -> Result<ApiCollection<ApiLike>> {
        let limit = limit.to_string();
        let path = format!("/users/{}/track_likes", urlencoding::encode(user_id));
        let url = self.api_url(&path, token, &[("limit", limit.as_str())]);
        self.get_json(&url, "Failed to fetch likes").await
    }

    pub async fn user_tracks(
        &self,
        token: &str,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> Result<ApiCollection<ApiTrack>> {
        let limit = limit.to_string();
        let offset = offset.to_string();
        let path = format!("/users/{}/tracks", urlencoding::encode(user_id));
        let url = self.api_url(
            &path,
            token,
            &[
                ("representation", ""),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
                ("linked_partitioning", "1"),
            ],
        );
        self.get_json(&url, "Failed to fetch user tracks").await
    }

    /// Turns a transcoding manifest URL into the playable media URL.
    pub async fn stream_location(&self, token: &str, transcoding_url: &str) -> Result<String> {
        let separator = if transcoding_url.contains('?') { '&' } else { '?' };
        let url = format!(
            "{transcoding_url}{separator}client_id={}",
            urlencoding::encode(token)
        );
        let location: ApiStreamLocation = self.get_json(&url, "Failed to fetch stream URL").await?;
        location
            .url
            .ok_or_else(|| ProxyError::upstream("Stream manifest did not contain a URL"))
    }

    pub fn profile_url(&self, username: &str) -> String {
        format!("{}/{}", self.site_base, urlencoding::encode(username))
    }

    /// Raw profile page; status handling is left to the caller.
    pub async fn profile_page(&self, username: &str) -> Result<FetchedBody> {
        self.fetcher.get(&self.profile_url(username)).await
    }
}

/// Deserializes a resolved resource after checking its `kind`.
pub fn expect_kind<T: DeserializeOwned>(resource: Value, kind: &str, message: &str) -> Result<T> {
    if resource.get("kind").and_then(Value::as_str) != Some(kind) {
        return Err(ProxyError::upstream(message));
    }
    Ok(serde_json::from_value(resource)?)
}
