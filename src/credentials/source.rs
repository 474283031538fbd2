use crate::error::{ProxyError, Result};
use crate::soundcloud::HttpFetch;
use async_trait::async_trait;
use futures::future::join_all;
use regex::Regex;
use reqwest::Url;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

static SCRIPT_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<script\s+[^>]*src=["']([^"']+)["'][^>]*>"#).expect("script src pattern")
});

static CLIENT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"client_id=([a-zA-Z0-9]+)").expect("client_id pattern"));

/// Produces a fresh upstream credential.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn refresh(&self) -> Result<String>;
}

/// Scrapes the `client_id` out of the JavaScript bundles a public
/// SoundCloud page links to.
pub struct ScriptScraper {
    fetcher: Arc<dyn HttpFetch>,
    page_url: String,
    page_origin: String,
}

impl ScriptScraper {
    pub fn new(fetcher: Arc<dyn HttpFetch>, page_url: String) -> Self {
        Self {
            fetcher,
            page_origin: page_origin(&page_url),
            page_url,
        }
    }

    async fn scan_script(&self, script_url: &str) -> Option<String> {
        match self.fetcher.get(script_url).await {
            Ok(script) if script.is_success() => find_client_id(&script.body).map(str::to_string),
            Ok(script) => {
                debug!(status = script.status, "Skipping script {script_url}");
                None
            }
            Err(e) => {
                warn!("Skipping script {script_url} due to error: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl TokenSource for ScriptScraper {
    async fn refresh(&self) -> Result<String> {
        let page = self.fetcher.get(&self.page_url).await?;
        if !page.is_success() {
            return Err(ProxyError::UpstreamStatus {
                context: "Failed to fetch client_id source page".to_string(),
                status: page.status,
            });
        }

        let script_urls: Vec<String> = extract_script_urls(&page.body)
            .into_iter()
            .map(|src| resolve_script_url(&src, &self.page_origin))
            .collect();
        debug!("Scanning {} scripts for client_id", script_urls.len());

        let found = join_all(script_urls.iter().map(|url| self.scan_script(url))).await;

        let client_id = longest_match(found).ok_or(ProxyError::CredentialNotFound)?;
        info!("Discovered client_id ({} chars)", client_id.len());
        Ok(client_id)
    }
}

pub fn extract_script_urls(html: &str) -> Vec<String> {
    SCRIPT_SRC
        .captures_iter(html)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// `scheme://host[:port]` of the page; relative script srcs hang off it.
pub fn page_origin(page_url: &str) -> String {
    match Url::parse(page_url) {
        Ok(url) if url.has_host() => url.origin().ascii_serialization(),
        _ => page_url.trim_end_matches('/').to_string(),
    }
}

pub fn resolve_script_url(src: &str, origin: &str) -> String {
    if src.starts_with("http") {
        src.to_string()
    } else if src.starts_with("//") {
        format!("https:{src}")
    } else if src.starts_with('/') {
        format!("{origin}{src}")
    } else {
        format!("{origin}/{src}")
    }
}

/// First `client_id=` value in a script body.
pub fn find_client_id(script: &str) -> Option<&str> {
    CLIENT_ID
        .captures(script)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Longest candidate; the earliest one wins a tie.
pub fn longest_match(candidates: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .fold(None, |best: Option<String>, candidate| match best {
            Some(current) if current.len() >= candidate.len() => Some(current),
            _ => Some(candidate),
        })
}
