use crate::error::{ProxyError, Result};
use crate::handlers;
use crate::models::EndpointCatalog;
use crate::response::{json_response, preflight_response};
use crate::state::AppState;
use crate::users::{is_numeric, is_valid_username};
use axum::{
    extract::{Query, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_SEARCH_LIMIT: u64 = 20;
pub const DEFAULT_LIKES_LIMIT: u64 = 10_000;
pub const DEFAULT_USER_TRACKS_LIMIT: u64 = 20;
pub const DEFAULT_FACET: &str = "model";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Search {
        query: String,
        facet: String,
        limit: u64,
        offset: u64,
    },
    UserId {
        username: String,
    },
    Playlist {
        url: String,
    },
    Likes {
        user_id: String,
        limit: u64,
    },
    UserTracks {
        user_id: String,
        limit: u64,
        offset: u64,
    },
    StreamUrl {
        url: String,
    },
    TrackDetails {
        url: String,
    },
    ClientId,
}

impl Route {
    /// Matches `path` against the known prefixes in priority order and
    /// validates the inputs of the matched route. `Ok(None)` means no route.
    pub fn parse(path: &str, query: &HashMap<String, String>) -> Result<Option<Route>> {
        if let Some(rest) = path.strip_prefix("/search/") {
            let query_text = decode(rest);
            if query_text.is_empty() {
                return Err(ProxyError::validation("Search query is required"));
            }
            return Ok(Some(Route::Search {
                query: query_text,
                facet: param(query, "facet").unwrap_or(DEFAULT_FACET).to_string(),
                limit: count_param(query, "limit", DEFAULT_SEARCH_LIMIT)?,
                offset: count_param(query, "offset", 0)?,
            }));
        }

        if let Some(rest) = path.strip_prefix("/get_user_id/") {
            let username = decode(first_segment(rest));
            if !is_valid_username(&username) {
                return Err(ProxyError::validation("Invalid SoundCloud username format"));
            }
            return Ok(Some(Route::UserId { username }));
        }

        if let Some(rest) = path.strip_prefix("/playlist/") {
            let url = soundcloud_url(rest, "Invalid SoundCloud playlist URL")?;
            return Ok(Some(Route::Playlist { url }));
        }

        if let Some(rest) = path.strip_prefix("/get_likes/") {
            let user_id = user_id(rest)?;
            let limit = count_param(query, "limit", DEFAULT_LIKES_LIMIT)?;
            return Ok(Some(Route::Likes { user_id, limit }));
        }

        if let Some(rest) = path.strip_prefix("/get_user_tracks/") {
            let user_id = user_id(rest)?;
            let limit = count_param(query, "limit", DEFAULT_USER_TRACKS_LIMIT)?;
            let offset = count_param(query, "offset", 0)?;
            return Ok(Some(Route::UserTracks {
                user_id,
                limit,
                offset,
            }));
        }

        if let Some(rest) = path.strip_prefix("/stream_url/") {
            let url = soundcloud_url(rest, "Invalid SoundCloud track URL")?;
            return Ok(Some(Route::StreamUrl { url }));
        }

        if let Some(rest) = path.strip_prefix("/track_details/") {
            let url = soundcloud_url(rest, "Invalid SoundCloud track URL")?;
            return Ok(Some(Route::TrackDetails { url }));
        }

        if path == "/client_id" {
            return Ok(Some(Route::ClientId));
        }

        Ok(None)
    }
}

/// Single entry point for every method and path.
pub async fn dispatch(State(state): State<Arc<AppState>>, method: Method, uri: Uri) -> Response {
    if method == Method::OPTIONS {
        return preflight_response();
    }

    let query = match Query::<HashMap<String, String>>::try_from_uri(&uri) {
        Ok(Query(query)) => query,
        Err(_) => return ProxyError::validation("Invalid query string").into_response(),
    };

    match Route::parse(uri.path(), &query) {
        Ok(Some(route)) => handlers::handle(&state, route).await,
        Ok(None) => json_response(StatusCode::NOT_FOUND, &EndpointCatalog::default()),
        Err(e) => e.into_response(),
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

fn first_segment(rest: &str) -> &str {
    rest.split('/').next().unwrap_or_default()
}

fn user_id(rest: &str) -> Result<String> {
    let user_id = first_segment(rest);
    if !is_numeric(user_id) {
        return Err(ProxyError::validation("Invalid user ID"));
    }
    Ok(user_id.to_string())
}

fn soundcloud_url(rest: &str, message: &str) -> Result<String> {
    let url = decode(rest);
    if !url.contains("soundcloud.com") {
        return Err(ProxyError::validation(message));
    }
    Ok(url)
}

/// Empty values count as absent.
fn param<'a>(query: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    query.get(key).map(String::as_str).filter(|value| !value.is_empty())
}

fn count_param(query: &HashMap<String, String>, key: &str, default: u64) -> Result<u64> {
    match param(query, key) {
        None => Ok(default),
        Some(raw) if is_numeric(raw) => raw
            .parse()
            .map_err(|_| ProxyError::validation(format!("Invalid {key} parameter"))),
        Some(_) => Err(ProxyError::validation(format!("Invalid {key} parameter"))),
    }
}
