use crate::error::{ProxyError, Result};
use crate::models::{
    ClientIdResponse, LikesResponse, PlaylistResponse, SearchResponse, StreamUrlResponse,
    TrackDetails, UserIdResponse, UserTracksResponse,
};
use crate::playlist::{convert_playlist_tracks, fetch_tracks_in_batches};
use crate::response::ok;
use crate::routes::Route;
use crate::search::convert_search_results;
use crate::soundcloud::{ApiPlaylist, ApiTrack, expect_kind};
use crate::state::AppState;
use crate::stream::resolve_stream_url;
use crate::tracks::convert_track_details;
use crate::users::{convert_like, convert_user_track, extract_user_id};
use axum::response::{IntoResponse, Response};

pub async fn handle(state: &AppState, route: Route) -> Response {
    let result = match route {
        Route::Search {
            query,
            facet,
            limit,
            offset,
        } => search(state, query, facet, limit, offset)
            .await
            .map(|body| ok(&body)),
        Route::UserId { username } => get_user_id(state, username).await.map(|body| ok(&body)),
        Route::Playlist { url } => playlist(state, &url).await.map(|body| ok(&body)),
        Route::Likes { user_id, limit } => {
            get_likes(state, user_id, limit).await.map(|body| ok(&body))
        }
        Route::UserTracks {
            user_id,
            limit,
            offset,
        } => get_user_tracks(state, user_id, limit, offset)
            .await
            .map(|body| ok(&body)),
        Route::StreamUrl { url } => stream_url(state, &url).await.map(|body| ok(&body)),
        Route::TrackDetails { url } => track_details(state, &url).await.map(|body| ok(&body)),
        Route::ClientId => client_id(state).await.map(|body| ok(&body)),
    };

    result.unwrap_or_else(IntoResponse::into_response)
}

pub async fn search(
    state: &AppState,
    query: String,
    facet: String,
    limit: u64,
    offset: u64,
) -> Result<SearchResponse> {
    let token = state.credentials.get_token().await?;
    let results = state
        .soundcloud
        .search(&token, &query, &facet, limit, offset)
        .await?;

    let tracks = convert_search_results(results.collection)?;

    Ok(SearchResponse {
        query,
        facet,
        limit,
        offset,
        total_results: tracks.len(),
        next_href: results.next_href,
        tracks,
    })
}

/// Scrapes the numeric id off the public profile page; needs no credential.
pub async fn get_user_id(state: &AppState, username: String) -> Result<UserIdResponse> {
    let page = state.soundcloud.profile_page(&username).await?;

    if page.status == 404 {
        return Err(ProxyError::not_found("Failed to fetch user profile"));
    }
    if !page.is_success() {
        return Err(ProxyError::UpstreamStatus {
            context: "Failed to fetch user profile".to_string(),
            status: page.status,
        });
    }

    let user_id = extract_user_id(&page.body).ok_or(ProxyError::UserIdNotFound)?;

    Ok(UserIdResponse {
        profile_url: state.soundcloud.profile_url(&username),
        username,
        user_id,
    })
}

pub async fn playlist(state: &AppState, playlist_url: &str) -> Result<PlaylistResponse> {
    let token = state.credentials.get_token().await?;

    let resource = state.soundcloud.resolve(&token, playlist_url).await?;
    let playlist: ApiPlaylist = expect_kind(resource, "playlist", "URL is not a playlist")?;

    let track_ids: Vec<u64> = playlist.tracks.iter().filter_map(|entry| entry.id).collect();
    if track_ids.is_empty() {
        return Err(ProxyError::not_found("No tracks found in playlist"));
    }

    let tracks = fetch_tracks_in_batches(&state.soundcloud, &token, &track_ids).await?;

    Ok(PlaylistResponse {
        playlist_id: playlist.id,
        playlist_title: playlist.title,
        playlist_artwork: playlist.artwork_url,
        total_tracks: playlist.track_count,
        tracks: convert_playlist_tracks(&tracks),
    })
}

pub async fn get_likes(state: &AppState, user_id: String, limit: u64) -> Result<LikesResponse> {
    let token = state.credentials.get_token().await?;
    let likes = state.soundcloud.track_likes(&token, &user_id, limit).await?;

    if likes.collection.is_empty() {
        return Err(ProxyError::not_found("No likes found for this user"));
    }

    let likes: Vec<_> = likes.collection.iter().map(convert_like).collect();

    Ok(LikesResponse {
        user_id,
        limit,
        likes_count: likes.len(),
        likes,
    })
}

pub async fn get_user_tracks(
    state: &AppState,
    user_id: String,
    limit: u64,
    offset: u64,
) -> Result<UserTracksResponse> {
    let token = state.credentials.get_token().await?;
    let page = state
        .soundcloud
        .user_tracks(&token, &user_id, limit, offset)
        .await?;

    if page.collection.is_empty() {
        return Ok(UserTracksResponse::Empty {
            user_id,
            message: "No tracks found for this user".to_string(),
            limit,
            offset,
            tracks: Vec::new(),
        });
    }

    let tracks: Vec<_> = page.collection.iter().map(convert_user_track).collect();

    Ok(UserTracksResponse::Tracks {
        user_id,
        limit,
        offset,
        total_tracks: tracks.len(),
        next_href: page.next_href,
        tracks,
    })
}

pub async fn stream_url(state: &AppState, track_url: &str) -> Result<StreamUrlResponse> {
    let token = state.credentials.get_token().await?;
    resolve_stream_url(&state.soundcloud, &token, track_url).await
}

pub async fn track_details(state: &AppState, track_url: &str) -> Result<TrackDetails> {
    let token = state.credentials.get_token().await?;

    let resource = state.soundcloud.resolve(&token, track_url).await?;
    let track: ApiTrack = expect_kind(resource, "track", "URL does not point to a valid track")?;

    Ok(convert_track_details(track))
}

pub async fn client_id(state: &AppState) -> Result<ClientIdResponse> {
    let client_id = state.credentials.get_token().await?;
    Ok(ClientIdResponse { client_id })
}
