use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TrackSummary {
    pub title: Option<String>,
    pub permalink_url: Option<String>,
    pub artwork_url: Option<String>,
    pub artist: String,
    pub duration: Option<u64>,
    pub playback_count: Option<u64>,
    pub likes_count: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub facet: String,
    pub limit: u64,
    pub offset: u64,
    pub total_results: usize,
    pub next_href: Option<String>,
    pub tracks: Vec<TrackSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserIdResponse {
    pub username: String,
    pub user_id: String,
    pub profile_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaylistTrack {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub artist: String,
    pub artwork_url: Option<String>,
    pub permalink_url: Option<String>,
    pub duration: Option<u64>,
    pub likes_count: Option<u64>,
    pub playback_count: Option<u64>,
    pub genre: Option<String>,
    pub release_date: Option<String>,
    pub stream_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub playlist_id: Option<u64>,
    pub playlist_title: Option<String>,
    pub playlist_artwork: Option<String>,
    pub total_tracks: Option<u64>,
    pub tracks: Vec<PlaylistTrack>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikedTrack {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub permalink_url: Option<String>,
    pub artwork_url: Option<String>,
    pub duration: Option<u64>,
    pub created_at: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikesResponse {
    pub user_id: String,
    pub limit: u64,
    pub likes_count: usize,
    pub likes: Vec<LikedTrack>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserTrack {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub created_at: Option<String>,
    pub release_date: Option<String>,
    pub duration: Option<u64>,
    pub permalink_url: Option<String>,
    pub artwork_url: Option<String>,
    pub likes_count: Option<u64>,
    pub playback_count: Option<u64>,
    pub reposts_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub downloadable: Option<bool>,
    pub streamable: Option<bool>,
    pub stream_url: Option<String>,
}

/// An empty page carries a `message` instead of `total_tracks` and `next_href`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserTracksResponse {
    Tracks {
        user_id: String,
        limit: u64,
        offset: u64,
        total_tracks: usize,
        next_href: Option<String>,
        tracks: Vec<UserTrack>,
    },
    Empty {
        user_id: String,
        message: String,
        limit: u64,
        offset: u64,
        tracks: Vec<UserTrack>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackInfo {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub artist: String,
    pub artwork_url: Option<String>,
    pub duration: Option<u64>,
    pub permalink_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StreamUrlResponse {
    pub stream_url: String,
    pub is_progressive: bool,
    pub track_info: TrackInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackUser {
    pub id: Option<u64>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackStats {
    pub playback_count: Option<u64>,
    pub likes_count: Option<u64>,
    pub reposts_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub download_count: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackPermissions {
    pub downloadable: Option<bool>,
    pub streamable: Option<bool>,
    pub embeddable: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscodingInfo {
    pub url: String,
    pub protocol: String,
    pub mime_type: Option<String>,
    pub quality: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackMedia {
    pub transcodings: Vec<TranscodingInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackMonetization {
    pub monetization_model: Option<String>,
    pub policy: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackDetails {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub tags: Option<String>,
    pub created_at: Option<String>,
    pub release_date: Option<String>,
    pub duration: Option<u64>,
    pub permalink_url: Option<String>,
    pub artwork_url: Option<String>,
    pub waveform_url: Option<String>,
    pub user: Option<TrackUser>,
    pub stats: TrackStats,
    pub permissions: TrackPermissions,
    pub media: TrackMedia,
    pub monetization: TrackMonetization,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClientIdResponse {
    pub client_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EndpointCatalog {
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Endpoints {
    pub search: String,
    pub get_user_id: String,
    pub get_likes: String,
    pub get_user_tracks: String,
    pub stream_url: String,
    pub track_details: String,
    pub playlist: String,
    pub client_id: String,
}

impl Default for EndpointCatalog {
    fn default() -> Self {
        Self {
            endpoints: Endpoints {
                search: "/search/{query}?limit={number}&offset={number}&facet={model|tracks|users|playlists}"
                    .to_string(),
                get_user_id: "/get_user_id/{username}".to_string(),
                get_likes: "/get_likes/{user_id}?limit={number}".to_string(),
                get_user_tracks: "/get_user_tracks/{user_id}?limit={number}&offset={number}"
                    .to_string(),
                stream_url: "/stream_url/{track_url}".to_string(),
                track_details: "/track_details/{track_url}".to_string(),
                playlist: "/playlist/{playlist_url}".to_string(),
                client_id: "/client_id".to_string(),
            },
        }
    }
}
