use crate::models::{LikedTrack, UserTrack};
use crate::soundcloud::{ApiLike, ApiTrack};
use crate::tracks::progressive_url;
use regex::Regex;
use std::sync::LazyLock;

static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("username pattern"));

// Tried in order against the profile page HTML.
static USER_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"soundcloud://users:(\d+)",
        r"api\.soundcloud\.com%2Fusers%2F(\d+)",
        r#""id":(\d+),"kind":"user""#,
        r#""urn":"soundcloud:users:(\d+)""#,
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("user id pattern"))
    .collect()
});

pub fn is_valid_username(username: &str) -> bool {
    USERNAME.is_match(username)
}

pub fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn extract_user_id(html: &str) -> Option<String> {
    USER_ID_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(html))
        .map(|caps| caps[1].to_string())
}

pub fn convert_like(like: &ApiLike) -> LikedTrack {
    let track = like.track.as_ref();
    LikedTrack {
        id: track.and_then(|t| t.id),
        title: track.and_then(|t| t.title.clone()),
        artist: track.and_then(ApiTrack::username),
        permalink_url: track.and_then(|t| t.permalink_url.clone()),
        artwork_url: track.and_then(|t| t.artwork_url.clone()),
        duration: track.and_then(|t| t.duration),
        created_at: like.created_at.clone(),
    }
}

pub fn convert_user_track(track: &ApiTrack) -> UserTrack {
    UserTrack {
        id: track.id,
        title: track.title.clone(),
        description: track.description.clone(),
        genre: track.genre.clone(),
        created_at: track.created_at.clone(),
        release_date: track.release_date.clone(),
        duration: track.duration,
        permalink_url: track.permalink_url.clone(),
        artwork_url: track.artwork_url.clone(),
        likes_count: track.likes_count,
        playback_count: track.playback_count,
        reposts_count: track.reposts_count,
        comment_count: track.comment_count,
        downloadable: track.downloadable,
        streamable: track.streamable,
        stream_url: progressive_url(track),
    }
}
