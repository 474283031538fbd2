use crate::error::{ProxyError, Result};
use crate::models::{StreamUrlResponse, TrackInfo};
use crate::search::artist_name;
use crate::soundcloud::{ApiTrack, ApiTranscoding, SoundCloudClient, expect_kind};
use crate::tracks::PROGRESSIVE;
use tracing::warn;

pub const NO_SUPPORTED_FORMAT: &str = "No supported streaming format found";

/// Transcodings worth asking for a manifest, in order: the first
/// progressive one, then the first whose preset mentions mp3. The flag
/// marks the progressive candidate.
pub fn stream_candidates(transcodings: &[ApiTranscoding]) -> Vec<(&ApiTranscoding, bool)> {
    let progressive = transcodings.iter().find(|t| t.format.protocol == PROGRESSIVE);
    let mp3 = transcodings
        .iter()
        .find(|t| t.preset.contains("mp3"))
        .filter(|t| !progressive.is_some_and(|p| std::ptr::eq(p, *t)));

    progressive
        .map(|t| (t, true))
        .into_iter()
        .chain(mp3.map(|t| (t, false)))
        .collect()
}

pub async fn resolve_stream_url(
    client: &SoundCloudClient,
    token: &str,
    track_url: &str,
) -> Result<StreamUrlResponse> {
    let resource = client.resolve(token, track_url).await?;
    let track: ApiTrack = expect_kind(resource, "track", "URL is not a track (might be a playlist)")?;

    for (transcoding, is_progressive) in stream_candidates(track.transcodings()) {
        match client.stream_location(token, &transcoding.url).await {
            Ok(stream_url) => {
                return Ok(StreamUrlResponse {
                    stream_url,
                    is_progressive,
                    track_info: track_info(&track),
                });
            }
            Err(e) => warn!("No stream from {}: {e}", transcoding.url),
        }
    }

    Err(ProxyError::upstream(NO_SUPPORTED_FORMAT))
}

fn track_info(track: &ApiTrack) -> TrackInfo {
    TrackInfo {
        id: track.id,
        title: track.title.clone(),
        artist: artist_name(track),
        artwork_url: track.artwork_url.clone(),
        duration: track.duration,
        permalink_url: track.permalink_url.clone(),
    }
}
