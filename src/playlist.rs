use crate::error::Result;
use crate::models::PlaylistTrack;
use crate::search::artist_name;
use crate::soundcloud::{ApiTrack, SoundCloudClient};
use crate::tracks::progressive_url;
use futures::future::try_join_all;

pub const BATCH_SIZE: usize = 20;

pub fn chunk_track_ids(ids: &[u64]) -> Vec<&[u64]> {
    ids.chunks(BATCH_SIZE).collect()
}

/// Fetches every batch concurrently. One failed batch fails the lot;
/// results come back in batch order.
pub async fn fetch_tracks_in_batches(
    client: &SoundCloudClient,
    token: &str,
    ids: &[u64],
) -> Result<Vec<ApiTrack>> {
    let batches = chunk_track_ids(ids)
        .into_iter()
        .map(|batch| client.tracks_by_ids(token, batch));

    let results = try_join_all(batches).await?;
    Ok(results.into_iter().flatten().collect())
}

pub fn convert_playlist_track(track: &ApiTrack) -> PlaylistTrack {
    PlaylistTrack {
        id: track.id,
        title: track.title.clone(),
        artist: artist_name(track),
        artwork_url: track.artwork_url.clone(),
        permalink_url: track.permalink_url.clone(),
        duration: track.duration,
        likes_count: track.likes_count,
        playback_count: track.playback_count,
        genre: track.genre.clone(),
        release_date: track.release_date.clone(),
        stream_url: progressive_url(track),
    }
}

/// Untitled tracks (deleted or private) are dropped.
pub fn convert_playlist_tracks(tracks: &[ApiTrack]) -> Vec<PlaylistTrack> {
    tracks
        .iter()
        .filter(|track| track.title.as_deref().is_some_and(|title| !title.is_empty()))
        .map(convert_playlist_track)
        .collect()
}
