use crate::error::Result;
use crate::models::TrackSummary;
use crate::soundcloud::ApiTrack;
use serde_json::Value;

pub const UNKNOWN_ARTIST: &str = "Unknown artist";

/// Keeps only `kind == "track"` entries of a mixed search collection.
pub fn convert_search_results(collection: Vec<Value>) -> Result<Vec<TrackSummary>> {
    collection
        .into_iter()
        .filter(|item| item.get("kind").and_then(Value::as_str) == Some("track"))
        .map(|item| -> Result<TrackSummary> {
            let track: ApiTrack = serde_json::from_value(item)?;
            Ok(convert_track_summary(&track))
        })
        .collect()
}

pub fn convert_track_summary(track: &ApiTrack) -> TrackSummary {
    TrackSummary {
        title: track.title.clone(),
        permalink_url: track.permalink_url.clone(),
        artwork_url: track.artwork_url.clone(),
        artist: artist_name(track),
        duration: track.duration,
        playback_count: track.playback_count,
        likes_count: track.likes_count,
    }
}

pub fn artist_name(track: &ApiTrack) -> String {
    track
        .username()
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string())
}
