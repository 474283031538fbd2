use crate::models::{
    TrackDetails, TrackMedia, TrackMonetization, TrackPermissions, TrackStats, TrackUser,
    TranscodingInfo,
};
use crate::soundcloud::{ApiTrack, ApiUser};

pub const PROGRESSIVE: &str = "progressive";

/// Unresolved manifest URL of the first progressive transcoding.
pub fn progressive_url(track: &ApiTrack) -> Option<String> {
    track
        .transcodings()
        .iter()
        .find(|t| t.format.protocol == PROGRESSIVE)
        .map(|t| t.url.clone())
}

fn convert_user(user: &ApiUser) -> TrackUser {
    TrackUser {
        id: user.id,
        username: user.username.clone(),
        full_name: user.full_name.clone(),
        avatar_url: user.avatar_url.clone(),
        followers_count: user.followers_count,
        following_count: user.followings_count,
    }
}

pub fn convert_track_details(track: ApiTrack) -> TrackDetails {
    let transcodings = track
        .transcodings()
        .iter()
        .map(|t| TranscodingInfo {
            url: t.url.clone(),
            protocol: t.format.protocol.clone(),
            mime_type: t.format.mime_type.clone(),
            quality: t.quality.clone(),
        })
        .collect();

    TrackDetails {
        id: track.id,
        release_date: track.release_date.or_else(|| track.created_at.clone()),
        title: track.title,
        description: track.description,
        genre: track.genre,
        tags: track.tag_list,
        created_at: track.created_at,
        duration: track.duration,
        permalink_url: track.permalink_url,
        artwork_url: track.artwork_url,
        waveform_url: track.waveform_url,
        user: track.user.as_ref().map(convert_user),
        stats: TrackStats {
            playback_count: track.playback_count,
            likes_count: track.likes_count,
            reposts_count: track.reposts_count,
            comment_count: track.comment_count,
            download_count: track.download_count,
        },
        permissions: TrackPermissions {
            downloadable: track.downloadable,
            streamable: track.streamable,
            embeddable: track.embeddable_by.as_deref() == Some("all"),
        },
        media: TrackMedia { transcodings },
        monetization: TrackMonetization {
            monetization_model: track.monetization_model,
            policy: track.policy,
        },
    }
}
