use crate::fixtures::{ScriptedFetcher, TEST_CLIENT_ID, create_test_app, get_json, track_json};
use axum::http::StatusCode;
use scproxy_web::models::StreamUrlResponse;
use scproxy_web::soundcloud::{ApiFormat, ApiTranscoding};
use scproxy_web::stream::{NO_SUPPORTED_FORMAT, stream_candidates};
use serde_json::json;

const TRACK_URL: &str = "https://soundcloud.com/artist/track-9";

fn transcoding(url: &str, protocol: &str, preset: &str) -> ApiTranscoding {
    ApiTranscoding {
        url: url.to_string(),
        preset: preset.to_string(),
        format: ApiFormat {
            protocol: protocol.to_string(),
            mime_type: None,
        },
        quality: None,
    }
}

fn routed() -> String {
    format!("/stream_url/{}", urlencoding::encode(TRACK_URL))
}

fn candidate_urls(transcodings: &[ApiTranscoding]) -> Vec<(&str, bool)> {
    stream_candidates(transcodings)
        .into_iter()
        .map(|(t, is_progressive)| (t.url.as_str(), is_progressive))
        .collect()
}

#[test]
fn progressive_is_tried_before_mp3_preset() {
    let transcodings = vec![
        transcoding("hls-mp3", "hls", "mp3_1_0"),
        transcoding("hls-opus", "hls", "opus_0_0"),
        transcoding("prog", "progressive", "mp3_1_0"),
    ];

    assert_eq!(
        candidate_urls(&transcodings),
        vec![("prog", true), ("hls-mp3", false)]
    );
}

#[test]
fn mp3_preset_is_the_only_fallback() {
    let transcodings = vec![
        transcoding("hls-opus", "hls", "opus_0_0"),
        transcoding("hls-mp3", "hls", "mp3_1_0"),
        transcoding("hls-mp3-2", "hls", "mp3_0_1"),
    ];

    assert_eq!(candidate_urls(&transcodings), vec![("hls-mp3", false)]);
}

#[test]
fn progressive_mp3_is_not_tried_twice() {
    let transcodings = vec![
        transcoding("prog", "progressive", "mp3_1_0"),
        transcoding("hls-opus", "hls", "opus_0_0"),
    ];

    assert_eq!(candidate_urls(&transcodings), vec![("prog", true)]);
}

#[test]
fn protocol_must_match_exactly() {
    let transcodings = vec![transcoding("almost", "progressive-ish", "aac_160k")];

    assert!(stream_candidates(&transcodings).is_empty());
}

#[tokio::test]
async fn stream_url_materializes_progressive_manifest() {
    let app = create_test_app(
        ScriptedFetcher::new()
            .json("/resolve?", track_json(9, "Nine"))
            .json(
                "/media/soundcloud:tracks:9/progressive",
                json!({ "url": "https://cf-media.sndcdn.com/nine.mp3?Policy=x" }),
            ),
    );

    let (status, body) = get_json(&app.router, &routed()).await;

    assert_eq!(status, StatusCode::OK);
    let response: StreamUrlResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.stream_url, "https://cf-media.sndcdn.com/nine.mp3?Policy=x");
    assert!(response.is_progressive);
    assert_eq!(response.track_info.id, Some(9));
    assert_eq!(response.track_info.artist, "fixture-artist");

    let manifest = &app.fetcher.calls_matching("/progressive")[0];
    assert!(manifest.ends_with(&format!("?client_id={TEST_CLIENT_ID}")));
}

#[tokio::test]
async fn stream_url_falls_back_to_mp3_hls() {
    let mut track = track_json(9, "Nine");
    track["media"]["transcodings"] = json!([
        {
            "url": "https://api-v2.soundcloud.com/media/soundcloud:tracks:9/hls-opus",
            "preset": "opus_0_0",
            "format": { "protocol": "hls", "mime_type": "audio/ogg" }
        },
        {
            "url": "https://api-v2.soundcloud.com/media/soundcloud:tracks:9/hls-mp3",
            "preset": "mp3_1_0",
            "format": { "protocol": "hls", "mime_type": "audio/mpeg" }
        }
    ]);
    let app = create_test_app(
        ScriptedFetcher::new()
            .json("/resolve?", track)
            .json("/hls-mp3", json!({ "url": "https://cf-hls-media.sndcdn.com/playlist.m3u8" })),
    );

    let (status, body) = get_json(&app.router, &routed()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stream_url"], "https://cf-hls-media.sndcdn.com/playlist.m3u8");
    assert_eq!(body["is_progressive"], false);
}

#[tokio::test]
async fn stream_url_without_usable_format_fails() {
    let mut track = track_json(9, "Nine");
    track["media"]["transcodings"] = json!([
        { "url": "u", "preset": "opus_0_0", "format": { "protocol": "hls" } }
    ]);
    let app = create_test_app(ScriptedFetcher::new().json("/resolve?", track));

    let (status, body) = get_json(&app.router, &routed()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("No supported streaming format"));
    assert_eq!(body["error"], NO_SUPPORTED_FORMAT);
}

#[tokio::test]
async fn stream_url_rejects_playlists() {
    let app = create_test_app(
        ScriptedFetcher::new().json("/resolve?", json!({ "kind": "playlist", "id": 1 })),
    );

    let (status, body) = get_json(&app.router, &routed()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "URL is not a track (might be a playlist)");
}

#[tokio::test]
async fn empty_progressive_manifest_falls_back_to_mp3() {
    let app = create_test_app(
        ScriptedFetcher::new()
            .json("/resolve?", track_json(9, "Nine"))
            .json("/media/soundcloud:tracks:9/progressive", json!({}))
            .json(
                "/media/soundcloud:tracks:9/hls",
                json!({ "url": "https://cf-hls-media.sndcdn.com/nine.m3u8" }),
            ),
    );

    let (status, body) = get_json(&app.router, &routed()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stream_url"], "https://cf-hls-media.sndcdn.com/nine.m3u8");
    assert_eq!(body["is_progressive"], false);
    assert_eq!(body["track_info"]["title"], "Nine");
}

#[tokio::test]
async fn failing_progressive_manifest_falls_back_to_mp3() {
    let app = create_test_app(
        ScriptedFetcher::new()
            .json("/resolve?", track_json(9, "Nine"))
            .respond("/media/soundcloud:tracks:9/progressive", 503, "unavailable")
            .json(
                "/media/soundcloud:tracks:9/hls",
                json!({ "url": "https://cf-hls-media.sndcdn.com/nine.m3u8" }),
            ),
    );

    let (status, body) = get_json(&app.router, &routed()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_progressive"], false);
    assert_eq!(app.fetcher.calls_matching("/media/soundcloud:tracks:9/").len(), 2);
}

#[tokio::test]
async fn no_manifest_with_a_url_is_unsupported() {
    let app = create_test_app(
        ScriptedFetcher::new()
            .json("/resolve?", track_json(9, "Nine"))
            .json("/media/soundcloud:tracks:9/", json!({})),
    );

    let (status, body) = get_json(&app.router, &routed()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], NO_SUPPORTED_FORMAT);
}
