use crate::fixtures::{ScriptedFetcher, TEST_CLIENT_ID, create_test_app, get_json, track_json};
use axum::http::StatusCode;
use scproxy_web::models::SearchResponse;
use scproxy_web::search::{UNKNOWN_ARTIST, convert_search_results};
use serde_json::json;

fn search_payload() -> serde_json::Value {
    let mut anonymous = track_json(2, "No Uploader");
    anonymous.as_object_mut().unwrap().remove("user");

    json!({
        "collection": [
            track_json(1, "First Light"),
            { "kind": "user", "id": 77, "username": "someone" },
            anonymous,
            { "kind": "playlist", "id": 5, "title": "A Set", "tracks": [] }
        ],
        "next_href": "https://api-v2.soundcloud.com/search?offset=20",
        "query_urn": "soundcloud:search:abc"
    })
}

#[tokio::test]
async fn search_returns_only_tracks_with_defaults() {
    let app = create_test_app(ScriptedFetcher::new().json("/search?", search_payload()));

    let (status, body) = get_json(&app.router, "/search/deep%20house").await;

    assert_eq!(status, StatusCode::OK);
    let response: SearchResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.query, "deep house");
    assert_eq!(response.facet, "model");
    assert_eq!(response.limit, 20);
    assert_eq!(response.offset, 0);
    assert_eq!(response.total_results, 2);
    assert_eq!(
        response.next_href.as_deref(),
        Some("https://api-v2.soundcloud.com/search?offset=20")
    );
    assert_eq!(response.tracks[0].title.as_deref(), Some("First Light"));
    assert_eq!(response.tracks[0].artist, "fixture-artist");

    let calls = app.fetcher.calls_matching("/search?");
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("https://api-v2.soundcloud.com/search?q=deep%20house"));
    assert!(calls[0].contains(&format!("client_id={TEST_CLIENT_ID}")));
    assert!(calls[0].contains("facet=model"));
    assert!(calls[0].contains("limit=20"));
    assert!(calls[0].contains("offset=0"));
    assert!(calls[0].contains("linked_partitioning=1"));
}

#[tokio::test]
async fn search_reshape_drops_unlisted_fields() {
    let app = create_test_app(ScriptedFetcher::new().json("/search?", search_payload()));

    let (_, body) = get_json(&app.router, "/search/anything").await;

    let track = body["tracks"][0].as_object().unwrap();
    let mut keys: Vec<&str> = track.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "artist",
            "artwork_url",
            "duration",
            "likes_count",
            "permalink_url",
            "playback_count",
            "title",
        ]
    );
    assert_eq!(body["tracks"][1]["artist"], UNKNOWN_ARTIST);
}

#[tokio::test]
async fn search_passes_paging_and_facet() {
    let app = create_test_app(ScriptedFetcher::new().json("/search?", search_payload()));

    let (status, body) = get_json(&app.router, "/search/techno?limit=5&offset=10&facet=tracks").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 5);
    assert_eq!(body["offset"], 10);
    assert_eq!(body["facet"], "tracks");

    let call = &app.fetcher.calls_matching("/search?")[0];
    assert!(call.contains("limit=5"));
    assert!(call.contains("offset=10"));
    assert!(call.contains("facet=tracks"));
}

#[tokio::test]
async fn search_requires_query() {
    let app = create_test_app(ScriptedFetcher::new());

    let (status, body) = get_json(&app.router, "/search/").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Search query is required");
    assert!(app.fetcher.calls().is_empty());
    assert_eq!(app.source.calls(), 0);
}

#[tokio::test]
async fn search_rejects_non_numeric_limit() {
    let app = create_test_app(ScriptedFetcher::new());

    let (status, body) = get_json(&app.router, "/search/techno?limit=lots").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid limit parameter");
}

#[tokio::test]
async fn search_upstream_failure_is_500_without_stack() {
    let app = create_test_app(ScriptedFetcher::new().respond("/search?", 403, "{}"));

    let (status, body) = get_json(&app.router, "/search/techno").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("403"));
    assert_eq!(body.as_object().unwrap().len(), 1);
}

#[test]
fn convert_search_results_skips_non_tracks() {
    let tracks = convert_search_results(vec![
        json!({ "kind": "user", "id": 1 }),
        json!({ "kind": "track", "id": 2, "title": "Solo" }),
    ])
    .unwrap();

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title.as_deref(), Some("Solo"));
    assert_eq!(tracks[0].artist, UNKNOWN_ARTIST);
    assert_eq!(tracks[0].duration, None);
}
