use axum::http::StatusCode;
use axum_test::TestServer;
use marquee_server::config::Config;
use marquee_server::routes::build_router;
use marquee_server::state::{AppState, build_session, open_db};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// App state over an in-memory SQLite database.
async fn test_state(tmdb_base: Option<String>) -> AppState {
    let config = Config::from_lookup(|key| match key {
        "MARQUEE_DB" => Some(":memory:".to_string()),
        "MARQUEE_TMDB_BASE" => tmdb_base.clone(),
        _ => None,
    });
    let pool = open_db(&config.db_path).await.unwrap();
    let session = build_session(&pool, &config);
    AppState::new(pool, session)
}

async fn test_app(tmdb_base: Option<String>) -> TestServer {
    TestServer::new(build_router(test_state(tmdb_base).await)).unwrap()
}

async fn mock_tmdb() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("api_key", "secret"))
        .and(query_param("query", "the matrix"))
        .and(query_param("year", "1999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "total_pages": 1,
            "total_results": 1,
            "results": [{
                "id": 603,
                "title": "The Matrix",
                "original_language": "en",
                "overview": "Set in the 22nd century...",
                "release_date": "1999-03-31",
                "genre_ids": [28, 878],
                "vote_average": 8.2,
                "vote_count": 26000,
                "poster_path": "/p.jpg",
                "backdrop_path": null
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/3/genre/movie/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "genres": [
                { "id": 28, "name": "Action" },
                { "id": 878, "name": "Science Fiction" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let server = test_app(None).await;
    let resp = server.get("/health").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cached_lookups"], 0);
}

#[tokio::test]
async fn scan_marks_detected_rows() {
    let server = test_app(None).await;
    let resp = server
        .post("/api/v1/rows/scan")
        .json(&json!({ "filenames": ["Alien (1979) [1080p].mkv", "###", "1917.mkv"] }))
        .await;
    resp.assert_status_ok();
    let rows: Value = resp.json();

    assert_eq!(rows[0]["filename"], "Alien (1979) [1080p].mkv");
    assert_eq!(rows[0]["status"], "ready");
    assert_eq!(rows[0]["label"], "alien (1979)");
    assert_eq!(rows[1]["status"], "undetected");
    assert_eq!(rows[2]["title"], "1917");
    assert_eq!(rows[2]["year_undetected"], true);
}

#[tokio::test]
async fn lookup_with_undetected_title() {
    let server = test_app(None).await;
    let resp = server
        .post("/api/v1/rows/lookup")
        .json(&json!({ "row_id": "r1", "filename": "[](){}" }))
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["status"], "title_undetected");
}

#[tokio::test]
async fn lookup_without_key_is_aborted() {
    let server = test_app(None).await;
    let resp = server
        .post("/api/v1/rows/lookup")
        .json(&json!({ "row_id": "r1", "filename": "Alien 1979" }))
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["status"], "aborted");

    let health: Value = server.get("/health").await.json();
    assert_eq!(health["cached_lookups"], 0);
}

#[tokio::test]
async fn lookup_renders_card_and_caches() {
    let tmdb = mock_tmdb().await;
    let server = test_app(Some(format!("{}/3/", tmdb.uri()))).await;

    let request = json!({
        "row_id": "r1",
        "filename": "The.Matrix.1999.1080p.BluRay.x264",
        "api_key": "secret"
    });
    let resp = server.post("/api/v1/rows/lookup").json(&request).await;
    resp.assert_status_ok();
    let card: Value = resp.json();
    assert_eq!(card["status"], "found");
    assert_eq!(card["title"], "The Matrix");
    assert_eq!(card["year"], "1999");
    assert_eq!(card["genres"], "Action and Science Fiction");
    assert_eq!(card["language"], "English");
    assert_eq!(card["poster_url"], "https://image.tmdb.org/t/p/w92/p.jpg");
    assert_eq!(card["backdrop_url"], Value::Null);

    // Key is now stored; a second row with the pre-parsed title hits the cache.
    let resp = server
        .post("/api/v1/rows/lookup")
        .json(&json!({
            "row_id": "r2",
            "filename": "the matrix 1999",
            "title": "the matrix",
            "year": "1999"
        }))
        .await;
    resp.assert_status_ok();
    let again: Value = resp.json();
    assert_eq!(again["title"], "The Matrix");

    let health: Value = server.get("/health").await.json();
    assert_eq!(health["cached_lookups"], 1);
}

#[tokio::test]
async fn busy_row_is_refused() {
    let state = test_state(None).await;
    let rows = state.rows.clone();
    let server = TestServer::new(build_router(state)).unwrap();
    let request = json!({ "row_id": "r1", "filename": "Alien 1979" });

    let guard = rows.begin("r1").unwrap();
    let resp = server.post("/api/v1/rows/lookup").json(&request).await;
    resp.assert_status(StatusCode::CONFLICT);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "conflict");

    // Other rows are not blocked, and the row is free again once released.
    let resp = server
        .post("/api/v1/rows/lookup")
        .json(&json!({ "row_id": "r2", "filename": "Alien 1979" }))
        .await;
    resp.assert_status_ok();

    drop(guard);
    let resp = server.post("/api/v1/rows/lookup").json(&request).await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["status"], "aborted");
}

#[tokio::test]
async fn lookup_rejects_empty_filename() {
    let server = test_app(None).await;
    let resp = server
        .post("/api/v1/rows/lookup")
        .json(&json!({ "row_id": "r1", "filename": "  " }))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn credential_can_be_set_and_cleared() {
    let server = test_app(None).await;

    let resp = server
        .put("/api/v1/credential")
        .json(&json!({ "api_key": "" }))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = server
        .put("/api/v1/credential")
        .json(&json!({ "api_key": "secret" }))
        .await;
    resp.assert_status(StatusCode::NO_CONTENT);

    let body: Value = server.delete("/api/v1/credential").await.json();
    assert_eq!(body["removed"], true);
    let body: Value = server.delete("/api/v1/credential").await.json();
    assert_eq!(body["removed"], false);
}
