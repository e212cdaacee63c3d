mod common;

use axum::{body::Body, http::Request, http::StatusCode};
use serde_json::Value;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use callbridge::config::Config;
use callbridge::search::{GoogleSearch, SearchError, SearchProvider};
use common::{body_json, hit, send, test_app, FakeSearch, FakeWorkflow};

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn default_query_returns_indexed_results() {
    let search = FakeSearch::with_hits(vec![hit(
        "S3 Bucket Interview Questions",
        "https://example.com/s3-questions",
        "Common S3 bucket interview questions and answers",
    )]);
    let app = test_app(Config::default(), FakeWorkflow::replying(""), search.clone());

    let response = send(app, get("/search")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await;
    assert_eq!(data["status"], "success");
    assert_eq!(data["results_count"], 1);
    assert_eq!(data["results"].as_array().unwrap().len(), 1);
    assert_eq!(data["results"][0]["index"], 1);
    assert_eq!(data["results"][0]["title"], "S3 Bucket Interview Questions");
    assert_eq!(data["results"][0]["link"], "https://example.com/s3-questions");
    assert_eq!(
        search.calls(),
        vec![("S3 bucket interview questions AWS".to_string(), 3)]
    );
}

#[tokio::test]
async fn query_and_count_come_from_parameters() {
    let search = FakeSearch::with_hits(vec![
        hit("one", "https://a", "a"),
        hit("two", "https://b", "b"),
        hit("three", "https://c", "c"),
    ]);
    let app = test_app(Config::default(), FakeWorkflow::replying(""), search.clone());

    let data = body_json(send(app, get("/search?q=rust+axum&num=2")).await).await;

    assert_eq!(data["results_count"], 2);
    assert_eq!(data["results"][1]["index"], 2);
    assert_eq!(data["results"][1]["title"], "two");
    assert_eq!(data["message"], "Found 2 results for 'rust axum'");
    assert_eq!(search.calls(), vec![("rust axum".to_string(), 2)]);
}

#[tokio::test]
async fn count_is_clamped_to_api_limit() {
    let search = FakeSearch::with_hits(vec![]);
    let app = test_app(Config::default(), FakeWorkflow::replying(""), search.clone());

    for uri in [
        "/search?num=50",
        "/search?num=0",
        "/search?num=300",
        "/search?num=-1",
        "/search?num=99999999999999999999",
        "/search?num=lots",
    ] {
        let response = send(app.clone(), get(uri)).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(body_json(response).await["status"], "success", "{uri}");
    }

    let counts: Vec<u8> = search.calls().into_iter().map(|(_, n)| n).collect();
    assert_eq!(counts, vec![10, 1, 10, 1, 3, 3]);
}

#[tokio::test]
async fn provider_error_is_500_with_empty_results() {
    let app = test_app(
        Config::default(),
        FakeWorkflow::replying(""),
        FakeSearch::unconfigured(),
    );

    let response = send(app, get("/search")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let data = body_json(response).await;
    assert_eq!(data["status"], "error");
    assert_eq!(data["results_count"], 0);
    assert_eq!(data["results"], Value::Array(vec![]));
    assert!(data["message"].as_str().unwrap().contains("GOOGLE_API_KEY"));
}

fn google_config(server: &MockServer) -> callbridge::config::SearchConfig {
    let mut config = Config::default().search;
    config.api_key = Some("api-key".to_string());
    config.engine_id = Some("engine".to_string());
    config.endpoint = format!("{}/customsearch/v1", server.uri());
    config
}

#[tokio::test]
async fn google_search_maps_items_with_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("key", "api-key"))
        .and(query_param("cx", "engine"))
        .and(query_param("q", "S3 bucket interview questions AWS"))
        .and(query_param("num", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "kind": "customsearch#search",
            "items": [
                { "title": "S3 FAQ", "link": "https://aws.amazon.com/s3/faqs/", "snippet": "Amazon S3 is..." },
                { "link": "https://example.com/untitled" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let google = GoogleSearch::new(&google_config(&server));
    let hits = google
        .search("S3 bucket interview questions AWS", 3)
        .await
        .unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].title, "S3 FAQ");
    assert_eq!(hits[1].title, "No title");
    assert_eq!(hits[1].snippet, "No snippet");
}

#[tokio::test]
async fn google_search_without_items_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "kind": "customsearch#search",
            "searchInformation": { "totalResults": "0" }
        })))
        .mount(&server)
        .await;

    let hits = GoogleSearch::new(&google_config(&server))
        .search("nothing matches this", 3)
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn google_search_reports_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let err = GoogleSearch::new(&google_config(&server))
        .search("anything", 3)
        .await
        .unwrap_err();

    match err {
        SearchError::Status { status, body } => {
            assert_eq!(status.as_u16(), 403);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn google_search_requires_credentials() {
    let google = GoogleSearch::new(&Config::default().search);
    let err = google.search("anything", 3).await.unwrap_err();
    assert!(matches!(err, SearchError::MissingCredentials("GOOGLE_API_KEY")));
}

#[tokio::test]
async fn search_route_end_to_end_through_google() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("q", "tokio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{ "title": "Tokio", "link": "https://tokio.rs", "snippet": "An async runtime" }]
        })))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.search = google_config(&server);
    let google = std::sync::Arc::new(GoogleSearch::new(&config.search));
    let app = test_app(config, FakeWorkflow::replying(""), google);

    let data = body_json(send(app, get("/search?q=tokio")).await).await;
    assert_eq!(data["status"], "success");
    assert_eq!(data["results"][0]["link"], "https://tokio.rs");
}
