use axum::body::Body;
use axum::http::{Request, StatusCode};
use httpmock::prelude::*;
use meeting_prep::app::build_state;
use meeting_prep::server::create_router;
use meeting_prep::TomlConfig;
use tower::ServiceExt;

fn router_for(server: &MockServer) -> axum::Router {
    let config = TomlConfig::from_toml_str(&format!(
        r#"
[search]
base_url = "{}"
api_key = "tools-key"
retry_attempts = 0

[pipeline]
num_results = 2
content_chars = 20
"#,
        server.base_url()
    ))
    .unwrap();
    create_router(build_state(config).unwrap())
}

async fn call_tool(router: axum::Router, name: &str, input: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/tools/{}", name))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::json!({ "input": input }).to_string()))
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_search_tool_renders_results_and_autoprompt() {
    let server = MockServer::start();
    let search = server.mock(|when, then| {
        when.method(POST)
            .path("/search")
            .header("x-api-key", "tools-key")
            .json_body(serde_json::json!({
                "query": "vertical farming startups",
                "useAutoprompt": true,
                "numResults": 2
            }));
        then.status(200).json_body(serde_json::json!({
            "results": [{
                "id": "r1",
                "url": "https://farm.example/list",
                "title": "Top vertical farms",
                "score": 0.91,
                "author": "J. Doe"
            }],
            "autopromptString": "Here is a list of vertical farming startups:"
        }));
    });

    let (status, body) = call_tool(router_for(&server), "search", "  vertical farming startups ").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let result = body["result"].as_str().unwrap();
    assert!(result.starts_with("Title: Top vertical farms\nURL: https://farm.example/list\nID: r1\n"));
    assert!(result.contains("Author: J. Doe"));
    assert!(result.contains("Published Date: None"));
    assert!(result.contains("Author: J. Doe\nText: None\n"));
    assert!(result.ends_with("Autoprompt String: Here is a list of vertical farming startups:"));
    search.assert();
}

#[tokio::test]
async fn test_find_similar_rejects_invalid_url_without_calling_api() {
    let server = MockServer::start();
    let similar = server.mock(|when, then| {
        when.method(POST).path("/findSimilar");
        then.status(200).json_body(serde_json::json!({ "results": [] }));
    });

    let (status, body) = call_tool(router_for(&server), "find_similar", "not a url").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("find_similar"));
    similar.assert_hits(0);
}

#[tokio::test]
async fn test_get_contents_parses_ids_and_clips_text() {
    let server = MockServer::start();
    let contents = server.mock(|when, then| {
        when.method(POST)
            .path("/contents")
            .json_body(serde_json::json!({ "ids": ["p1", "p2"], "text": true }));
        then.status(200).json_body(serde_json::json!({
            "results": [
                {
                    "id": "p1",
                    "url": "https://a.example/p",
                    "title": "Page one",
                    "text": "x".repeat(200)
                },
                {
                    "id": "p2",
                    "url": "https://b.example/q",
                    "title": "Page two",
                    "text": "y".repeat(200)
                }
            ]
        }));
    });

    let (status, body) = call_tool(router_for(&server), "get_contents", "['p1', 'p2']").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let result = body["result"].as_str().unwrap();
    assert!(result.starts_with("Title: Page one"));
    assert!(result.contains(" https://a.example/p"));
    assert!(result.contains(" https://b.example/q"));
    assert!(!result.contains("xxxxx"));
    assert!(!result.contains("yyyyy"));
    contents.assert();
}

#[tokio::test]
async fn test_search_tool_surfaces_upstream_errors() {
    let server = MockServer::start();
    let search = server.mock(|when, then| {
        when.method(POST).path("/search");
        then.status(403).body("forbidden");
    });

    let (status, body) = call_tool(router_for(&server), "search", "anything").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Search API returned 403: forbidden");
    search.assert_hits(1);
}

#[tokio::test]
async fn test_tool_listing_over_http() {
    let server = MockServer::start();
    let request = Request::builder()
        .uri("/tools")
        .body(Body::empty())
        .unwrap();

    let response = tokio_test::assert_ok!(router_for(&server).oneshot(request).await);
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let tools: Vec<serde_json::Value> = serde_json::from_slice(&bytes).unwrap();
    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    assert_eq!(names, vec!["search", "find_similar", "get_contents"]);
    assert_eq!(tools[2]["args_schema"]["properties"]["ids"]["type"], "string");
}
