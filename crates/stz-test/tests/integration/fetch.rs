#![allow(clippy::expect_used)]
//! Tests for the JSON HTTP client against a local server.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};

use stz_test::fetch::{FetchError, JSON_CONTENT_TYPE, QueryParam, QueryValue, normalize_url};

use super::helpers::*;

#[derive(Debug, Deserialize)]
struct Echo {
    method: String,
    target: String,
    headers: std::collections::BTreeMap<String, String>,
    body: String,
}

#[test_log::test(tokio::test)]
async fn get_sends_payload_as_query() {
    let server = TestServer::echo().await;
    let client = test_client();

    let params = json!({"page": 2, "tag": ["a", "", "b"], "q": "", "missing": null});
    let response = client
        .get::<Echo>(&server.url("/items"), Some(&params), &RequestOptions::default())
        .await
        .expect("GET should succeed");

    assert_eq!(response.status, 200);
    assert_eq!(response.status_text, "OK");
    assert_eq!(response.data.method, "GET");
    assert_eq!(response.data.target, "/items?page=2&tag=a&tag=b");
    assert!(response.data.body.is_empty());
}

#[test_log::test(tokio::test)]
async fn get_keeps_existing_query() {
    let server = TestServer::echo().await;
    let client = test_client();

    let response = client
        .get::<Echo>(
            &server.url("/items?sort=asc"),
            Some(&json!({"page": 1})),
            &RequestOptions::default(),
        )
        .await
        .expect("GET should succeed");

    assert_eq!(response.data.target, "/items?sort=asc&page=1");
}

#[test_log::test(tokio::test)]
async fn post_sends_json_body() {
    let server = TestServer::echo().await;
    let client = test_client();

    let payload = json!({"name": "stz", "tags": [1, 2]});
    let response = client
        .post::<Echo>(&server.url("/things"), Some(&payload), &RequestOptions::default())
        .await
        .expect("POST should succeed");

    assert_eq!(response.data.method, "POST");
    assert_eq!(response.data.target, "/things");
    assert_eq!(
        response.data.headers.get("content-type").map(String::as_str),
        Some(JSON_CONTENT_TYPE)
    );
    let sent: Value = serde_json::from_str(&response.data.body).expect("Body is JSON");
    assert_eq!(sent, payload);
}

#[test_log::test(tokio::test)]
async fn body_methods_skip_null_payload() {
    let server = TestServer::echo().await;
    let client = test_client();

    for method in [HttpMethod::Post, HttpMethod::Put, HttpMethod::Patch] {
        let response = client
            .request::<Echo>(method, &server.url("/empty"), None, &RequestOptions::default())
            .await
            .expect("request should succeed");
        assert_eq!(response.data.method, method.to_string());
        assert!(response.data.body.is_empty());
    }

    let response = client
        .put::<Echo>(&server.url("/null"), Some(&Value::Null), &RequestOptions::default())
        .await
        .expect("PUT should succeed");
    assert!(response.data.body.is_empty());
}

#[test_log::test(tokio::test)]
async fn caller_headers_override_defaults() {
    let server = TestServer::echo().await;
    let client = test_client();

    let options = RequestOptions::default()
        .header("Content-Type", "application/merge-patch+json")
        .header("X-Request-Id", "42");
    let response = client
        .patch::<Echo>(&server.url("/things/1"), Some(&json!({"a": 1})), &options)
        .await
        .expect("PATCH should succeed");

    let headers = &response.data.headers;
    assert_eq!(
        headers.get("content-type").map(String::as_str),
        Some("application/merge-patch+json")
    );
    assert_eq!(headers.get("x-request-id").map(String::as_str), Some("42"));
    assert_eq!(headers.get("user-agent").map(String::as_str), Some("stz-fetch"));
}

#[test_log::test(tokio::test)]
async fn delete_and_options_use_query() {
    let server = TestServer::echo().await;
    let client = test_client();

    let response = client
        .delete::<Echo>(&server.url("/things"), Some(&json!({"id": 7})), &RequestOptions::default())
        .await
        .expect("DELETE should succeed");
    assert_eq!(response.data.method, "DELETE");
    assert_eq!(response.data.target, "/things?id=7");

    let response = client
        .options::<Echo>(&server.url("/things"), None, &RequestOptions::default())
        .await
        .expect("OPTIONS should succeed");
    assert_eq!(response.data.method, "OPTIONS");
    assert_eq!(response.data.target, "/things");
}

#[test_log::test(tokio::test)]
async fn head_decodes_empty_body_as_null() {
    let server =
        TestServer::spawn(|_| CannedResponse::empty(200).with_header("x-total", "12")).await;
    let client = test_client();

    let response = client
        .head::<Value>(&server.url("/things"), None, &RequestOptions::default())
        .await
        .expect("HEAD should succeed");

    assert_eq!(response.data, Value::Null);
    assert_eq!(response.headers.get("x-total").map(String::as_str), Some("12"));
    assert_eq!(server.requests().len(), 1);
    assert_eq!(server.requests()[0].method, "HEAD");
}

#[test_log::test(tokio::test)]
async fn error_status_is_returned_not_raised() {
    let server =
        TestServer::spawn(|_| CannedResponse::json(404, &json!({"error": "not found"}))).await;
    let client = test_client();

    let response = client
        .get::<Value>(&server.url("/missing"), None, &RequestOptions::default())
        .await
        .expect("A 404 is still a response");

    assert_eq!(response.status, 404);
    assert_eq!(response.status_text, "Not Found");
    assert_eq!(response.data["error"], "not found");
}

#[test_log::test(tokio::test)]
async fn non_json_body_is_a_decode_error() {
    let server = TestServer::spawn(|_| CannedResponse::text(500, "<html>oops</html>")).await;
    let client = test_client();

    let result = client
        .get::<Value>(&server.url("/broken"), None, &RequestOptions::default())
        .await;

    assert!(matches!(result, Err(FetchError::Decode { status: 500, .. })));
}

#[test_log::test(tokio::test)]
async fn per_request_timeout() {
    let server = TestServer::spawn(|_| {
        CannedResponse::json(200, &json!({})).delayed(Duration::from_millis(500))
    })
    .await;
    let client = test_client();

    let options = RequestOptions::default().timeout(Duration::from_millis(50));
    let result = client
        .get::<Value>(&server.url("/slow"), None, &options)
        .await;

    assert!(matches!(result, Err(FetchError::Timeout(_))));
}

#[test_log::test(tokio::test)]
async fn client_default_timeout_from_config() {
    let server = TestServer::spawn(|_| {
        CannedResponse::json(200, &json!({})).delayed(Duration::from_millis(500))
    })
    .await;
    let config = HttpConfig {
        timeout_ms: 50,
        user_agent: "stz-test".to_string(),
    };
    let client = FetchClient::new(&config).expect("client builds");

    let result = client
        .get::<Value>(&server.url("/slow"), None, &RequestOptions::default())
        .await;

    assert!(matches!(result, Err(FetchError::Timeout(_))));
    assert_eq!(
        server.requests()[0].headers.get("user-agent").map(String::as_str),
        Some("stz-test")
    );
}

#[test_log::test(tokio::test)]
async fn connection_refused_is_a_transport_error() {
    let url = {
        let server = TestServer::echo().await;
        server.url("/gone")
    };
    // Give the aborted accept loop a moment to release the port.
    tokio::time::sleep(Duration::from_millis(20)).await;

    let result = test_client()
        .get::<Value>(&url, None, &RequestOptions::default())
        .await;

    assert!(matches!(result, Err(FetchError::Transport(_))));
}

#[test_log::test(tokio::test)]
async fn typed_query_params_match_client_encoding() {
    let server = TestServer::echo().await;
    let client = test_client();

    let params = QueryParams::new()
        .with("q", "two words")
        .with("ids", vec![QueryValue::from(1), QueryValue::from(2)])
        .with("draft", QueryParam::One(QueryValue::Bool(false)));
    let url = normalize_url(&server.url("/search"), &params);

    let response = client
        .get::<Echo>(&url, None, &RequestOptions::default())
        .await
        .expect("GET should succeed");

    assert_eq!(response.data.target, "/search?q=two+words&ids=1&ids=2&draft=false");
}
