#![allow(clippy::expect_used)]
//! Request inspection fed by headers a real client sent.

use std::net::{IpAddr, Ipv4Addr};

use http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::json;

use stz_test::util::request::{
    BrowserInfo, ClientRequest, bearer_token, get_browser_info, get_client_ip, is_bot_request,
    is_mobile_request,
};

use super::helpers::*;

const FIREFOX_ANDROID: &str =
    "Mozilla/5.0 (Android 14; Mobile; rv:125.0) Gecko/125.0 Firefox/125.0";

fn client_request(recorded: &RecordedRequest, peer: Option<IpAddr>) -> ClientRequest {
    let mut headers = HeaderMap::new();
    for (name, value) in &recorded.headers {
        let name = HeaderName::from_bytes(name.as_bytes()).expect("recorded name is valid");
        let value = HeaderValue::from_str(value).expect("recorded value is valid");
        headers.append(name, value);
    }
    ClientRequest::new(headers, peer)
}

#[test_log::test(tokio::test)]
async fn headers_sent_by_the_client_are_inspected() {
    let server = TestServer::spawn(|_| CannedResponse::json(200, &json!({}))).await;
    let options = RequestOptions::default()
        .header("User-Agent", FIREFOX_ANDROID)
        .header("X-Forwarded-For", "203.0.113.9, 10.0.0.2")
        .header("Authorization", "Bearer token-123");

    test_client()
        .get::<serde_json::Value>(&server.url("/whoami"), None, &options)
        .await
        .expect("GET should succeed");

    let recorded = server.requests().pop().expect("one request recorded");
    let request = client_request(&recorded, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));

    assert_eq!(get_client_ip(&request), "203.0.113.9");
    assert_eq!(bearer_token(&request).as_deref(), Some("token-123"));
    assert!(is_mobile_request(&request));
    assert!(!is_bot_request(&request));
    assert_eq!(
        get_browser_info(&request),
        BrowserInfo {
            ip: "203.0.113.9".to_string(),
            header: FIREFOX_ANDROID.to_string(),
            os: "Android".to_string(),
            browser: "Firefox".to_string(),
        }
    );
}

#[test_log::test(tokio::test)]
async fn default_client_identifies_itself() {
    let server = TestServer::echo().await;

    test_client()
        .get::<serde_json::Value>(&server.url("/"), None, &RequestOptions::default())
        .await
        .expect("GET should succeed");

    let recorded = server.requests().pop().expect("one request recorded");
    let request = client_request(&recorded, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
    let info = get_browser_info(&request);

    assert_eq!(info.ip, "127.0.0.1");
    assert_eq!(info.header, "stz-fetch");
    assert_eq!(info.os, "Other");
    assert_eq!(info.browser, "Other");
}

#[test]
fn browser_info_serializes_for_logging() {
    let request = ClientRequest::default();
    let info = serde_json::to_value(get_browser_info(&request)).expect("serializes");

    assert_eq!(
        info,
        json!({"ip": "Unknown", "header": "", "os": "Unknown", "browser": "Unknown"})
    );
}
