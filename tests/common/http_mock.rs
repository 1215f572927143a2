use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Pretty-printed mapping listing, formatted the way the real server prints it.
#[allow(dead_code)]
pub const RUNNING_LISTING: &str = "{\n  \"mappings\" : [ ],\n  \"meta\" : {\n    \"total\" : 0\n  }\n}";

/// A journal entry in the shape the server returns from `/__admin/requests/find`.
#[allow(dead_code)]
pub fn logged_request(method: &str, url: &str, body: &str) -> Value {
    serde_json::json!({
        "url": url,
        "absoluteUrl": format!("http://localhost:8080{url}"),
        "method": method,
        "clientIp": "127.0.0.1",
        "headers": {"Content-Type": "application/json"},
        "cookies": {},
        "browserProxyRequest": false,
        "loggedDate": 1700000000000i64,
        "bodyAsBase64": "",
        "body": body,
        "loggedDateString": "2023-11-14T22:13:20Z"
    })
}

/// Start an admin mock whose `/__admin/requests/find` returns `requests`.
#[allow(dead_code)]
pub async fn start_journal_server(requests: Vec<Value>) -> MockServer {
    let server = MockServer::start().await;
    let total = requests.len();
    Mock::given(method("POST"))
        .and(path("/__admin/requests/find"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "requests": requests,
            "meta": {"total": total},
            "requestJournalDisabled": false
        })))
        .mount(&server)
        .await;
    server
}

/// Start an admin mock answering the mapping listing with `status` and `body`.
#[allow(dead_code)]
pub async fn start_listing_server(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/__admin/mappings"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}
