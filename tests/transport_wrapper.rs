//! End-to-end tests of the transport wrapper against a local server.

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use hyper_util::{client::legacy::Client, rt::TokioExecutor};

use wirelog::transport::LoggedClient;

mod common;

use common::{find, total, SharedBuffer};

fn get(url: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .method(Method::GET)
        .uri(url)
        .body(Full::default())
        .unwrap()
}

fn post(url: &str, body: &[u8]) -> Request<Full<Bytes>> {
    Request::builder()
        .method(Method::POST)
        .uri(url)
        .header("content-type", "application/octet-stream")
        .body(Full::new(Bytes::copy_from_slice(body)))
        .unwrap()
}

/// Send a request and drain the response body, returning status and body.
async fn send(client: &LoggedClient, request: Request<Full<Bytes>>) -> (StatusCode, Bytes) {
    let response = client.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

#[tokio::test]
async fn writes_request_line() {
    let addr = common::start_server(b"").await;
    let buffer = SharedBuffer::default();
    let client = common::client(&buffer);

    let url = format!("http://{}/my-path", addr);
    let (status, _) = send(&client, get(&url)).await;
    assert_eq!(status, StatusCode::OK);

    let messages = buffer.parse();
    let details = find(&messages, "Sending request header");
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["method"], "GET");
    assert_eq!(details[0]["url"], Value::from(url));
}

#[tokio::test]
async fn writes_response_line() {
    let addr = common::start_server(b"").await;
    let buffer = SharedBuffer::default();
    let client = common::client(&buffer);

    send(&client, get(&format!("http://{}/my-path", addr))).await;

    let messages = buffer.parse();
    let details = find(&messages, "Received response header");
    assert!(!details.is_empty());
    assert_eq!(details[0]["protocol"], "HTTP/1.1");
    assert_eq!(details[0]["status"], "200 OK");
    assert_eq!(details[0]["code"], 200);
}

#[tokio::test]
async fn writes_request_body_sizes() {
    let addr = common::start_server(b"").await;
    let buffer = SharedBuffer::default();
    let client = common::client(&buffer);

    let body = [0u8; 42];
    send(&client, post(&format!("http://{}/my-path", addr), &body)).await;

    // The body may be split into several chunks, so add them up.
    let messages = buffer.parse();
    let details = find(&messages, "Sending request body");
    assert!(!details.is_empty());
    assert_eq!(total(&details), 42);
}

#[tokio::test]
async fn writes_response_body_sizes() {
    let addr = common::start_server(&[0; 42]).await;
    let buffer = SharedBuffer::default();
    let client = common::client(&buffer);

    let body = [0u8; 42];
    let (_, received) = send(&client, post(&format!("http://{}/my-path", addr), &body)).await;
    assert_eq!(received.len(), 42);

    let messages = buffer.parse();
    let details = find(&messages, "Received response body");
    assert!(!details.is_empty());
    assert_eq!(total(&details), 42);
}

#[tokio::test]
async fn writes_exchange_identifier() {
    let addr = common::start_server(&[0; 42]).await;
    let buffer = SharedBuffer::default();
    let client = common::client(&buffer);

    send(&client, post(&format!("http://{}/my-path", addr), &[0; 42])).await;

    let messages = buffer.parse();
    assert!(!messages.is_empty());
    let id = messages[0]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    for message in &messages[1..] {
        assert_eq!(message["id"], Value::from(id.as_str()));
    }
}

#[tokio::test]
async fn honors_header_level() {
    let addr = common::start_server(b"").await;
    let buffer = SharedBuffer::default();
    let client = common::client(&buffer);

    send(&client, get(&format!("http://{}/my-path", addr))).await;

    let messages = buffer.parse();
    let requests = find(&messages, "Sending request header");
    assert!(!requests.is_empty());
    for message in requests {
        assert_eq!(message["v"], 15);
    }
    for message in find(&messages, "Received response header") {
        assert_eq!(message["v"], 15);
    }
}

#[tokio::test]
async fn honors_body_level() {
    let addr = common::start_server(&[0; 42]).await;
    let buffer = SharedBuffer::default();
    let client = common::client(&buffer);

    send(&client, post(&format!("http://{}/my-path", addr), &[0; 42])).await;

    let messages = buffer.parse();
    for message in find(&messages, "Sending request body") {
        assert_eq!(message["v"], 16);
    }
    for message in find(&messages, "Received response body") {
        assert_eq!(message["v"], 16);
    }
}

#[tokio::test]
async fn is_transparent() {
    let addr = common::start_echo_server().await;
    let url = format!("http://{}/my-path", addr);
    let payload: Vec<u8> = (0..42).collect();

    let buffer = SharedBuffer::default();
    let wrapped = common::client(&buffer);
    let (wrapped_status, wrapped_body) = send(&wrapped, post(&url, &payload)).await;

    let plain = Client::builder(TokioExecutor::new()).build_http::<Full<Bytes>>();
    let plain_response = plain.request(post(&url, &payload)).await.unwrap();
    let plain_status = plain_response.status();
    let plain_headers = plain_response.headers().clone();
    let plain_body = plain_response.into_body().collect().await.unwrap().to_bytes();

    assert_eq!(wrapped_status, plain_status);
    assert_eq!(wrapped_body, plain_body);
    assert_eq!(wrapped_body.as_ref(), payload.as_slice());
    assert_eq!(
        plain_headers.get("content-length").map(|v| v.as_bytes()),
        Some(&b"42"[..])
    );
}

#[tokio::test]
async fn transport_errors_are_returned_unchanged() {
    // Bind and drop a listener to get a port nothing listens on.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let buffer = SharedBuffer::default();
    let client = common::client(&buffer);

    let err = client
        .oneshot(get(&format!("http://{}/my-path", addr)))
        .await
        .unwrap_err();
    assert!(err.is_connect());

    let messages = buffer.parse();
    assert_eq!(find(&messages, "Sending request header").len(), 1);
    assert!(find(&messages, "Received response header").is_empty());
}

#[tokio::test]
async fn concurrent_exchanges_never_share_identifiers() {
    let addr = common::start_server(&[0; 42]).await;
    let buffer = SharedBuffer::default();
    let client = common::client(&buffer);
    let url = format!("http://{}/my-path", addr);

    let calls: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            let request = post(&url, &[1; 42]);
            tokio::spawn(async move { send(&client, request).await })
        })
        .collect();
    for call in calls {
        let (status, body) = call.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.len(), 42);
    }

    let messages = buffer.parse();
    let mut ids: Vec<String> = find(&messages, "Sending request header")
        .iter()
        .map(|m| m["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);

    for id in &ids {
        let records: Vec<_> = messages
            .iter()
            .filter(|m| m["id"] == Value::from(id.as_str()))
            .cloned()
            .collect();
        assert_eq!(total(&find(&records, "Sending request body")), 42);
        assert_eq!(total(&find(&records, "Received response body")), 42);
    }
}
