//! End-to-end notification runs against a mock Teams webhook.

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use serde_json::{json, Value};
use teams_notify::{run, Configuration, NotifyError, TeamsChannel};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOOK_PATH: &str = "/webhookb2/abc/IncomingWebhook/def";

fn configuration(server: &MockServer, extra: &[(&str, &str)]) -> Configuration {
    let mut vars: HashMap<String, String> = extra
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    vars.insert("WEBHOOK_URL".to_string(), format!("{}{HOOK_PATH}", server.uri()));
    Configuration::from_vars(|name| vars.get(name).cloned()).expect("valid configuration")
}

fn default_card(text: &str) -> Value {
    json!({
        "@type": "MessageCard",
        "@context": "http://schema.org/extensions",
        "themeColor": "0076D7",
        "title": "Notification sent from <a href='https://bitbucket.org'>Bitbucket</a>",
        "text": text
    })
}

#[tokio::test]
async fn test_notify_succeeded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .and(header("content-type", "application/json"))
        .and(body_json(default_card("Hello!")))
        .respond_with(ResponseTemplate::new(200).set_body_string("1"))
        .expect(1)
        .mount(&server)
        .await;

    let config = configuration(&server, &[("MESSAGE", "Hello!")]);
    let channel = TeamsChannel::new(config.webhook_url().clone());

    let summary = run(&config, &channel).await.unwrap();

    assert_eq!(summary, "Notification successful");
}

#[tokio::test]
async fn test_notify_accepts_empty_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let config = configuration(&server, &[("MESSAGE", "Hello!")]);
    let channel = TeamsChannel::new(config.webhook_url().clone());

    assert!(run(&config, &channel).await.is_ok());
}

#[tokio::test]
async fn test_notify_failed_on_404() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let config = configuration(&server, &[("MESSAGE", "Hello!")]);
    let channel = TeamsChannel::new(config.webhook_url().clone());

    let err = run(&config, &channel).await.unwrap_err();

    assert!(matches!(err, NotifyError::Transport(_)));
    let message = err.to_string();
    assert!(
        message.starts_with("Notification failed. Pipe has finished with an error: "),
        "{message}"
    );
    assert!(message.contains("404"), "{message}");
}

#[tokio::test]
async fn test_notify_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let config = configuration(&server, &[("MESSAGE", "Hello!")]);
    let channel =
        TeamsChannel::new(config.webhook_url().clone()).with_timeout(Duration::from_millis(200));

    let err = run(&config, &channel).await.unwrap_err();

    let message = err.to_string();
    match err {
        NotifyError::Transport(source) => assert!(source.is_timeout()),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(message.contains("timed out"), "{message}");
}

#[tokio::test]
async fn test_notify_fails_on_closed_port() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = Configuration::from_vars(|name| match name {
        "WEBHOOK_URL" => Some(format!("http://127.0.0.1:{port}/hook")),
        "MESSAGE" => Some("Hello!".to_string()),
        _ => None,
    })
    .unwrap();
    let channel = TeamsChannel::new(config.webhook_url().clone());

    let err = run(&config, &channel).await.unwrap_err();

    let message = err.to_string();
    match err {
        NotifyError::Transport(source) => {
            assert!(source.is_connect(), "{source:?}");
            assert!(!source.is_timeout());
        }
        other => panic!("expected transport error, got {other:?}"),
    }
    assert!(
        message.starts_with("Notification failed. Pipe has finished with an error: "),
        "{message}"
    );
    assert!(message.to_lowercase().contains("connect"), "{message}");
    assert!(!message.contains("timed out"), "{message}");
}

#[tokio::test]
async fn test_payload_file_is_forwarded_verbatim() {
    let content = json!({
        "type": "message",
        "attachments": [{
            "contentType": "application/vnd.microsoft.card.adaptive",
            "content": {"type": "AdaptiveCard", "version": "1.4", "body": []}
        }]
    });
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(&content))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let path = file.path().display().to_string();
    let config = configuration(&server, &[("PAYLOAD_FILE", path.as_str())]);
    let channel = TeamsChannel::new(config.webhook_url().clone());

    run(&config, &channel).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, content);
}

#[tokio::test]
async fn test_payload_file_numbers_and_key_order_survive() {
    let content = r#"{"id":123456789012345678901234567890,"amount":0.10000000000000000555,"zeta":true,"alpha":null}"#;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let path = file.path().display().to_string();
    let config = configuration(&server, &[("PAYLOAD_FILE", path.as_str())]);
    let channel = TeamsChannel::new(config.webhook_url().clone());

    run(&config, &channel).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(String::from_utf8_lossy(&requests[0].body), content);
}

#[tokio::test]
async fn test_missing_payload_file_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = configuration(&server, &[("PAYLOAD_FILE", "payload.json!")]);
    let channel = TeamsChannel::new(config.webhook_url().clone());

    let err = run(&config, &channel).await.unwrap_err();

    assert_eq!(err.to_string(), "Passed PAYLOAD_FILE path does not exist.");
}

#[tokio::test]
async fn test_invalid_payload_file_makes_no_request() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{\"x\": ").unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let path = file.path().display().to_string();
    let config = configuration(&server, &[("PAYLOAD_FILE", path.as_str())]);
    let channel = TeamsChannel::new(config.webhook_url().clone());

    let err = run(&config, &channel).await.unwrap_err();

    assert!(matches!(err, NotifyError::PayloadFileInvalid { .. }));
    assert!(err.to_string().ends_with("invalid JSON provided."));
}
