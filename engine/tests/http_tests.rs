//! End-to-end tests of the reqwest transport against a mock verification server.

use std::time::Duration;

use serde_json::json;
use siteverify_engine::{ErrorKind, PolicyOptions, ProtocolVersion, VerifyEngine};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine_for(server: &MockServer, version: ProtocolVersion) -> VerifyEngine {
    VerifyEngine::new("my secret", version, Duration::from_secs(5))
        .unwrap()
        .with_endpoint(format!("{}/recaptcha/api/siteverify", server.uri()))
}

fn form_body(request: &wiremock::Request) -> String {
    String::from_utf8(request.body.clone()).unwrap()
}

#[tokio::test]
async fn test_posts_form_and_accepts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recaptcha/api/siteverify"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("secret=my+secret"))
        .and(body_string_contains("response=mycode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "challenge_ts": "2018-03-06T03:41:29+00:00",
            "hostname": "test.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = engine_for(&server, ProtocolVersion::V2);
    let opts = PolicyOptions::new().with_hostname("test.com");
    let result = engine.verify_with_options("mycode", &opts).await.unwrap();
    assert_eq!(result.hostname(), "test.com");

    let requests = server.received_requests().await.unwrap();
    assert!(!form_body(&requests[0]).contains("remoteip"));
}

#[tokio::test]
async fn test_remote_ip_sent_when_supplied() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("remoteip=10.1.2.3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "challenge_ts": "2018-03-06T03:41:29+00:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = engine_for(&server, ProtocolVersion::V2);
    let opts = PolicyOptions::new().with_caller_address("10.1.2.3");
    let err = engine.verify_with_options("mycode", &opts).await.unwrap_err();
    assert_eq!(err.to_string(), "invalid challenge solution or remote IP");
}

#[tokio::test]
async fn test_hostname_mismatch_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "challenge_ts": "2018-03-06T03:41:29+00:00",
            "hostname": "test.com"
        })))
        .mount(&server)
        .await;

    let engine = engine_for(&server, ProtocolVersion::V2);
    let opts = PolicyOptions::new().with_hostname("other.com");
    let err = engine.verify_with_options("mycode", &opts).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HostnameMismatch);
    assert!(err.to_string().contains("test.com"));
    assert!(err.to_string().contains("other.com"));
    assert!(err.response_body().unwrap().contains("\"hostname\""));
}

#[tokio::test]
async fn test_v3_score_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "score": 0.23
        })))
        .mount(&server)
        .await;

    let engine = engine_for(&server, ProtocolVersion::V3);
    let err = engine
        .verify_with_options("mycode", &PolicyOptions::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ScoreBelowMinimum);

    let opts = PolicyOptions::new().with_score_threshold(0.23);
    assert!(engine.verify_with_options("mycode", &opts).await.is_ok());
}

#[tokio::test]
async fn test_error_page_is_parse_failure_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let engine = engine_for(&server, ProtocolVersion::V2);
    let err = engine.verify("mycode").await.unwrap_err();
    assert!(err.is_transport_error());
    assert_eq!(err.kind(), ErrorKind::InvalidJson);
    assert_eq!(err.response_body(), Some("<html>Bad Gateway</html>"));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let engine = VerifyEngine::new("my secret", ProtocolVersion::V2, Duration::from_millis(300))
        .unwrap()
        .with_endpoint(server.uri());
    let err = engine.verify("mycode").await.unwrap_err();
    assert!(err.is_transport_error());
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.response_body(), None);
}

#[tokio::test]
async fn test_zero_timeout_means_no_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = VerifyEngine::new("my secret", ProtocolVersion::V2, Duration::ZERO)
        .unwrap()
        .with_endpoint(server.uri());
    assert_eq!(engine.timeout(), Duration::ZERO);
    let result = engine.verify("tok").await.unwrap();
    assert!(result.success());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop a server so the port is closed.
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    let engine = VerifyEngine::new("my secret", ProtocolVersion::V2, Duration::from_secs(2))
        .unwrap()
        .with_endpoint(uri);
    let err = engine.verify("mycode").await.unwrap_err();
    assert!(err.is_transport_error());
    assert!(err
        .to_string()
        .starts_with("error posting to verification endpoint:"));
}
