//! Integration tests for the authenticated XML client using wiremock.
//!
//! These verify the request the client sends (Basic auth, Accept header,
//! composed path) and how each failure boundary surfaces as a `JssError`.

use jss_scripts::auth::Credentials;
use jss_scripts::client::JssClient;
use jss_scripts::endpoint::Endpoint;
use jss_scripts::error::JssError;
use jss_scripts::session::Session;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper: creates a JssClient pointed at the given wiremock server.
fn mock_client(server: &MockServer) -> JssClient {
    let session = Session::new(
        Credentials::new("admin", "secret"),
        Endpoint::new(server.uri()).unwrap(),
    );
    JssClient::new(session).unwrap()
}

#[tokio::test]
async fn fetch_sends_basic_auth_and_parses_xml() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/JSSResource/policies"))
        .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
        .and(header("accept", "application/xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<?xml version="1.0" encoding="UTF-8"?><policies><size>0</size></policies>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let root = client.fetch_path("/JSSResource/policies", &[]).await.unwrap();
    assert_eq!(root.tag, "policies");
    assert_eq!(root.find_text("size"), Some("0"));
}

#[tokio::test]
async fn fetch_path_composes_segments() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/JSSResource/policies/id/42/subset/scripts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<policy><scripts><size>0</size></scripts></policy>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let root = client
        .fetch_path("JSSResource/policies/id", &["42", "subset/scripts"])
        .await
        .unwrap();
    assert_eq!(root.find_text("scripts/size"), Some("0"));
}

#[tokio::test]
async fn empty_url_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.fetch("").await.unwrap_err();
    assert!(matches!(err, JssError::MissingUrl));
}

#[tokio::test]
async fn unauthorized_returns_request_error_with_body() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/JSSResource/policies"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string("<html><body>The request requires user authentication</body></html>"),
        )
        .mount(&server)
        .await;

    let err = client.fetch_path("/JSSResource/policies", &[]).await.unwrap_err();
    match err {
        JssError::Request { status, url, body } => {
            assert_eq!(status.as_u16(), 401);
            assert!(url.ends_with("/JSSResource/policies"));
            assert!(body.contains("requires user authentication"));
        }
        other => panic!("expected Request error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/JSSResource/policies"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.fetch_path("/JSSResource/policies", &[]).await.unwrap_err();
    assert!(err.to_string().contains("500"), "got: {err}");
}

#[tokio::test]
async fn malformed_xml_returns_parse_error() {
    let server = MockServer::start().await;
    let client = mock_client(&server);

    Mock::given(method("GET"))
        .and(path("/JSSResource/policies"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<policies><policy>"))
        .mount(&server)
        .await;

    let err = client.fetch_path("/JSSResource/policies", &[]).await.unwrap_err();
    assert!(matches!(err, JssError::Parse { .. }), "got: {err:?}");
}

#[tokio::test]
async fn connection_refused_returns_network_error() {
    // Bind only to learn a free port; nothing listens once the listener drops.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let session = Session::new(
        Credentials::new("a", "b"),
        Endpoint::new(format!("http://{addr}")).unwrap(),
    );
    let client = JssClient::new(session).unwrap();

    let err = client.fetch_path("/JSSResource/policies", &[]).await.unwrap_err();
    assert!(matches!(err, JssError::Network(_)), "got: {err:?}");
}
