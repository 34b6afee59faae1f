use super::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_server_url_uses_shop_host_and_cleanup_port() {
    let restorer = CleanupServerRestorer::new("http://shop.test:8000/admin", 8005).unwrap();

    assert_eq!(restorer.server_url().as_str(), "http://shop.test:8005/");
}

#[test]
fn test_https_shop_still_uses_plain_http_cleanup_server() {
    let restorer = CleanupServerRestorer::new("https://shop.test/", 8005).unwrap();

    assert_eq!(restorer.server_url().as_str(), "http://shop.test:8005/");
}

#[test]
fn test_shop_url_without_host_is_rejected() {
    let result = CleanupServerRestorer::new("not a url", DEFAULT_CLEANUP_PORT);

    assert!(matches!(result, Err(RestoreError::InvalidUrl { .. })));
}

#[tokio::test]
async fn test_restore_accepts_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cleanup"))
        .respond_with(ResponseTemplate::new(200).set_body_string("success"))
        .expect(1)
        .mount(&server)
        .await;

    let restorer = CleanupServerRestorer::with_server_url(&server.uri()).unwrap();

    restorer.restore().await.unwrap();
}

#[tokio::test]
async fn test_restore_rejects_other_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cleanup"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Error: psh.phar not found"))
        .mount(&server)
        .await;

    let restorer = CleanupServerRestorer::with_server_url(&server.uri()).unwrap();

    let error = restorer.restore().await.unwrap_err();

    match error {
        RestoreError::Rejected { body } => assert!(body.contains("psh.phar not found")),
        other => panic!("Expected a rejected restore, got {other:?}"),
    }
}

#[tokio::test]
async fn test_restore_propagates_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cleanup"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let restorer = CleanupServerRestorer::with_server_url(&server.uri()).unwrap();

    let error = restorer.restore().await.unwrap_err();

    assert!(matches!(error, RestoreError::Request(ref e) if e.status() == Some(500)));
}

#[test]
fn test_local_restorer_runs_console_command() {
    let restorer = LocalConsoleRestorer::new("/var/www/shop");

    assert_eq!(
        restorer.command().display(),
        "/var/www/shop/bin/console e2e:restore-db"
    );
}

#[tokio::test]
async fn test_local_restorer_reports_missing_console() {
    let dir = tempfile::tempdir().unwrap();
    let restorer = LocalConsoleRestorer::new(dir.path());

    let error = restorer.restore().await.unwrap_err();

    assert!(matches!(
        error,
        RestoreError::Command(CommandError::Spawn { .. })
    ));
}
