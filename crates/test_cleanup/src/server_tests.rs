use super::*;
use std::collections::HashMap;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serial_test::serial;
use tower::ServiceExt;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

async fn get(app: Router, uri: &str) -> (StatusCode, String, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

#[test]
fn test_default_config() {
    let config = CleanupServerConfig::default();

    assert_eq!(config.port, 8005);
    assert_eq!(config.host, "0.0.0.0");
}

#[test]
fn test_config_from_lookup() {
    let config = CleanupServerConfig::from_lookup(lookup(&[
        ("CLEANUP_PORT", "9005"),
        ("CLEANUP_HOST", "127.0.0.1"),
        ("PROJECT_ROOT", "/srv/shop"),
    ]))
    .unwrap();

    assert_eq!(config.port, 9005);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.project_root, PathBuf::from("/srv/shop"));
}

#[test]
fn test_relative_project_root_is_made_absolute() {
    let config =
        CleanupServerConfig::from_lookup(lookup(&[("PROJECT_ROOT", "development")])).unwrap();

    assert!(config.project_root.is_absolute());
    assert!(config.project_root.ends_with("development"));
}

#[test]
fn test_invalid_port_is_rejected() {
    let result = CleanupServerConfig::from_lookup(lookup(&[("CLEANUP_PORT", "eighty")]));

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_config_from_env() {
    unsafe {
        std::env::set_var("CLEANUP_PORT", "8105");
        std::env::set_var("PROJECT_ROOT", "/opt/shop");
        std::env::remove_var("CLEANUP_HOST");
    }

    let config = CleanupServerConfig::from_env().unwrap();

    assert_eq!(config.port, 8105);
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.project_root, PathBuf::from("/opt/shop"));

    unsafe {
        std::env::remove_var("CLEANUP_PORT");
        std::env::remove_var("PROJECT_ROOT");
    }
}

#[test]
fn test_server_runs_psh_cleanup() {
    let server = CleanupServer::new(CleanupServerConfig {
        project_root: PathBuf::from("/srv/shop"),
        ..Default::default()
    });

    assert_eq!(server.command.display(), "/srv/shop/psh.phar e2e:cleanup");
    let _router = server.router();
}

#[cfg(unix)]
#[tokio::test]
async fn test_cleanup_answers_success() {
    let app = router(Arc::new(ShellCommand::new("sh", ["-c", "echo restored"])));

    let (status, content_type, body) = get(app, "/cleanup").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/html"));
    assert_eq!(body, "success");
}

#[cfg(unix)]
#[tokio::test]
async fn test_cleanup_failure_answers_report_with_ok_status() {
    let app = router(Arc::new(ShellCommand::new(
        "sh",
        ["-c", "echo half-done; echo no database >&2; exit 1"],
    )));

    let (status, _, body) = get(app, "/cleanup").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("exited with code 1"));
    assert!(body.contains("half-done"));
    assert!(body.contains("no database"));
}

#[tokio::test]
async fn test_other_paths_answer_empty_page() {
    let app = router(Arc::new(ShellCommand::new(
        "/definitely/not/a/program",
        Vec::<String>::new(),
    )));

    let (status, content_type, body) = get(app, "/favicon.ico").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/html"));
    assert!(body.is_empty());
}
