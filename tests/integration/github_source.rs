//! Installing from the GitHub contents API.

use crate::common::{LauncherEnv, release_archive};
use base64::Engine as _;
use kcdmod_launcher::core::ErrorKind;
use kcdmod_launcher::session::LauncherSession;
use mockito::{Matcher, Server};

fn contents_envelope(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text);
    // The API wraps base64 content at 60 columns.
    let wrapped: Vec<String> = encoded
        .as_bytes()
        .chunks(60)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect();
    serde_json::json!({
        "name": ".version",
        "encoding": "base64",
        "content": wrapped.join("\n"),
    })
    .to_string()
}

#[tokio::test]
async fn test_update_from_private_repository() {
    let env = LauncherEnv::new();
    let mut server = Server::new_async().await;

    let version = server
        .mock("GET", "/repos/acme/kcdmod-releases/contents/.version")
        .match_query(Matcher::UrlEncoded("ref".into(), "main".into()))
        .match_header("authorization", "token ghp_secret")
        .with_header("content-type", "application/json")
        .with_body(contents_envelope("3.1.0:release\n"))
        .expect_at_least(1)
        .create_async()
        .await;
    let package = server
        .mock("GET", "/repos/acme/kcdmod-releases/contents/kcdmod.zip")
        .match_query(Matcher::UrlEncoded("ref".into(), "main".into()))
        .match_header("authorization", "token ghp_secret")
        .match_header("accept", "application/vnd.github.v3.raw")
        .with_body(release_archive())
        .create_async()
        .await;

    let mut config = env.base_config();
    config.source.api_url = server.url();
    config.apply_env_overrides(|key| match key {
        "GITHUB_TOKEN" => Some("ghp_secret".to_string()),
        "GITHUB_ORG" => Some("acme".to_string()),
        "GITHUB_REPO" => Some("kcdmod-releases".to_string()),
        _ => None,
    });

    let session = LauncherSession::from_config(&config, false).unwrap();
    let outcome = session.check_version().await.unwrap();
    assert!(outcome.update_available);
    assert_eq!(outcome.version.to_string(), "3.1.0:release");

    let installed = session.start_update().await.unwrap();
    assert_eq!(installed.version.to_string(), "3.1.0:release");
    assert_eq!(env.local_version().as_deref(), Some("3.1.0:release"));

    version.assert_async().await;
    package.assert_async().await;
}

#[tokio::test]
async fn test_missing_repository_is_network_error() {
    let env = LauncherEnv::new();
    let mut server = Server::new_async().await;
    let _missing = server
        .mock("GET", Matcher::Regex("^/repos/acme/gone/contents/.*".into()))
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;

    let mut config = env.base_config();
    config.source.api_url = server.url();
    config.source.owner = Some("acme".to_string());
    config.source.repository = Some("gone".to_string());

    let session = LauncherSession::from_config(&config, false).unwrap();
    let err = session.check_version().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.to_string().contains("404"));
}
