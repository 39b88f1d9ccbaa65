//! Catalog loading from HTTP and file sources, followed by resolution

mod helper;

use std::sync::Arc;

use cdn_resolver::catalog::error::CatalogError;
use cdn_resolver::catalog::loader::load_catalog;
use cdn_resolver::config::{CatalogConfig, ResolverConfig};
use cdn_resolver::proxy::PackageProxy;
use cdn_resolver::proxy::response::ProxyResponse;
use helper::encoded_fixture_document;
use mockito::Server;
use tempfile::TempDir;

#[tokio::test]
async fn http_catalog_with_encoded_keys_resolves_requests() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/cdnall_data.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(encoded_fixture_document())
        .create_async()
        .await;

    let config = CatalogConfig {
        sources: vec![format!("{}/cdnall_data.json", server.url())],
        ..CatalogConfig::default()
    };
    let catalog = load_catalog(&config).await.unwrap();

    mock.assert_async().await;
    let proxy = PackageProxy::with_catalog(ResolverConfig::default(), Arc::new(catalog));
    assert_eq!(
        proxy.handle("jquery@2.1.x"),
        ProxyResponse::Fetch {
            urls: vec!["cdnjs:jquery@2.1.4/jquery.min.js".to_string()]
        }
    );
}

#[tokio::test]
async fn later_file_source_overrides_earlier_http_source() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/base.json")
        .with_status(200)
        .with_body(encoded_fixture_document())
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let override_path = dir.path().join("override.json");
    std::fs::write(
        &override_path,
        r#"{ "packages": { "react": {
            "versions": { "16:0:0": { "unpkg": 0 } },
            "latest": "16.0.0",
            "mains": ["umd/react.production.min.js"],
            "files": { "16:0:0": "umd/react.production.min.js" }
        } } }"#,
    )
    .unwrap();

    let config = CatalogConfig {
        sources: vec![
            format!("{}/base.json", server.url()),
            override_path.display().to_string(),
        ],
        ..CatalogConfig::default()
    };
    let catalog = load_catalog(&config).await.unwrap();

    mock.assert_async().await;
    let proxy = PackageProxy::with_catalog(ResolverConfig::default(), Arc::new(catalog));
    assert_eq!(
        proxy.handle("react,jquery?"),
        ProxyResponse::Fetch {
            urls: vec![
                "unpkg:react@16.0.0/umd/react.production.min.js".to_string(),
                "cdnjs:jquery@2.1.4/jquery.min.js".to_string(),
            ]
        }
    );
}

#[tokio::test]
async fn missing_source_fails_loading() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/gone.json")
        .with_status(404)
        .create_async()
        .await;

    let config = CatalogConfig {
        sources: vec![format!("{}/gone.json", server.url())],
        ..CatalogConfig::default()
    };
    let result = load_catalog(&config).await;

    mock.assert_async().await;
    assert!(matches!(result, Err(CatalogError::NotFound(_))));
}
