//! Sources a catalog document can be fetched from

use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;
use tracing::warn;

use crate::catalog::error::CatalogError;

/// Trait for fetching a raw catalog document
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable location, used in logs
    fn location(&self) -> String;

    /// Fetches the whole catalog document, still carrying substituted keys
    async fn fetch_document(&self) -> Result<serde_json::Value, CatalogError>;
}

/// Catalog document stored on the local filesystem
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CatalogSource for FileCatalogSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_document(&self) -> Result<serde_json::Value, CatalogError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CatalogError::NotFound(self.location()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&content)?)
    }
}

/// Catalog document served over HTTP
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: &str) -> Result<Self, CatalogError> {
        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent("cdn-resolver")
                .build()?,
            url: url.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl CatalogSource for HttpCatalogSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    async fn fetch_document(&self) -> Result<serde_json::Value, CatalogError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(self.url.clone()));
        }

        if !status.is_success() {
            warn!("Catalog source returned status {}: {}", status, self.url);
            return Err(CatalogError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        response.json().await.map_err(|e| {
            warn!("Failed to parse catalog response: {}", e);
            CatalogError::InvalidResponse(e.to_string())
        })
    }
}

/// Pick the source matching a configured location
pub fn source_for(location: &str) -> Result<Box<dyn CatalogSource>, CatalogError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpCatalogSource::new(location)?))
    } else {
        Ok(Box::new(FileCatalogSource::new(location)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::json;

    #[tokio::test]
    async fn http_source_returns_document() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/cdn.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "packages": { "jquery": { "latest": "2:1:4" } } }"#)
            .create_async()
            .await;

        let source = HttpCatalogSource::new(&format!("{}/cdn.json", server.url())).unwrap();
        let result = source.fetch_document().await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            result,
            json!({ "packages": { "jquery": { "latest": "2:1:4" } } })
        );
    }

    #[tokio::test]
    async fn http_source_returns_not_found_on_404() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/missing.json")
            .with_status(404)
            .create_async()
            .await;

        let source = HttpCatalogSource::new(&format!("{}/missing.json", server.url())).unwrap();
        let result = source.fetch_document().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn http_source_returns_invalid_response_on_server_error() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/cdn.json")
            .with_status(500)
            .create_async()
            .await;

        let source = HttpCatalogSource::new(&format!("{}/cdn.json", server.url())).unwrap();
        let result = source.fetch_document().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(CatalogError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn file_source_reads_document() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cdn.json");
        std::fs::write(&path, r#"{ "packages": {} }"#).unwrap();

        let result = FileCatalogSource::new(&path).fetch_document().await.unwrap();

        assert_eq!(result, json!({ "packages": {} }));
    }

    #[tokio::test]
    async fn file_source_returns_not_found_for_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();

        let result = FileCatalogSource::new(dir.path().join("absent.json"))
            .fetch_document()
            .await;

        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn file_source_rejects_malformed_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cdn.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = FileCatalogSource::new(&path).fetch_document().await;

        assert!(matches!(result, Err(CatalogError::Json(_))));
    }

    #[test]
    fn source_for_picks_http_for_urls_and_file_otherwise() {
        assert_eq!(
            source_for("https://cdn.example.com/data.json")
                .unwrap()
                .location(),
            "https://cdn.example.com/data.json"
        );
        assert_eq!(
            source_for("cdnall_data.json").unwrap().location(),
            "cdnall_data.json"
        );
    }
}
