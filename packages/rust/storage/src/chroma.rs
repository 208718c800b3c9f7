//! ChromaDB HTTP client implementing [`DocumentStore`].
//!
//! Talks to the Chroma v1 REST API. Every call carries the configured
//! timeout so a stalled store turns into a reported error instead of a hung
//! request loop. [`ChromaStore::connect`] probes the heartbeat endpoint;
//! the host uses a failed probe to enter degraded mode rather than abort.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use webstash_shared::{Result, StoreConfig, WebstashError};

use crate::{CollectionHandle, CollectionMetadata, DocumentLookup, DocumentMetadata, DocumentStore};

/// User-Agent string for store requests.
const USER_AGENT: &str = concat!("Webstash/", env!("CARGO_PKG_VERSION"));

/// Heartbeat response shape (`{"nanosecond heartbeat": ...}`); only its
/// arrival matters.
#[derive(Debug, Deserialize)]
struct Heartbeat {}

/// ChromaDB-compatible document store over HTTP.
#[derive(Debug)]
pub struct ChromaStore {
    client: Client,
    base_url: String,
}

impl ChromaStore {
    /// Build a client for the configured store without contacting it.
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WebstashError::Store(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client and verify the store answers its heartbeat.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let store = Self::new(config)?;
        store.heartbeat().await?;
        debug!(url = %store.base_url, "document store reachable");
        Ok(store)
    }

    /// Probe the store's heartbeat endpoint.
    pub async fn heartbeat(&self) -> Result<()> {
        let url = self.endpoint("/api/v1/heartbeat");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WebstashError::Store(format!("heartbeat failed: {e}")))?;
        let _beat: Heartbeat = Self::parse(response, "GET", "/api/v1/heartbeat").await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Map a response to its JSON body, folding HTTP-level failures into
    /// [`WebstashError::Store`] with enough context to debug from stderr.
    async fn parse<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
        method: &str,
        path: &str,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WebstashError::Store(format!(
                "{method} {path} returned {status}: {body}"
            )));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| WebstashError::Store(format!("{method} {path} returned bad JSON: {e}")))
    }

    /// Check status only, discarding the body.
    async fn expect_success(
        response: reqwest::Response,
        method: &str,
        path: &str,
    ) -> Result<()> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WebstashError::Store(format!(
                "{method} {path} returned {status}: {body}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for ChromaStore {
    async fn list_collections(&self) -> Result<Vec<String>> {
        let path = "/api/v1/collections";
        let response = self
            .client
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(|e| WebstashError::Store(e.to_string()))?;
        let collections: Vec<CollectionHandle> = Self::parse(response, "GET", path).await?;
        Ok(collections.into_iter().map(|c| c.name).collect())
    }

    async fn get_collection(&self, name: &str) -> Result<CollectionHandle> {
        let path = format!("/api/v1/collections/{name}");
        let response = self
            .client
            .get(self.endpoint(&path))
            .send()
            .await
            .map_err(|e| WebstashError::Store(e.to_string()))?;
        Self::parse(response, "GET", &path).await
    }

    async fn create_collection(
        &self,
        name: &str,
        metadata: &CollectionMetadata,
    ) -> Result<CollectionHandle> {
        let path = "/api/v1/collections";
        let response = self
            .client
            .post(self.endpoint(path))
            .json(&json!({
                "name": name,
                "metadata": metadata,
                "get_or_create": false,
            }))
            .send()
            .await
            .map_err(|e| WebstashError::Store(e.to_string()))?;
        Self::parse(response, "POST", path).await
    }

    async fn get_documents(
        &self,
        collection: &CollectionHandle,
        ids: &[String],
    ) -> Result<DocumentLookup> {
        let path = format!("/api/v1/collections/{}/get", collection.id);
        let response = self
            .client
            .post(self.endpoint(&path))
            .json(&json!({ "ids": ids }))
            .send()
            .await
            .map_err(|e| WebstashError::Store(e.to_string()))?;
        Self::parse(response, "POST", &path).await
    }

    async fn add_documents(
        &self,
        collection: &CollectionHandle,
        ids: &[String],
        documents: &[String],
        metadatas: &[DocumentMetadata],
    ) -> Result<()> {
        let path = format!("/api/v1/collections/{}/add", collection.id);
        let response = self
            .client
            .post(self.endpoint(&path))
            .json(&json!({
                "ids": ids,
                "documents": documents,
                "metadatas": metadatas,
            }))
            .send()
            .await
            .map_err(|e| WebstashError::Store(e.to_string()))?;
        Self::expect_success(response, "POST", &path).await
    }

    async fn update_documents(
        &self,
        collection: &CollectionHandle,
        ids: &[String],
        documents: &[String],
        metadatas: &[DocumentMetadata],
    ) -> Result<()> {
        let path = format!("/api/v1/collections/{}/update", collection.id);
        let response = self
            .client
            .post(self.endpoint(&path))
            .json(&json!({
                "ids": ids,
                "documents": documents,
                "metadatas": metadatas,
            }))
            .send()
            .await
            .map_err(|e| WebstashError::Store(e.to_string()))?;
        Self::expect_success(response, "POST", &path).await
    }

    async fn modify_collection(
        &self,
        collection: &CollectionHandle,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Result<()> {
        let path = format!("/api/v1/collections/{}", collection.id);
        let response = self
            .client
            .put(self.endpoint(&path))
            .json(&json!({ "new_metadata": metadata }))
            .send()
            .await
            .map_err(|e| WebstashError::Store(e.to_string()))?;
        Self::expect_success(response, "PUT", &path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> ChromaStore {
        ChromaStore::new(&StoreConfig {
            url: server.uri(),
            timeout_secs: 5,
        })
        .expect("build store")
    }

    #[tokio::test]
    async fn connect_succeeds_on_heartbeat() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/heartbeat"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"nanosecond heartbeat": 1})),
            )
            .mount(&server)
            .await;

        let config = StoreConfig {
            url: server.uri(),
            timeout_secs: 5,
        };
        assert!(ChromaStore::connect(&config).await.is_ok());
    }

    #[tokio::test]
    async fn connect_fails_when_store_is_down() {
        // Nothing mounted: every request 404s.
        let server = MockServer::start().await;
        let config = StoreConfig {
            url: server.uri(),
            timeout_secs: 5,
        };
        let err = ChromaStore::connect(&config).await.unwrap_err();
        assert!(err.to_string().contains("heartbeat"));
    }

    #[tokio::test]
    async fn lists_collection_names() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/collections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "c1", "name": "github_repositories", "metadata": {"domain": "github.com"}},
                {"id": "c2", "name": "linkedin_profiles"},
            ])))
            .mount(&server)
            .await;

        let names = store_for(&server).list_collections().await.expect("list");
        assert_eq!(names, vec!["github_repositories", "linkedin_profiles"]);
    }

    #[tokio::test]
    async fn creates_collection_with_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/collections"))
            .and(body_partial_json(json!({
                "name": "github_repositories",
                "metadata": {"domain": "github.com"},
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "c1",
                "name": "github_repositories",
                "metadata": {"domain": "github.com"},
            })))
            .mount(&server)
            .await;

        let metadata = CollectionMetadata::new("github.com", "github_repositories", 1_700_000_000);
        let handle = store_for(&server)
            .create_collection("github_repositories", &metadata)
            .await
            .expect("create");
        assert_eq!(handle.id, "c1");
        assert_eq!(handle.name, "github_repositories");
    }

    #[tokio::test]
    async fn adds_documents_to_collection_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/collections/c1/add"))
            .and(body_partial_json(json!({
                "ids": ["https://example.com/page_28333333"],
                "documents": ["# hi"],
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!(true)))
            .mount(&server)
            .await;

        let collection = CollectionHandle {
            id: "c1".into(),
            name: "example_pages".into(),
            metadata: None,
        };
        let metadatas = vec![DocumentMetadata::new(
            "https://example.com/page",
            1_700_000_000,
            "# hi",
        )];
        store_for(&server)
            .add_documents(
                &collection,
                &["https://example.com/page_28333333".into()],
                &["# hi".into()],
                &metadatas,
            )
            .await
            .expect("add");
    }

    #[tokio::test]
    async fn surfaces_server_errors_with_context() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/collections/missing"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = store_for(&server)
            .get_collection("missing")
            .await
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("500"));
        assert!(text.contains("boom"));
    }
}
