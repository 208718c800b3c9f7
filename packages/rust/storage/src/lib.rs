//! Persistence backends for Webstash.
//!
//! The [`DocumentStore`] trait is the seam between the ingestion engine and
//! whatever actually holds documents. Two implementations live here:
//! [`chroma::ChromaStore`] for a ChromaDB-compatible HTTP store and
//! [`memory::MemoryStore`] for tests. The [`filesystem::FileSink`] is the
//! non-store alternative that writes captures straight to disk.
//!
//! Implementations must be `Send + Sync`; every operation is fallible and
//! the engine decides which failures are fatal to an ingestion.

pub mod chroma;
pub mod filesystem;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use webstash_shared::Result;

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Metadata a collection is created with. `updated_at` is refreshed after
/// every successful ingestion as a recency signal for external maintenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    /// Domain the collection's first capture came from.
    pub domain: String,
    /// Human-readable description.
    pub description: String,
    /// Creation time, unix seconds.
    pub created_at: i64,
    /// Last-ingestion time, unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl CollectionMetadata {
    /// Metadata for a collection about to be created.
    pub fn new(domain: impl Into<String>, collection_name: &str, created_at: i64) -> Self {
        Self {
            domain: domain.into(),
            description: format!("Collection for {collection_name}"),
            created_at,
            updated_at: None,
        }
    }
}

/// Metadata attached to every stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Source page URL.
    pub url: String,
    /// Capture time, unix seconds.
    pub created_at: i64,
    /// Content size in KiB, rounded to two decimals.
    pub content_size_kb: f64,
}

impl DocumentMetadata {
    /// Metadata for a capture of `content` taken at `created_at`.
    pub fn new(url: impl Into<String>, created_at: i64, content: &str) -> Self {
        Self {
            url: url.into(),
            created_at,
            content_size_kb: (content.len() as f64 / 1024.0 * 100.0).round() / 100.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Store handles
// ---------------------------------------------------------------------------

/// Handle to a collection inside the store. Document operations address the
/// store-assigned `id`; `name` is the classification bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionHandle {
    pub id: String,
    pub name: String,
    /// Whatever metadata the store currently holds for the collection.
    #[serde(default)]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Result of a point lookup by document ids: the subset of ids that exist.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentLookup {
    #[serde(default)]
    pub ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// DocumentStore trait
// ---------------------------------------------------------------------------

/// Abstract document-store backend.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`list_collections`](DocumentStore::list_collections) | All collection names |
/// | [`get_collection`](DocumentStore::get_collection) | Fetch a collection by exact name |
/// | [`create_collection`](DocumentStore::create_collection) | Create a collection with metadata |
/// | [`get_documents`](DocumentStore::get_documents) | Point lookup by document ids |
/// | [`add_documents`](DocumentStore::add_documents) | Insert new documents |
/// | [`update_documents`](DocumentStore::update_documents) | Replace content/metadata in place |
/// | [`modify_collection`](DocumentStore::modify_collection) | Replace collection metadata |
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List the names of all collections in the store.
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Fetch a collection by exact, case-sensitive name.
    async fn get_collection(&self, name: &str) -> Result<CollectionHandle>;

    /// Create a collection with the given metadata.
    async fn create_collection(
        &self,
        name: &str,
        metadata: &CollectionMetadata,
    ) -> Result<CollectionHandle>;

    /// Look up documents by id. Returns the ids that exist.
    async fn get_documents(
        &self,
        collection: &CollectionHandle,
        ids: &[String],
    ) -> Result<DocumentLookup>;

    /// Add new documents (parallel `ids`/`documents`/`metadatas` arrays).
    async fn add_documents(
        &self,
        collection: &CollectionHandle,
        ids: &[String],
        documents: &[String],
        metadatas: &[DocumentMetadata],
    ) -> Result<()>;

    /// Update existing documents in place.
    async fn update_documents(
        &self,
        collection: &CollectionHandle,
        ids: &[String],
        documents: &[String],
        metadatas: &[DocumentMetadata],
    ) -> Result<()>;

    /// Replace a collection's metadata.
    async fn modify_collection(
        &self,
        collection: &CollectionHandle,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Result<()>;
}
