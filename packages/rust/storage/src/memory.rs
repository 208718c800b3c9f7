//! In-memory [`DocumentStore`] implementation for tests.
//!
//! `HashMap`s behind a shared `RwLock`; collection ids are the collection
//! names. Clones share state, so a test can hand one handle to an engine
//! and keep another for assertions. Inspection helpers expose stored state
//! so tests never reach into internals.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use webstash_shared::{Result, WebstashError};

use crate::{CollectionHandle, CollectionMetadata, DocumentLookup, DocumentMetadata, DocumentStore};

/// A document as held by the in-memory store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub content: String,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Default)]
struct StoredCollection {
    metadata: serde_json::Map<String, serde_json::Value>,
    documents: HashMap<String, StoredDocument>,
}

/// In-memory store for engine and dispatcher tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, StoredCollection>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held by `collection`.
    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .unwrap()
            .get(collection)
            .map_or(0, |c| c.documents.len())
    }

    /// Fetch a stored document by collection name and document id.
    pub fn document(&self, collection: &str, id: &str) -> Option<StoredDocument> {
        self.collections
            .read()
            .unwrap()
            .get(collection)?
            .documents
            .get(id)
            .cloned()
    }

    /// Current metadata for `collection`.
    pub fn collection_metadata(
        &self,
        collection: &str,
    ) -> Option<serde_json::Map<String, serde_json::Value>> {
        self.collections
            .read()
            .unwrap()
            .get(collection)
            .map(|c| c.metadata.clone())
    }

    fn handle(name: &str, metadata: &serde_json::Map<String, serde_json::Value>) -> CollectionHandle {
        CollectionHandle {
            id: name.to_string(),
            name: name.to_string(),
            metadata: Some(metadata.clone()),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_collections(&self) -> Result<Vec<String>> {
        let collections = self.collections.read().unwrap();
        Ok(collections.keys().cloned().collect())
    }

    async fn get_collection(&self, name: &str) -> Result<CollectionHandle> {
        let collections = self.collections.read().unwrap();
        let collection = collections
            .get(name)
            .ok_or_else(|| WebstashError::Store(format!("collection '{name}' does not exist")))?;
        Ok(Self::handle(name, &collection.metadata))
    }

    async fn create_collection(
        &self,
        name: &str,
        metadata: &CollectionMetadata,
    ) -> Result<CollectionHandle> {
        let mut collections = self.collections.write().unwrap();
        if collections.contains_key(name) {
            return Err(WebstashError::Store(format!(
                "collection '{name}' already exists"
            )));
        }

        let metadata_map = match serde_json::to_value(metadata) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        collections.insert(
            name.to_string(),
            StoredCollection {
                metadata: metadata_map.clone(),
                documents: HashMap::new(),
            },
        );
        Ok(Self::handle(name, &metadata_map))
    }

    async fn get_documents(
        &self,
        collection: &CollectionHandle,
        ids: &[String],
    ) -> Result<DocumentLookup> {
        let collections = self.collections.read().unwrap();
        let stored = collections
            .get(&collection.id)
            .ok_or_else(|| WebstashError::Store(format!("no collection '{}'", collection.id)))?;
        Ok(DocumentLookup {
            ids: ids
                .iter()
                .filter(|id| stored.documents.contains_key(*id))
                .cloned()
                .collect(),
        })
    }

    async fn add_documents(
        &self,
        collection: &CollectionHandle,
        ids: &[String],
        documents: &[String],
        metadatas: &[DocumentMetadata],
    ) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        let stored = collections
            .get_mut(&collection.id)
            .ok_or_else(|| WebstashError::Store(format!("no collection '{}'", collection.id)))?;
        for ((id, document), metadata) in ids.iter().zip(documents).zip(metadatas) {
            if stored.documents.contains_key(id) {
                return Err(WebstashError::Store(format!("document '{id}' already exists")));
            }
            stored.documents.insert(
                id.clone(),
                StoredDocument {
                    content: document.clone(),
                    metadata: metadata.clone(),
                },
            );
        }
        Ok(())
    }

    async fn update_documents(
        &self,
        collection: &CollectionHandle,
        ids: &[String],
        documents: &[String],
        metadatas: &[DocumentMetadata],
    ) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        let stored = collections
            .get_mut(&collection.id)
            .ok_or_else(|| WebstashError::Store(format!("no collection '{}'", collection.id)))?;
        for ((id, document), metadata) in ids.iter().zip(documents).zip(metadatas) {
            let existing = stored.documents.get_mut(id).ok_or_else(|| {
                WebstashError::Store(format!("document '{id}' does not exist"))
            })?;
            existing.content = document.clone();
            existing.metadata = metadata.clone();
        }
        Ok(())
    }

    async fn modify_collection(
        &self,
        collection: &CollectionHandle,
        metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        let stored = collections
            .get_mut(&collection.id)
            .ok_or_else(|| WebstashError::Store(format!("no collection '{}'", collection.id)))?;
        stored.metadata = metadata;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> CollectionMetadata {
        CollectionMetadata::new("example.com", "example_pages", 1_700_000_000)
    }

    #[tokio::test]
    async fn create_then_list_and_get() {
        let store = MemoryStore::new();
        store
            .create_collection("example_pages", &metadata())
            .await
            .expect("create");

        assert_eq!(store.list_collections().await.unwrap(), vec!["example_pages"]);

        let handle = store.get_collection("example_pages").await.expect("get");
        assert_eq!(handle.name, "example_pages");
        let collection_meta = handle.metadata.expect("metadata");
        assert_eq!(
            collection_meta.get("domain").and_then(|v| v.as_str()),
            Some("example.com")
        );
    }

    #[tokio::test]
    async fn get_missing_collection_errors() {
        let store = MemoryStore::new();
        assert!(store.get_collection("nope").await.is_err());
    }

    #[tokio::test]
    async fn duplicate_create_errors() {
        let store = MemoryStore::new();
        store.create_collection("c", &metadata()).await.unwrap();
        assert!(store.create_collection("c", &metadata()).await.is_err());
    }

    #[tokio::test]
    async fn add_lookup_update_cycle() {
        let store = MemoryStore::new();
        let handle = store.create_collection("c", &metadata()).await.unwrap();
        let id = "https://example.com/a_28000000".to_string();
        let doc_meta = DocumentMetadata::new("https://example.com/a", 1_700_000_000, "one");

        store
            .add_documents(&handle, &[id.clone()], &["one".into()], &[doc_meta.clone()])
            .await
            .expect("add");

        let lookup = store.get_documents(&handle, &[id.clone()]).await.unwrap();
        assert_eq!(lookup.ids, vec![id.clone()]);

        let missing = store
            .get_documents(&handle, &["other".into()])
            .await
            .unwrap();
        assert!(missing.ids.is_empty());

        store
            .update_documents(&handle, &[id.clone()], &["two".into()], &[doc_meta])
            .await
            .expect("update");
        assert_eq!(store.document("c", &id).unwrap().content, "two");
        assert_eq!(store.document_count("c"), 1);
    }

    #[tokio::test]
    async fn modify_replaces_collection_metadata() {
        let store = MemoryStore::new();
        let handle = store.create_collection("c", &metadata()).await.unwrap();

        let mut updated = handle.metadata.clone().unwrap();
        updated.insert("updated_at".into(), serde_json::json!(1_700_000_060));
        store
            .modify_collection(&handle, updated)
            .await
            .expect("modify");

        let stored = store.collection_metadata("c").unwrap();
        assert_eq!(
            stored.get("updated_at").and_then(|v| v.as_i64()),
            Some(1_700_000_060)
        );
        assert!(stored.contains_key("domain"));
    }
}
