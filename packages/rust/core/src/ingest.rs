//! The ingestion engine: classify, get-or-create, minute-window upsert,
//! recency refresh.
//!
//! One engine, pluggable sink. The document-store path holds no durable
//! state of its own; every request is independently classified and written
//! through the [`DocumentStore`] collaborator. The existence-check-then-
//! write sequence is best-effort, not transactional: the browser runs one
//! host per extension connection, so this process is the only writer in
//! practice.

use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use webstash_classifier::{classify, split_url};
use webstash_shared::{Result, SaveResponse};
use webstash_storage::filesystem::FileSink;
use webstash_storage::{CollectionMetadata, DocumentMetadata, DocumentStore};

/// Width of the dedup window: captures of the same URL inside one window
/// collapse into a single document, later windows get fresh documents.
const DEDUP_WINDOW_SECS: i64 = 60;

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Where ingested captures go, chosen once at startup.
pub enum Sink<S> {
    /// Document-store sink. `None` is the explicit degraded state entered
    /// when the store could not be reached at startup: every ingestion
    /// fails fast with "store unavailable" and performs no side effects.
    Store(Option<S>),
    /// Plain files under a sandbox root.
    Filesystem(FileSink),
}

// ---------------------------------------------------------------------------
// IngestEngine
// ---------------------------------------------------------------------------

/// Classifies a capture's URL and persists its content through the sink.
pub struct IngestEngine<S> {
    sink: Sink<S>,
}

impl<S: DocumentStore> IngestEngine<S> {
    /// Create an engine over the given sink.
    pub fn new(sink: Sink<S>) -> Self {
        Self { sink }
    }

    /// Whether the engine is in the degraded no-store state.
    pub fn is_degraded(&self) -> bool {
        matches!(self.sink, Sink::Store(None))
    }

    /// Ingest one capture. Never fails: every failure is folded into the
    /// response payload.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn ingest(&self, url: &str, content: &str) -> SaveResponse {
        self.ingest_at(url, content, Utc::now()).await
    }

    /// [`ingest`](Self::ingest) with an explicit clock, the seam the
    /// window-behavior tests drive.
    pub(crate) async fn ingest_at(
        &self,
        url: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> SaveResponse {
        match &self.sink {
            Sink::Store(None) => {
                debug!("store unavailable, rejecting ingestion");
                SaveResponse::failed("store unavailable")
            }
            Sink::Store(Some(store)) => match save_to_store(store, url, content, now).await {
                Ok(collection_name) => {
                    debug!(collection = %collection_name, "capture stored");
                    SaveResponse::stored(collection_name)
                }
                Err(e) => {
                    warn!(error = %e, "ingestion failed");
                    SaveResponse::failed(e.to_string())
                }
            },
            Sink::Filesystem(sink) => match sink.write_capture(url, content) {
                Ok(filename) => SaveResponse::written(filename),
                Err(e) => {
                    warn!(error = %e, "filesystem write failed");
                    SaveResponse::failed(e.to_string())
                }
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Store path
// ---------------------------------------------------------------------------

/// Classify and persist one capture into the document store. Returns the
/// collection name the capture landed in.
async fn save_to_store<S: DocumentStore>(
    store: &S,
    url: &str,
    content: &str,
    now: DateTime<Utc>,
) -> Result<String> {
    let collection_name = classify(url);
    let domain = split_url(url).domain;
    let created_at = now.timestamp();

    let collection_metadata = CollectionMetadata::new(domain, &collection_name, created_at);
    let document_metadata = DocumentMetadata::new(url, created_at, content);

    // Get-or-create by exact, case-sensitive name.
    let names = store.list_collections().await?;
    let collection = if names.iter().any(|n| n == &collection_name) {
        store.get_collection(&collection_name).await?
    } else {
        debug!(collection = %collection_name, "creating collection");
        store
            .create_collection(&collection_name, &collection_metadata)
            .await?
    };

    let bucket = created_at.div_euclid(DEDUP_WINDOW_SECS);
    let document_id = format!("{url}_{bucket}");
    let ids = vec![document_id];
    let documents = vec![content.to_string()];
    let metadatas = vec![document_metadata];

    // A failed lookup means "absent", never an ingestion failure.
    let exists = match store.get_documents(&collection, &ids).await {
        Ok(lookup) => !lookup.ids.is_empty(),
        Err(e) => {
            debug!(error = %e, "document lookup failed, treating as absent");
            false
        }
    };

    if exists {
        store
            .update_documents(&collection, &ids, &documents, &metadatas)
            .await?;
    } else {
        store
            .add_documents(&collection, &ids, &documents, &metadatas)
            .await?;
    }

    touch_collection(store, &collection_name, now).await;

    Ok(collection_name)
}

/// Refresh the collection's `updated_at` recency metadata, preserving its
/// other keys. Best-effort: a failure here is logged and never downgrades
/// the ingestion that triggered it.
async fn touch_collection<S: DocumentStore>(store: &S, collection_name: &str, now: DateTime<Utc>) {
    let result = async {
        let collection = store.get_collection(collection_name).await?;
        let mut metadata = collection.metadata.clone().unwrap_or_default();
        metadata.insert("updated_at".to_string(), serde_json::json!(now.timestamp()));
        store.modify_collection(&collection, metadata).await
    }
    .await;

    if let Err(e) = result {
        warn!(collection = collection_name, error = %e, "failed to refresh recency metadata");
    }
}
