//! Request dispatch: one decoded frame in, one response payload out.
//!
//! [`handle`] never fails. Every failure layer has its own response shape,
//! so a bad request can never take down the loop; only the transport
//! (framing fatals, stdout gone) terminates the process.

use tracing::{debug, warn};

use webstash_protocol::validate_request;
use webstash_shared::ResponsePayload;
use webstash_storage::DocumentStore;

use crate::ingest::IngestEngine;

/// Decode, validate, and ingest one request payload.
pub async fn handle<S: DocumentStore>(engine: &IngestEngine<S>, raw: &[u8]) -> ResponsePayload {
    let value: serde_json::Value = match serde_json::from_slice(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, bytes = raw.len(), "frame payload is not valid JSON");
            return ResponsePayload::Protocol {
                error: "invalid message".to_string(),
            };
        }
    };

    let request = match validate_request(&value) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "request failed validation");
            return ResponsePayload::Validation {
                message: format!("Validation error: {e}"),
            };
        }
    };

    // kind is validated but not routed on; all kinds share the sink.
    debug!(
        url = %request.url,
        kind = %request.kind,
        bytes = request.content.len(),
        "capture received"
    );

    ResponsePayload::Save(engine.ingest(&request.url, &request.content).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use webstash_shared::SaveResponse;
    use webstash_storage::memory::MemoryStore;

    use crate::ingest::Sink;

    fn engine_with_store() -> (MemoryStore, IngestEngine<MemoryStore>) {
        let store = MemoryStore::new();
        let engine = IngestEngine::new(Sink::Store(Some(store.clone())));
        (store, engine)
    }

    fn request_bytes(url: &str, kind: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "action": "sendNativeMarkdown",
            "url": url,
            "kind": kind,
            "content": "# captured",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn valid_request_returns_save_response() {
        let (store, engine) = engine_with_store();
        let response = handle(&engine, &request_bytes("https://github.com/user/repo", "content"))
            .await;

        assert_eq!(
            response,
            ResponsePayload::Save(SaveResponse::stored("github_repositories"))
        );
        assert_eq!(store.document_count("github_repositories"), 1);
    }

    #[tokio::test]
    async fn kind_does_not_route() {
        let (store, engine) = engine_with_store();
        for kind in ["profile", "search", "content"] {
            let response =
                handle(&engine, &request_bytes("https://example.com/page", kind)).await;
            assert_eq!(
                response,
                ResponsePayload::Save(SaveResponse::stored("example_pages")),
                "kind {kind}"
            );
        }
        // Same URL, same minute window: the three ingests collapse.
        assert!(store.document_count("example_pages") >= 1);
    }

    #[tokio::test]
    async fn invalid_json_yields_protocol_error() {
        let (_, engine) = engine_with_store();
        let response = handle(&engine, b"not json {").await;
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"error": "invalid message"})
        );
    }

    #[tokio::test]
    async fn validation_failure_yields_message_payload() {
        let (_, engine) = engine_with_store();
        let raw = serde_json::to_vec(&json!({
            "action": "sendNativeMarkdown",
            "url": "https://example.com",
        }))
        .unwrap();

        let response = handle(&engine, &raw).await;
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"message": "Validation error: Missing required fields: kind, content"})
        );
    }

    #[tokio::test]
    async fn degraded_engine_reports_unavailable_store() {
        let engine: IngestEngine<MemoryStore> = IngestEngine::new(Sink::Store(None));
        let response = handle(&engine, &request_bytes("https://example.com", "content")).await;
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"saved": false, "error": "store unavailable"})
        );
    }
}
