//! Wire and domain types shared across the Webstash crates.
//!
//! These mirror the message contract with the browser extension: one
//! [`CaptureRequest`] in, one [`ResponsePayload`] out, per frame.

use serde::{Deserialize, Serialize};

/// The only action the bridge accepts; anything else fails validation.
pub const CAPTURE_ACTION: &str = "sendNativeMarkdown";

// ---------------------------------------------------------------------------
// CaptureKind
// ---------------------------------------------------------------------------

/// What the extension says it captured.
///
/// Validated on every request but not routed on: all kinds ingest through
/// the same sink. Kept in the schema so the extension contract stays stable
/// if per-kind routing ever becomes real.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureKind {
    Profile,
    Search,
    Content,
}

impl CaptureKind {
    /// All accepted kinds, in the order they are reported in validation errors.
    pub const ALL: [CaptureKind; 3] = [
        CaptureKind::Profile,
        CaptureKind::Search,
        CaptureKind::Content,
    ];

    /// The lowercase wire token for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureKind::Profile => "profile",
            CaptureKind::Search => "search",
            CaptureKind::Content => "content",
        }
    }

    /// Parse a wire token. Returns `None` for anything outside the enum.
    pub fn parse(s: &str) -> Option<CaptureKind> {
        CaptureKind::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl std::fmt::Display for CaptureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CaptureRequest
// ---------------------------------------------------------------------------

/// A validated capture event from the extension.
///
/// Constructed only by the protocol validator; transient per frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// Source page URL as the extension saw it.
    pub url: String,
    /// Declared capture kind.
    pub kind: CaptureKind,
    /// Captured page text (markdown from the extension's extractor).
    pub content: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Outcome of one ingestion, serialized back to the extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    /// Whether the content was persisted.
    pub saved: bool,
    /// Collection the content landed in (document-store sink).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    /// Relative file path the content landed at (filesystem sink).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Failure reason when `saved` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveResponse {
    /// Successful document-store ingestion.
    pub fn stored(collection_name: impl Into<String>) -> Self {
        Self {
            saved: true,
            collection_name: Some(collection_name.into()),
            filename: None,
            error: None,
        }
    }

    /// Successful filesystem write.
    pub fn written(filename: impl Into<String>) -> Self {
        Self {
            saved: true,
            collection_name: None,
            filename: Some(filename.into()),
            error: None,
        }
    }

    /// Failed ingestion with a reason.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            saved: false,
            collection_name: None,
            filename: None,
            error: Some(error.into()),
        }
    }
}

/// Everything the dispatcher can write back, one variant per failure layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    /// Ingestion ran (successfully or not).
    Save(SaveResponse),
    /// The frame decoded but failed schema validation.
    Validation { message: String },
    /// The frame was not valid JSON at all.
    Protocol { error: String },
}
