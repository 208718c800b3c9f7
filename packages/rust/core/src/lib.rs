//! Webstash core: the ingestion engine and the request dispatcher.
//!
//! The flow per frame is
//!
//! ```text
//! raw bytes ──▶ handler::handle ──▶ validate ──▶ IngestEngine::ingest
//!                    │                               │
//!                    ◀── ResponsePayload ◀───────────┘
//! ```
//!
//! The host binary owns the transport loop; this crate owns everything
//! between a decoded frame and its response payload.

pub mod handler;
pub mod ingest;

pub use handler::handle;
pub use ingest::{IngestEngine, Sink};
