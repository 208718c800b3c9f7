//! Shared types, error model, and configuration for Webstash.
//!
//! This crate is the foundation depended on by all other Webstash crates.
//! It provides:
//! - [`WebstashError`], the unified error type
//! - Wire types ([`CaptureRequest`], [`SaveResponse`], [`ResponsePayload`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, FilesystemConfig, SinkBackend, SinkConfig, StoreConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{Result, WebstashError};
pub use types::{CAPTURE_ACTION, CaptureKind, CaptureRequest, ResponsePayload, SaveResponse};
