//! Native-messaging protocol layer for Webstash.
//!
//! Two concerns, nothing else:
//! - [`framing`]: length-prefixed frame reads/writes over any async stream
//! - [`validate`]: schema validation of decoded request payloads
//!
//! Business logic stays out of this crate; the dispatcher in
//! `webstash-core` decides what a valid request means.

pub mod framing;
pub mod validate;

pub use framing::{MAX_FRAME_LEN, read_frame, write_frame};
pub use validate::validate_request;
