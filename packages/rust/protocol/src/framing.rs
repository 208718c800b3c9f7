//! Native-messaging frame codec.
//!
//! Wire format, both directions: a 4-byte little-endian unsigned length
//! prefix followed by exactly that many bytes of UTF-8 JSON.
//!
//! EOF handling is the protocol's lifecycle signal: a stream that closes
//! between frames means the extension disconnected and the host should exit
//! cleanly, while a stream that closes inside a frame is a hard protocol
//! violation and must kill the process rather than risk a desynced reply.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use webstash_shared::{Result, WebstashError};

/// Upper bound on a declared frame length. A corrupt or hostile prefix must
/// not turn into a multi-gigabyte allocation.
pub const MAX_FRAME_LEN: u32 = 64 * 1024 * 1024;

/// Read one frame.
///
/// Returns `Ok(None)` when the stream closes cleanly before any prefix byte
/// arrives (orderly shutdown). A close inside the prefix or payload is a
/// fatal framing error.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let mut prefix = [0u8; 4];
    let mut filled = 0usize;
    while filled < prefix.len() {
        let n = reader
            .read(&mut prefix[filled..])
            .await
            .map_err(|e| WebstashError::transport(format!("failed reading length prefix: {e}")))?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(WebstashError::transport(format!(
                "stream closed inside length prefix ({filled} of 4 bytes)"
            )));
        }
        filled += n;
    }

    let len = u32::from_le_bytes(prefix);
    if len > MAX_FRAME_LEN {
        return Err(WebstashError::transport(format!(
            "declared frame length {len} exceeds {MAX_FRAME_LEN}"
        )));
    }

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload).await.map_err(|e| {
        WebstashError::transport(format!("stream closed inside {len}-byte payload: {e}"))
    })?;

    trace!(bytes = len, "frame read");
    Ok(Some(payload))
}

/// Write one frame: prefix then payload as a single logical unit, flushed.
pub async fn write_frame<W: AsyncWrite + Unpin>(writer: &mut W, payload: &[u8]) -> Result<()> {
    let len = u32::try_from(payload.len())
        .ok()
        .filter(|len| *len <= MAX_FRAME_LEN)
        .ok_or_else(|| {
            WebstashError::transport(format!("payload of {} bytes exceeds frame limit", payload.len()))
        })?;

    writer
        .write_all(&len.to_le_bytes())
        .await
        .map_err(|e| WebstashError::transport(format!("failed writing length prefix: {e}")))?;
    writer
        .write_all(payload)
        .await
        .map_err(|e| WebstashError::transport(format!("failed writing payload: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| WebstashError::transport(format!("failed flushing frame: {e}")))?;

    trace!(bytes = len, "frame written");
    Ok(())
}
