//! The serialized request/response bridge loop.
//!
//! One frame in, handled to completion, one frame out; no two requests are
//! ever in flight at once. Clean stdin EOF means the extension closed the
//! port and the host exits quietly. A truncated frame or a failed stdout
//! write terminates the process instead of risking a desynced stream.

use tracing::{error, info, warn};

use color_eyre::eyre::Result;

use webstash_core::{IngestEngine, Sink};
use webstash_protocol::{read_frame, write_frame};
use webstash_shared::{AppConfig, SinkBackend};
use webstash_storage::chroma::ChromaStore;
use webstash_storage::filesystem::FileSink;

/// Response used when a reply fails to serialize; kept as a byte literal so
/// this path cannot itself fail.
const INTERNAL_ERROR_RESPONSE: &[u8] =
    br#"{"saved":false,"error":"internal error processing message"}"#;

/// Run the bridge loop until the extension disconnects.
pub(crate) async fn run(config: &AppConfig) -> Result<()> {
    let engine = build_engine(config).await?;

    let mut stdin = tokio::io::stdin();
    let mut stdout = tokio::io::stdout();

    info!("bridge ready");

    loop {
        let payload = match read_frame(&mut stdin).await? {
            Some(payload) => payload,
            None => {
                info!("extension disconnected, exiting");
                return Ok(());
            }
        };

        let response = webstash_core::handle(&engine, &payload).await;
        let bytes = match serde_json::to_vec(&response) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, "failed to serialize response");
                INTERNAL_ERROR_RESPONSE.to_vec()
            }
        };

        write_frame(&mut stdout, &bytes).await?;
    }
}

/// Build the ingestion engine from config.
///
/// An unreachable document store is not fatal at startup: the engine comes
/// up degraded and every ingestion reports the store as unavailable until
/// the host is restarted.
async fn build_engine(config: &AppConfig) -> Result<IngestEngine<ChromaStore>> {
    match config.sink.backend {
        SinkBackend::Filesystem => {
            let root = config.filesystem.resolved_root()?;
            info!(root = %root.display(), "using filesystem sink");
            Ok(IngestEngine::new(Sink::Filesystem(FileSink::new(root))))
        }
        SinkBackend::Chroma => match ChromaStore::connect(&config.store).await {
            Ok(store) => {
                info!(url = %config.store.url, "using document-store sink");
                Ok(IngestEngine::new(Sink::Store(Some(store))))
            }
            Err(e) => {
                warn!(
                    error = %e,
                    url = %config.store.url,
                    "document store unreachable, running degraded"
                );
                Ok(IngestEngine::new(Sink::Store(None)))
            }
        },
    }
}
