//! Webstash native-messaging host.
//!
//! Launched by the browser when the extension opens a native messaging
//! port. Reads capture requests from stdin, writes responses to stdout,
//! and exits when the extension disconnects.

mod bridge;
mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
