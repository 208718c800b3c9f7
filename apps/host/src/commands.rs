//! CLI definitions, routing, and tracing setup.
//!
//! With no subcommand the process runs the bridge loop; `config init` and
//! `config show` exist so the host can be set up and inspected from a
//! normal terminal.

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::info;

use webstash_shared::{init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Webstash: save what you browse into searchable collections.
#[derive(Parser)]
#[command(
    name = "webstash-host",
    version,
    about = "Native-messaging bridge that files captured web content into a document store.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json. Logs always go to stderr;
    /// stdout belongs to the messaging protocol.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Extension origin, passed by the browser when it launches the host.
    #[arg(value_name = "ORIGIN")]
    pub origin: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// The subscriber writes to stderr: stdout carries the wire protocol and a
/// single stray log line there would desync the extension.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command, or the bridge loop when none is given.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
        None => {
            let config = load_config()?;
            bridge_origin_log(cli.origin.as_deref());
            crate::bridge::run(&config).await
        }
    }
}

fn bridge_origin_log(origin: Option<&str>) {
    if let Some(origin) = origin {
        info!(origin, "launched by extension");
    }
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config written to {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let rendered = toml::to_string_pretty(&config)?;
    print!("{rendered}");
    Ok(())
}
