//! Command-line arguments for the `parley` binary.
//!
//! Uses clap derive macros. Flags override the matching keys of the TOML
//! configuration file.

use std::path::PathBuf;

use clap::Parser;
use parley_types::config::GatewayConfig;

/// Conversational gateway speaking WebSocket.
#[derive(Debug, Parser)]
#[command(name = "parley", version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: ~/.parley/config.toml).
    #[arg(long = "conf", env = "PARLEY_CONFIG")]
    pub conf: Option<PathBuf>,

    /// Port to listen on (overrides `websocket_port`).
    #[arg(long)]
    pub port: Option<u16>,

    /// Address to bind (overrides `host`).
    #[arg(long)]
    pub host: Option<String>,

    /// Rebind even if the address is still held by a previous process.
    #[arg(long)]
    pub force_bind: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long)]
    pub otel: bool,

    /// Suppress all output except errors.
    #[arg(long)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Apply flag overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut GatewayConfig) {
        if let Some(port) = self.port {
            config.websocket_port = port;
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
    }
}
