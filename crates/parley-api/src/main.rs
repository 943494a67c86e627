//! Parley gateway entry point.
//!
//! Binary name: `parley`
//!
//! Loads configuration, builds the interface registry and conversation store,
//! then serves WebSocket clients until Ctrl+C or SIGTERM.

use clap::Parser;
use parley_api::cli::Cli;
use parley_api::server;
use parley_api::state::GatewayState;
use parley_infra::config::{default_config_path, load_config};
use parley_observe::attrs::filter_for;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    parley_observe::init_tracing(filter_for(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let config_path = cli.conf.clone().unwrap_or_else(default_config_path);
    let mut config = load_config(&config_path).await;
    cli.apply(&mut config);

    // Alias collisions surface here, before anything is bound
    let state = GatewayState::init(&config).await?;

    let listener = server::bind(&config.host, config.websocket_port, cli.force_bind).await?;
    let addr = listener.local_addr()?;

    if !cli.quiet {
        println!();
        println!(
            "  {} {} listening on {}",
            console::style("⚡").bold(),
            console::style(&config.author).bold(),
            console::style(format!("ws://{addr}")).cyan()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }

    let shutdown = CancellationToken::new();
    let server = tokio::spawn(server::serve(listener, state, shutdown.clone()));

    shutdown_signal().await;
    shutdown.cancel();
    server.await?;

    if !cli.quiet {
        println!("\n  Server stopped.");
    }
    parley_observe::shutdown_tracing();
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
