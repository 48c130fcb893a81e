//! PakGuider CLI and web server entry point.
//!
//! Binary name: `pakguider`
//!
//! Parses CLI arguments, loads layered configuration, wires the providers,
//! then dispatches to the chat loop, a one-shot answer, the connectivity
//! check or the web server.

mod cli;
mod http;
mod state;

use std::time::Duration;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use pakguider_infra::config::load_config;
use pakguider_observe::{filter_for_verbosity, init_tracing, shutdown_tracing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "pakguider", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(filter_for_verbosity(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = load_config(cli.config.as_deref()).await;
    config.settings.fail_fast |= cli.fail_fast;

    match cli.command {
        Commands::Check => cli::check::check(&config, cli.json).await,

        Commands::Ask { question } => {
            let state = AppState::init(config);
            cli::ask::ask(&state, &question, cli.json).await
        }

        Commands::Chat => {
            let state = AppState::init(config);
            cli::chat::loop_runner::run_chat_loop(&state).await
        }

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| config.settings.server.host.clone());
            let port = port.unwrap_or(config.settings.server.port);

            let session_idle = Duration::from_secs(config.settings.server.session_idle_secs);
            let state = AppState::init(config);
            state.verify_providers().await?;
            let sweeper = state.sessions.spawn_idle_sweeper(session_idle);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} PakGuider listening on {}",
                console::style("🌏").bold(),
                console::style(format!("http://{addr}")).green()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            sweeper.abort();
            println!("\n  Server stopped.");
            Ok(())
        }

        Commands::Completions { .. } => Ok(()),
    }
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
