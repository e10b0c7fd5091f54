//! Arena Brawl - headless match driver
//!
//! Runs one match and exposes it over stdio:
//! - JSON-lines input (held intents, restart, quit) on stdin
//! - JSON-lines snapshots and lifecycle messages on stdout
//! - Logs on stderr

use std::io;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arena_brawl::config::Config;
use arena_brawl::feed::protocol::ClientMsg;
use arena_brawl::feed::{spawn_reader, write_messages};
use arena_brawl::game::GameMatch;
use arena_brawl::util::time::{unix_millis, Timer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    let match_config = config.match_config()?;
    info!(
        mode = ?config.battle_mode,
        seed = match_config.seed,
        player1 = match_config.player1.short_name(),
        player2 = match_config.player2.short_name(),
        started_at = unix_millis(),
        "Starting Arena Brawl"
    );

    let (game_match, handle) = GameMatch::new(match_config);

    // Subscribe before the match publishes its start message
    let writer = tokio::spawn(write_messages(
        tokio::io::stdout(),
        handle.subscribe(),
        config.emit_snapshots,
    ));

    // Only the reader thread keeps the input channel open
    let quit_tx = handle.input_tx.downgrade();
    spawn_reader(io::BufReader::new(io::stdin()), handle.input_tx.clone());
    drop(handle);

    let timer = Timer::new();
    let run = game_match.run();
    tokio::pin!(run);

    let (outcome, stats) = tokio::select! {
        result = &mut run => result,
        _ = shutdown_signal() => match quit_tx.upgrade() {
            Some(tx) => {
                let _ = tx.send(ClientMsg::Quit).await;
                drop(tx);
                run.await
            }
            None => {
                info!("Input feed already closed, stopping without a result");
                return Ok(());
            }
        },
    };

    match writer.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Renderer feed failed"),
        Err(e) => warn!(error = %e, "Renderer feed task panicked"),
    }

    info!(
        outcome = %serde_json::to_string(&outcome)?,
        stats = %serde_json::to_string(&stats)?,
        wall_ms = timer.elapsed_ms(),
        "Match finished"
    );

    Ok(())
}

/// Initialize tracing/logging on stderr, keeping stdout for the feed
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(io::stderr),
        )
        .init();
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, abandoning match");
        }
        _ = terminate => {
            info!("Received terminate signal, abandoning match");
        }
    }
}
