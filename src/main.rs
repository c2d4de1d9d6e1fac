//! FFA Arena - simulated host session
//!
//! Runs a last-actor-standing match against an in-memory host:
//! - seeds arena spawns for the configured map and hands out lobby slots
//! - kills a seeded-random survivor every tick until one actor remains
//! - prints the final standings as JSON

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ffa_arena::host::sim::{self, SimulatedHost};
use ffa_arena::{ArenaSession, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting FFA Arena session");
    info!(
        lives = config.initial_lives,
        map_size = ?config.map_size,
        lobby = config.lobby_size,
        seed = config.seed,
        "Configuration loaded"
    );

    let host = SimulatedHost::with_lobby(config.lobby_size);
    let mut session = ArenaSession::new(&config);

    let slots = session.start_match(&host, config.map_size, config.lobby_size);
    for (i, slot) in slots.iter().enumerate() {
        match slot {
            Some(slot) => info!(slot = i, position = %slot.position, "Spawn assigned"),
            None => warn!(slot = i, "No spawn available"),
        }
    }

    tokio::select! {
        standings = sim::run(&mut session, &host, &config) => {
            println!("{}", serde_json::to_string_pretty(&standings)?);
        }
        _ = shutdown_signal() => {
            warn!("Session interrupted before the match ended");
        }
    }

    session.teardown(&host);
    info!("Session shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping session");
        }
        _ = terminate => {
            info!("Received terminate signal, stopping session");
        }
    }
}
