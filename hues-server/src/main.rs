use std::sync::Arc;
use tokio::signal;
use tracing::info;

use hues_persistence::{SnapshotRepository, connection::connect_and_migrate};
use hues_server::{
    config::Config,
    create_routes,
    session::GameSession,
    submission::SubmissionClient,
    words::{load_word_pool, supply_from_config},
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Hues & Cues server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize database connection and run migrations
    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };
    let store = Arc::new(SnapshotRepository::new(db));

    match store.last_saved_at(&config.session_key).await {
        Ok(Some(saved_at)) => info!(
            "Found saved game for session '{}' from {}",
            config.session_key, saved_at
        ),
        Ok(None) => {}
        Err(e) => tracing::warn!("Could not check for a saved game: {:#}", e),
    }

    let session = Arc::new(GameSession::open(store, &config.session_key, config.game_rules()).await);

    // Refresh the word pool; a restored word in play is kept
    let supply = supply_from_config(&config);
    let pool = load_word_pool(supply.as_ref()).await;
    let (drew_word, state) = session
        .update(|game| game.refresh_words(pool.into_words()))
        .await;
    if drew_word {
        info!("Drew word '{}' for round {}", state.current_word, state.current_round);
    }

    let submissions = config.submission_url.clone().map(|url| {
        info!("Single-player submissions enabled, posting to {}", url);
        SubmissionClient::new(url)
    });

    let routes = create_routes(session.clone(), submissions);

    info!("Server starting on {}:{}", config.host, config.port);

    let ip = match config.host.parse::<std::net::IpAddr>() {
        Ok(ip) => ip,
        Err(e) => {
            tracing::error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown((ip, config.port), async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let (Ok(mut sigint), Ok(mut sigterm)) = (
                signal::unix::signal(signal::unix::SignalKind::interrupt()),
                signal::unix::signal(signal::unix::SignalKind::terminate()),
            ) else {
                tracing::error!("Failed to install signal handlers");
                return std::future::pending::<()>().await;
            };

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl+c: {}", e);
                return std::future::pending::<()>().await;
            }
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;

    let state = session.snapshot().await;
    info!(
        "Server shutdown complete. Session '{}' left in {:?} phase, round {}.",
        session.key(),
        state.game_phase,
        state.current_round
    );
}
