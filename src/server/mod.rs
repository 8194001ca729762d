//! REST façade over the AnkiWeb client.
//!
//! | Route                       | Purpose                              |
//! |-----------------------------|--------------------------------------|
//! | `POST /add-card`            | file one card                        |
//! | `POST /add-multiple-cards`  | file cards sequentially with a delay |
//! | `GET /decks`                | list known deck names                |
//! | `GET /health`               | liveness probe                       |

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub mod error;
pub mod routes;

use crate::config::BridgeSettings;
use crate::core::client::AnkiWebClient;
use crate::core::deck::DeckRegistry;
use crate::domain::ports::CardSink;
use crate::utils::error::Result;
use routes::{add_card_handler, add_multiple_cards_handler, decks_handler, health_handler};

#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn CardSink>,
    pub decks: Arc<DeckRegistry>,
    pub default_delay: f64,
}

impl AppState {
    pub fn new(sink: Arc<dyn CardSink>, decks: Arc<DeckRegistry>, default_delay: f64) -> Self {
        Self {
            sink,
            decks,
            default_delay,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/add-card", post(add_card_handler))
        .route("/add-multiple-cards", post(add_multiple_cards_handler))
        .route("/decks", get(decks_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(settings: BridgeSettings) -> Result<()> {
    info!("Initializing state...");
    let decks = Arc::new(settings.deck_registry());
    let client = AnkiWebClient::new(&settings.upstream, Arc::clone(&decks))?;
    info!("Loaded {} decks", decks.len());

    let state = AppState::new(Arc::new(client), decks, settings.default_delay);
    let app = router(state);

    let address = settings.bind_address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("🚀 Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to listen for Ctrl+C: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
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
