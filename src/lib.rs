//! JSON proxy in front of SoundCloud's undocumented `api-v2`.
//!
//! Every route needs a `client_id`. It is scraped from the site's script
//! bundles, kept in a [`credentials::store::CredentialStore`] and reused for
//! ten hours. Upstream payloads are cut down to small public shapes in
//! [`models`] before they go back to the browser.

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod models;
pub mod playlist;
pub mod response;
pub mod routes;
pub mod search;
pub mod soundcloud;
pub mod state;
pub mod stream;
pub mod tracks;
pub mod users;

use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(routes::dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(state: Arc<AppState>) -> std::io::Result<()> {
    let address = state.config.bind_addr.clone();
    let app = build_router(state);

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
