use scproxy_web::config::Config;
use scproxy_web::state::AppState;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("scproxy_web=info,tower_http=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let app_state = match AppState::new(config).await {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Failed to initialize app state: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = scproxy_web::start_server(app_state).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
