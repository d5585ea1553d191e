use std::path::Path;

use api_router::{api_routes, api_state::ApiState};
use axum::Router;
use common::utils::config::{get_config, AppConfig};
use tower_http::{compression::CompressionLayer, services::ServeDir};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    // Get config
    let config = get_config()?;

    // The service must not start without a corpus, so load errors end here.
    let api_state = ApiState::new(&config).await?;

    let app = build_app(api_state, &config);

    info!("Starting server listening on 0.0.0.0:{}", config.http_port);
    let serve_address = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(serve_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Search routes plus the frontend's static files for everything else.
fn build_app(api_state: ApiState, config: &AppConfig) -> Router {
    let router = api_routes().with_state(api_state);

    let router = match config.static_dir.as_deref() {
        Some(dir) if Path::new(dir).is_dir() => {
            info!(static_dir = dir, "Serving static files");
            router.fallback_service(ServeDir::new(dir))
        }
        Some(dir) => {
            warn!(static_dir = dir, "Static directory not found, skipping");
            router
        }
        None => router,
    };

    router.layer(CompressionLayer::new())
}
