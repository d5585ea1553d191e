use api_state::ApiState;
use axum::{extract::FromRef, routing::get, Router};
use routes::{liveness::live, readiness::ready, search::search};

pub mod api_state;
pub mod error;
mod routes;

/// Router for the search API.
pub fn api_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    // Probes for systemd/k8s
    let probes = Router::new()
        .route("/ready", get(ready))
        .route("/live", get(live));

    Router::new().route("/search", get(search)).merge(probes)
}
