use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::auth::require_bearer;
use crate::config::Config;
use crate::main_lib::AppState;

pub mod health;
pub mod ingest;

pub fn app_router(state: Arc<AppState>, _config: &Config) -> Router {
    let protected = ingest::router().route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_bearer,
    ));

    Router::new()
        .nest("/api/v1", health::router().merge(protected))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
