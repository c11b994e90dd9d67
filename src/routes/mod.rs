pub mod health;
pub mod proxy;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::proxy::Forwarder;

/// Target used by the `/test` endpoint.
pub const SELF_TEST_URL: &str = "https://jsonplaceholder.typicode.com/posts/1";

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<Forwarder>,
    pub self_test_url: String,
}

impl AppState {
    pub fn new(forwarder: Forwarder) -> Self {
        Self {
            forwarder: Arc::new(forwarder),
            self_test_url: SELF_TEST_URL.to_string(),
        }
    }
}

/// Builds the application router with permissive CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/proxy", get(proxy::proxy_request))
        .route("/test", get(proxy::self_test))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
