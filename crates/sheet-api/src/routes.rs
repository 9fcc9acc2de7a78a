//! # Routes
//!
//! Axum router configuration for the payment-sheet API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
///   - GET  /, /health - Health check
///   - GET  /config - Publishable key
///   - POST /payment-sheet - Customer + ephemeral key + payment intent
///   - GET  /payment-status/{payment_intent_id} - Intent status
///   - POST /webhook - Provider webhook (raw body, signature checked)
pub fn create_router(state: AppState) -> Router {
    // Mobile clients call from arbitrary origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::health))
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::client_config))
        .route("/payment-sheet", post(handlers::create_sheet))
        .route(
            "/payment-status/{payment_intent_id}",
            get(handlers::payment_status),
        )
        .route("/webhook", post(handlers::webhook))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
