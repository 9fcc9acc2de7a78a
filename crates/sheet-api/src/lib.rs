//! # sheet-api
//!
//! HTTP API layer for payment-sheet-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The payment-sheet and payment-status endpoints
//! - Webhook handler for payment events
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/config` | Publishable key |
//! | POST | `/payment-sheet` | Create customer, ephemeral key and payment intent |
//! | GET | `/payment-status/{id}` | Payment intent status |
//! | POST | `/webhook` | Stripe webhook |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
