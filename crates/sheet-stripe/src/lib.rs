//! # sheet-stripe
//!
//! Stripe payment provider for payment-sheet-rs.
//!
//! `StripeProvider` forwards the payment-sheet calls to Stripe's REST API:
//!
//! | Call | Stripe endpoint |
//! |------|-----------------|
//! | `create_customer` | `POST /v1/customers` |
//! | `create_ephemeral_key` | `POST /v1/ephemeral_keys` |
//! | `create_payment_intent` | `POST /v1/payment_intents` |
//! | `retrieve_payment_intent` | `GET /v1/payment_intents/{id}` |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sheet_core::{create_payment_sheet, Currency, Price};
//! use sheet_stripe::StripeProvider;
//!
//! let provider = StripeProvider::from_env()?;
//! let params = create_payment_sheet(&provider, &Price::from_cents(2000, Currency::USD)).await?;
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use sheet_stripe::{dispatch_webhook_event, LoggingWebhookHandler};
//!
//! // In your webhook endpoint:
//! let event = provider.verify_webhook(payload, signature).await?;
//! dispatch_webhook_event(&LoggingWebhookHandler, &event)?;
//! ```

pub mod client;
pub mod config;
pub mod provider;
pub mod signature;
pub mod webhook;

// Re-exports
pub use client::StripeClient;
pub use config::StripeConfig;
pub use provider::StripeProvider;
pub use webhook::{
    dispatch_webhook_event, LoggingWebhookHandler, WebhookHandler, HANDLED_WEBHOOK_EVENTS,
};
