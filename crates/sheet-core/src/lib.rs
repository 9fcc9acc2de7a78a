//! # sheet-core
//!
//! Core types and traits for the payment-sheet backend.
//!
//! This crate provides:
//! - `PaymentProvider` trait for hosted payment processors
//! - `PaymentSheetRequest` / `PaymentSheetParams` and the `create_payment_sheet` sequence
//! - `PaymentIntent`, `PaymentIntentStatus` and `WebhookEvent`
//! - `Currency` and `Price`
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use sheet_core::{create_payment_sheet, PaymentSheetRequest, SheetDefaults};
//!
//! let request = PaymentSheetRequest::from_body(body)?;
//! let price = request.resolve(&SheetDefaults::default())?;
//!
//! // customer -> ephemeral key -> payment intent
//! let params = create_payment_sheet(provider.as_ref(), &price).await?;
//!
//! // Hand params.payment_intent / ephemeral_key / customer to the client
//! ```

pub mod error;
pub mod intent;
pub mod money;
pub mod provider;
pub mod sheet;

// Re-exports for convenience
pub use error::{PaymentError, PaymentResult};
pub use intent::{PaymentIntent, PaymentIntentStatus, WebhookEvent, WebhookEventType};
pub use money::{Currency, Price};
pub use provider::{
    BoxedPaymentProvider, Customer, EphemeralKey, NewPaymentIntent, PaymentProvider,
};
pub use sheet::{create_payment_sheet, PaymentSheetParams, PaymentSheetRequest, SheetDefaults};
