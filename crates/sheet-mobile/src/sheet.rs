//! # Payment Sheet Abstraction
//!
//! The prebuilt payment sheet is a native component owned by the payment
//! processor's mobile SDK. It is configured once per payment intent and
//! then presented modally; both steps report errors with a code.

use crate::config::MobileConfig;
use async_trait::async_trait;
use sheet_core::PaymentSheetParams;
use thiserror::Error;

/// Error codes reported by the sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetErrorCode {
    /// The customer dismissed the sheet
    Canceled,
    /// Confirmation failed (declined card, authentication failure, ...)
    Failed,
    Timeout,
    Other(String),
}

impl std::fmt::Display for SheetErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetErrorCode::Canceled => f.write_str("Canceled"),
            SheetErrorCode::Failed => f.write_str("Failed"),
            SheetErrorCode::Timeout => f.write_str("Timeout"),
            SheetErrorCode::Other(code) => f.write_str(code),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct SheetError {
    pub code: SheetErrorCode,
    pub message: String,
}

impl SheetError {
    pub fn new(code: SheetErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_canceled(&self) -> bool {
        self.code == SheetErrorCode::Canceled
    }
}

/// Everything the sheet needs to act for one customer and one intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSetup {
    /// Key the SDK authenticates with
    pub publishable_key: String,
    /// Apple Pay merchant identifier
    pub merchant_identifier: String,
    /// Where redirect-based methods (3DS, bank redirects) return to
    pub return_url: String,
    pub merchant_display_name: String,
    pub customer_id: String,
    pub customer_ephemeral_key_secret: String,
    pub payment_intent_client_secret: String,
    /// Allow methods that settle later (bank debits, vouchers)
    pub allows_delayed_payment_methods: bool,
    pub default_billing_name: Option<String>,
}

impl SheetSetup {
    pub fn from_params(params: &PaymentSheetParams, config: &MobileConfig) -> Self {
        Self {
            publishable_key: config.publishable_key.clone(),
            merchant_identifier: config.merchant_identifier.clone(),
            return_url: config.return_url(),
            merchant_display_name: config.merchant_display_name.clone(),
            customer_id: params.customer.clone(),
            customer_ephemeral_key_secret: params.ephemeral_key.clone(),
            payment_intent_client_secret: params.payment_intent.clone(),
            allows_delayed_payment_methods: true,
            default_billing_name: config.default_billing_name.clone(),
        }
    }
}

/// What the sheet reports after a successful confirmation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentConfirmation {
    /// Human-readable payment method, when the platform exposes it
    pub method: Option<String>,
}

/// Native payment sheet
#[async_trait]
pub trait PaymentSheet: Send + Sync {
    /// Configure the sheet for one payment intent.
    async fn init(&self, setup: SheetSetup) -> Result<(), SheetError>;

    /// Show the sheet and wait for the customer to finish.
    async fn present(&self) -> Result<PaymentConfirmation, SheetError>;
}
