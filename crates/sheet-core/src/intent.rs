//! # Payment Intents and Webhook Events
//!
//! Provider-neutral views of the processor's payment intent object and of
//! the webhook events it emits about that object.

use crate::money::{Currency, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a payment intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    /// Status string this build does not know about
    #[serde(other)]
    Unknown,
}

impl PaymentIntentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentIntentStatus::RequiresPaymentMethod => "requires_payment_method",
            PaymentIntentStatus::RequiresConfirmation => "requires_confirmation",
            PaymentIntentStatus::RequiresAction => "requires_action",
            PaymentIntentStatus::Processing => "processing",
            PaymentIntentStatus::RequiresCapture => "requires_capture",
            PaymentIntentStatus::Canceled => "canceled",
            PaymentIntentStatus::Succeeded => "succeeded",
            PaymentIntentStatus::Unknown => "unknown",
        }
    }

    /// No further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PaymentIntentStatus::Canceled | PaymentIntentStatus::Succeeded
        )
    }
}

impl std::fmt::Display for PaymentIntentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payment intent as reported by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider's intent ID (pi_...)
    pub id: String,

    /// Amount in smallest currency unit
    pub amount: i64,

    /// Three-letter currency code as the provider reports it (lowercase).
    /// Intents created elsewhere may use currencies `Currency` does not list.
    pub currency: String,

    /// Current lifecycle status
    pub status: PaymentIntentStatus,

    /// Secret handed to the client SDK to confirm the intent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Customer the intent is attached to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
}

impl PaymentIntent {
    /// Amount and currency, when the currency is one this crate supports
    pub fn price(&self) -> Option<Price> {
        let currency = self.currency.parse::<Currency>().ok()?;
        Some(Price::from_cents(self.amount, currency))
    }
}

/// Webhook event types we care about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventType {
    /// payment_intent.succeeded
    PaymentSucceeded,
    /// payment_intent.payment_failed
    PaymentFailed,
    /// payment_intent.canceled
    PaymentCanceled,
    /// payment_intent.processing
    PaymentProcessing,
    /// Unknown event (passthrough)
    Unknown(String),
}

impl WebhookEventType {
    /// Map the provider's event type string
    pub fn from_type_str(event_type: &str) -> Self {
        match event_type {
            "payment_intent.succeeded" => WebhookEventType::PaymentSucceeded,
            "payment_intent.payment_failed" => WebhookEventType::PaymentFailed,
            "payment_intent.canceled" => WebhookEventType::PaymentCanceled,
            "payment_intent.processing" => WebhookEventType::PaymentProcessing,
            other => WebhookEventType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            WebhookEventType::PaymentSucceeded => "payment_intent.succeeded",
            WebhookEventType::PaymentFailed => "payment_intent.payment_failed",
            WebhookEventType::PaymentCanceled => "payment_intent.canceled",
            WebhookEventType::PaymentProcessing => "payment_intent.processing",
            WebhookEventType::Unknown(other) => other,
        }
    }
}

/// A verified webhook event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event ID from provider
    pub event_id: String,

    /// Event type
    pub event_type: WebhookEventType,

    /// Provider name
    pub provider: String,

    /// Related payment intent ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,

    /// Amount (in smallest unit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,

    /// Currency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,

    /// Message of the last payment error, for failed payments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,

    /// Raw event object (for debugging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<serde_json::Value>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}
