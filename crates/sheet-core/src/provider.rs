//! # Payment Provider Trait
//!
//! The seam between the HTTP layer and a hosted payment processor.
//! The processor owns all state; implementations only forward calls.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  PaymentProvider (trait)                    │
//! │  ├── create_customer()                                      │
//! │  ├── create_ephemeral_key()                                 │
//! │  ├── create_payment_intent()                                │
//! │  ├── retrieve_payment_intent()                              │
//! │  └── verify_webhook()                                       │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴───────┐
//!                    │StripeProvider │
//!                    └───────────────┘
//! ```

use crate::error::PaymentResult;
use crate::intent::{PaymentIntent, WebhookEvent};
use crate::money::Price;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A customer record created at the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
}

/// Short-lived credential scoped to one customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EphemeralKey {
    pub id: String,
    /// Secret the client SDK uses (ek_...)
    pub secret: String,
    /// Unix timestamp after which the key is unusable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
}

/// Parameters for a new payment intent
#[derive(Debug, Clone)]
pub struct NewPaymentIntent {
    pub price: Price,
    pub customer_id: String,
    /// Let the provider pick payment methods from dashboard settings
    pub automatic_payment_methods: bool,
}

impl NewPaymentIntent {
    pub fn for_customer(price: Price, customer_id: impl Into<String>) -> Self {
        Self {
            price,
            customer_id: customer_id.into(),
            automatic_payment_methods: true,
        }
    }
}

/// Core trait for hosted payment processors.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create an empty customer record.
    async fn create_customer(&self) -> PaymentResult<Customer>;

    /// Mint an ephemeral key for the given customer.
    async fn create_ephemeral_key(&self, customer_id: &str) -> PaymentResult<EphemeralKey>;

    /// Create a payment intent.
    async fn create_payment_intent(&self, intent: &NewPaymentIntent)
        -> PaymentResult<PaymentIntent>;

    /// Fetch a payment intent by ID.
    async fn retrieve_payment_intent(&self, id: &str) -> PaymentResult<PaymentIntent>;

    /// Verify a webhook signature and parse the event.
    ///
    /// # Arguments
    /// * `payload` - Raw webhook body bytes
    /// * `signature` - Signature header from the request
    async fn verify_webhook(&self, payload: &[u8], signature: &str)
        -> PaymentResult<WebhookEvent>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment provider (dynamic dispatch)
pub type BoxedPaymentProvider = Arc<dyn PaymentProvider>;
