//! # Stripe Provider
//!
//! `PaymentProvider` implementation backed by Stripe's REST API.

use crate::client::StripeClient;
use crate::config::StripeConfig;
use crate::signature::verify_signature;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sheet_core::{
    Currency, Customer, EphemeralKey, NewPaymentIntent, PaymentError, PaymentIntent,
    PaymentIntentStatus, PaymentProvider, PaymentResult, WebhookEvent, WebhookEventType,
};
use tracing::{debug, info, instrument};

/// Stripe-backed payment provider
pub struct StripeProvider {
    client: StripeClient,
}

impl StripeProvider {
    /// Create a new Stripe provider
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        Ok(Self {
            client: StripeClient::new(config)?,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    pub fn config(&self) -> &StripeConfig {
        self.client.config()
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    #[instrument(skip(self))]
    async fn create_customer(&self) -> PaymentResult<Customer> {
        let customer: StripeCustomer = self.client.post_form("/v1/customers", &[]).await?;
        debug!("Created Stripe customer: {}", customer.id);
        Ok(Customer { id: customer.id })
    }

    #[instrument(skip(self))]
    async fn create_ephemeral_key(&self, customer_id: &str) -> PaymentResult<EphemeralKey> {
        let key: StripeEphemeralKey = self
            .client
            .post_form("/v1/ephemeral_keys", &[("customer", customer_id.to_string())])
            .await?;

        Ok(EphemeralKey {
            id: key.id,
            secret: key.secret,
            expires: key.expires,
        })
    }

    #[instrument(skip(self, intent), fields(customer = %intent.customer_id, amount = intent.price.amount))]
    async fn create_payment_intent(
        &self,
        intent: &NewPaymentIntent,
    ) -> PaymentResult<PaymentIntent> {
        let form_params = vec![
            ("amount", intent.price.amount.to_string()),
            ("currency", intent.price.currency.as_str().to_string()),
            ("customer", intent.customer_id.clone()),
            (
                "automatic_payment_methods[enabled]",
                intent.automatic_payment_methods.to_string(),
            ),
        ];

        let created: StripePaymentIntent = self
            .client
            .post_form("/v1/payment_intents", &form_params)
            .await?;

        info!(
            "Created Stripe payment intent: id={}, status={}",
            created.id, created.status
        );

        Ok(created.into_intent())
    }

    #[instrument(skip(self))]
    async fn retrieve_payment_intent(&self, id: &str) -> PaymentResult<PaymentIntent> {
        validate_object_id(id)?;
        let intent: StripePaymentIntent = self
            .client
            .get(&format!("/v1/payment_intents/{}", id))
            .await?;
        Ok(intent.into_intent())
    }

    #[instrument(skip(self, payload, signature))]
    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> PaymentResult<WebhookEvent> {
        let config = self.client.config();
        let secret = config.webhook_secret.as_deref().ok_or_else(|| {
            PaymentError::Configuration("STRIPE_WEBHOOK_SECRET not set".to_string())
        })?;

        verify_signature(
            payload,
            signature,
            secret,
            config.webhook_tolerance_secs,
            Utc::now().timestamp(),
        )?;

        let event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            PaymentError::WebhookParseError(format!("Failed to parse webhook: {}", e))
        })?;

        debug!("Verified Stripe webhook: type={}", event.event_type);

        Ok(event.into_event())
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

/// Stripe object IDs are `prefix_` + alphanumerics; anything else would
/// change the request path.
fn validate_object_id(id: &str) -> PaymentResult<()> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(PaymentError::InvalidRequest(format!(
            "Invalid payment intent id: {:?}",
            id
        )));
    }
    Ok(())
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCustomer {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StripeEphemeralKey {
    id: String,
    secret: String,
    #[serde(default)]
    expires: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct StripePaymentIntent {
    id: String,
    amount: i64,
    currency: String,
    status: PaymentIntentStatus,
    #[serde(default)]
    client_secret: Option<String>,
    #[serde(default)]
    customer: Option<String>,
}

impl StripePaymentIntent {
    fn into_intent(self) -> PaymentIntent {
        PaymentIntent {
            id: self.id,
            amount: self.amount,
            currency: self.currency,
            status: self.status,
            client_secret: self.client_secret,
            customer: self.customer,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StripeWebhookEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    created: i64,
    data: StripeEventData,
}

#[derive(Debug, Deserialize)]
struct StripeEventData {
    object: serde_json::Map<String, serde_json::Value>,
}

impl StripeWebhookEvent {
    fn into_event(self) -> WebhookEvent {
        let object = &self.data.object;
        let str_field = |key: &str| object.get(key).and_then(|v| v.as_str()).map(String::from);

        // payment_intent.* events carry the intent itself; charges and
        // others reference it.
        let payment_intent_id = if str_field("object").as_deref() == Some("payment_intent") {
            str_field("id")
        } else {
            str_field("payment_intent")
        };

        let amount = object.get("amount").and_then(|v| v.as_i64());

        let currency = str_field("currency").and_then(|c| c.parse::<Currency>().ok());

        let failure_message = object
            .get("last_payment_error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .map(String::from);

        WebhookEvent {
            event_type: WebhookEventType::from_type_str(&self.event_type),
            event_id: self.id,
            provider: "stripe".to_string(),
            payment_intent_id,
            amount,
            currency,
            failure_message,
            timestamp: DateTime::from_timestamp(self.created, 0).unwrap_or_else(Utc::now),
            raw_data: Some(serde_json::Value::Object(self.data.object)),
        }
    }
}
