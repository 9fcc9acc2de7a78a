//! # Payment Sheet
//!
//! Request parsing and the three-call sequence that produces the secrets a
//! client-side payment sheet needs: customer, ephemeral key, payment intent.

use crate::error::{PaymentError, PaymentResult};
use crate::money::{Currency, Price};
use crate::provider::{NewPaymentIntent, PaymentProvider};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Body of `POST /payment-sheet`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentSheetRequest {
    /// Amount in smallest currency unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    /// ISO currency code, any case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl PaymentSheetRequest {
    /// Parse a raw request body. An empty body means "use the defaults".
    pub fn from_body(body: &[u8]) -> PaymentResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| PaymentError::InvalidRequest(format!("Malformed JSON body: {}", e)))
    }

    /// Fill missing fields from `defaults` and validate the result.
    pub fn resolve(&self, defaults: &SheetDefaults) -> PaymentResult<Price> {
        let amount = self.amount.unwrap_or(defaults.amount);
        if amount <= 0 {
            return Err(PaymentError::InvalidPrice {
                message: format!("amount must be positive, got {}", amount),
            });
        }

        let currency = match self.currency.as_deref() {
            Some(code) => code.parse::<Currency>()?,
            None => defaults.currency,
        };

        Ok(Price::from_cents(amount, currency))
    }
}

/// Values used when the client omits them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetDefaults {
    #[serde(default = "default_amount")]
    pub amount: i64,
    #[serde(default)]
    pub currency: Currency,
}

fn default_amount() -> i64 {
    2000 // $20.00
}

impl Default for SheetDefaults {
    fn default() -> Self {
        Self {
            amount: default_amount(),
            currency: Currency::USD,
        }
    }
}

impl SheetDefaults {
    /// Parse from TOML (`amount = 1099`, `currency = "eur"`)
    pub fn from_toml_str(content: &str) -> PaymentResult<Self> {
        let defaults: SheetDefaults = toml::from_str(content)
            .map_err(|e| PaymentError::Configuration(format!("Invalid sheet defaults: {}", e)))?;
        if defaults.amount <= 0 {
            return Err(PaymentError::Configuration(
                "Default amount must be positive".to_string(),
            ));
        }
        Ok(defaults)
    }
}

/// Secrets returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSheetParams {
    /// Payment intent client secret
    pub payment_intent: String,
    /// Ephemeral key secret
    pub ephemeral_key: String,
    /// Customer ID
    pub customer: String,
}

/// Create customer, ephemeral key and payment intent, in that order.
///
/// Stops at the first failing call. Objects created by earlier calls are
/// left in place at the provider.
#[instrument(skip(provider), fields(provider = provider.provider_name(), amount = price.amount, currency = %price.currency))]
pub async fn create_payment_sheet(
    provider: &dyn PaymentProvider,
    price: &Price,
) -> PaymentResult<PaymentSheetParams> {
    let customer = provider.create_customer().await?;
    debug!("Created customer: {}", customer.id);

    let ephemeral_key = provider.create_ephemeral_key(&customer.id).await?;
    debug!("Created ephemeral key: {}", ephemeral_key.id);

    let intent = provider
        .create_payment_intent(&NewPaymentIntent::for_customer(price.clone(), &customer.id))
        .await?;

    let client_secret = intent.client_secret.ok_or_else(|| {
        PaymentError::provider(
            provider.provider_name(),
            format!("Payment intent {} has no client secret", intent.id),
        )
    })?;

    info!(
        "Payment sheet ready: customer={}, intent={}, amount={}",
        customer.id,
        intent.id,
        price.display()
    );

    Ok(PaymentSheetParams {
        payment_intent: client_secret,
        ephemeral_key: ephemeral_key.secret,
        customer: customer.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{PaymentIntent, PaymentIntentStatus, WebhookEvent};
    use crate::provider::{Customer, EphemeralKey};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingProvider {
        calls: Mutex<Vec<String>>,
        fail_ephemeral_key: bool,
        omit_client_secret: bool,
    }

    impl RecordingProvider {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl PaymentProvider for RecordingProvider {
        async fn create_customer(&self) -> PaymentResult<Customer> {
            self.record("customer".into());
            Ok(Customer { id: "cus_1".into() })
        }

        async fn create_ephemeral_key(&self, customer_id: &str) -> PaymentResult<EphemeralKey> {
            self.record(format!("ephemeral_key:{}", customer_id));
            if self.fail_ephemeral_key {
                return Err(PaymentError::provider("fake", "No such customer"));
            }
            Ok(EphemeralKey {
                id: "ephkey_1".into(),
                secret: "ek_test_1".into(),
                expires: None,
            })
        }

        async fn create_payment_intent(
            &self,
            intent: &NewPaymentIntent,
        ) -> PaymentResult<PaymentIntent> {
            self.record(format!(
                "payment_intent:{}:{}:{}",
                intent.customer_id, intent.price.amount, intent.price.currency
            ));
            Ok(PaymentIntent {
                id: "pi_1".into(),
                amount: intent.price.amount,
                currency: intent.price.currency.as_str().to_string(),
                status: PaymentIntentStatus::RequiresPaymentMethod,
                client_secret: (!self.omit_client_secret).then(|| "pi_1_secret_abc".to_string()),
                customer: Some(intent.customer_id.clone()),
            })
        }

        async fn retrieve_payment_intent(&self, id: &str) -> PaymentResult<PaymentIntent> {
            Err(PaymentError::NotFound(id.to_string()))
        }

        async fn verify_webhook(&self, _payload: &[u8], _signature: &str) -> PaymentResult<WebhookEvent> {
            Err(PaymentError::Internal("unused".into()))
        }

        fn provider_name(&self) -> &'static str {
            "fake"
        }
    }

    #[test]
    fn test_empty_body_uses_defaults() {
        let request = PaymentSheetRequest::from_body(b"").unwrap();
        let price = request.resolve(&SheetDefaults::default()).unwrap();
        assert_eq!(price, Price::from_cents(2000, Currency::USD));

        let request = PaymentSheetRequest::from_body(b"  \n").unwrap();
        assert!(request.amount.is_none());
    }

    #[test]
    fn test_body_overrides_defaults() {
        let request = PaymentSheetRequest::from_body(br#"{"amount": 1099, "currency": "EUR"}"#).unwrap();
        let price = request.resolve(&SheetDefaults::default()).unwrap();
        assert_eq!(price, Price::from_cents(1099, Currency::EUR));
    }

    #[test]
    fn test_invalid_bodies() {
        assert!(matches!(
            PaymentSheetRequest::from_body(b"{not json"),
            Err(PaymentError::InvalidRequest(_))
        ));
        assert!(matches!(
            PaymentSheetRequest::from_body(br#"{"amount": "lots"}"#),
            Err(PaymentError::InvalidRequest(_))
        ));

        let request = PaymentSheetRequest::from_body(br#"{"amount": 0}"#).unwrap();
        assert!(matches!(
            request.resolve(&SheetDefaults::default()),
            Err(PaymentError::InvalidPrice { .. })
        ));

        let request = PaymentSheetRequest::from_body(br#"{"currency": "doge"}"#).unwrap();
        assert!(matches!(
            request.resolve(&SheetDefaults::default()),
            Err(PaymentError::UnsupportedCurrency { .. })
        ));
    }

    #[test]
    fn test_defaults_from_toml() {
        let defaults = SheetDefaults::from_toml_str("amount = 1099\ncurrency = \"eur\"\n").unwrap();
        assert_eq!(defaults.amount, 1099);
        assert_eq!(defaults.currency, Currency::EUR);

        let defaults = SheetDefaults::from_toml_str("").unwrap();
        assert_eq!(defaults, SheetDefaults::default());

        assert!(SheetDefaults::from_toml_str("amount = -5").is_err());
    }

    #[test]
    fn test_params_serialize_camel_case() {
        let params = PaymentSheetParams {
            payment_intent: "pi_secret".into(),
            ephemeral_key: "ek_secret".into(),
            customer: "cus_1".into(),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["paymentIntent"], "pi_secret");
        assert_eq!(json["ephemeralKey"], "ek_secret");
        assert_eq!(json["customer"], "cus_1");
    }

    #[tokio::test]
    async fn test_create_payment_sheet_sequence() {
        let provider = RecordingProvider::default();
        let price = Price::from_cents(2000, Currency::USD);

        let params = create_payment_sheet(&provider, &price).await.unwrap();

        assert_eq!(params.customer, "cus_1");
        assert_eq!(params.ephemeral_key, "ek_test_1");
        assert_eq!(params.payment_intent, "pi_1_secret_abc");
        assert_eq!(
            *provider.calls.lock().unwrap(),
            vec![
                "customer".to_string(),
                "ephemeral_key:cus_1".to_string(),
                "payment_intent:cus_1:2000:USD".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_payment_sheet_stops_at_first_failure() {
        let provider = RecordingProvider {
            fail_ephemeral_key: true,
            ..Default::default()
        };

        let err = create_payment_sheet(&provider, &Price::from_cents(500, Currency::USD))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::ProviderError { .. }));
        assert_eq!(provider.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_client_secret_is_an_error() {
        let provider = RecordingProvider {
            omit_client_secret: true,
            ..Default::default()
        };

        let err = create_payment_sheet(&provider, &Price::from_cents(500, Currency::USD))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no client secret"));
    }
}
