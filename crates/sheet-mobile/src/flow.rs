//! # Checkout Flow
//!
//! Drives the checkout screen: fetch secrets, configure the sheet, present
//! it, and navigate to the success screen when the payment completes.

use crate::api::BackendClient;
use crate::config::MobileConfig;
use crate::sheet::{PaymentSheet, SheetSetup};
use sheet_core::{PaymentIntentStatus, PaymentResult, PaymentSheetRequest, Price};
use tracing::{error, info, instrument};

/// Screens in the navigation stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Checkout,
    Success(Receipt),
}

/// Shown on the success screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub amount: Price,
    pub method: String,
}

impl Receipt {
    pub fn formatted_amount(&self) -> String {
        self.amount.display()
    }

    pub fn status_label(&self) -> &'static str {
        "Completed"
    }
}

/// Modal message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Result of pressing the checkout button
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Paid(Receipt),
    /// Sheet reported an error; the sheet stays configured and may be presented again
    Failed(Alert),
    /// Button pressed before the sheet was ready
    NotReady,
}

/// State of the checkout screen
pub struct CheckoutFlow<S: PaymentSheet> {
    backend: BackendClient,
    sheet: S,
    config: MobileConfig,
    price: Price,
    status: String,
    status_log: Vec<String>,
    ready: bool,
    screen: Screen,
    alert: Option<Alert>,
    payment_intent_id: Option<String>,
}

impl<S: PaymentSheet> CheckoutFlow<S> {
    /// Fails when `config` would not let the sheet start
    pub fn new(
        backend: BackendClient,
        sheet: S,
        config: MobileConfig,
        price: Price,
    ) -> PaymentResult<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            sheet,
            config,
            price,
            status: "Initializing...".to_string(),
            status_log: Vec::new(),
            ready: false,
            screen: Screen::Checkout,
            alert: None,
            payment_intent_id: None,
        })
    }

    /// Status line shown under the amount
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Status lines shown during the latest `initialize` and checkout
    pub fn status_log(&self) -> &[String] {
        &self.status_log
    }

    /// The checkout button is enabled
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Most recent alert, if any
    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn price(&self) -> &Price {
        &self.price
    }

    pub fn sheet(&self) -> &S {
        &self.sheet
    }

    /// Intent the sheet is configured for
    pub fn payment_intent_id(&self) -> Option<&str> {
        self.payment_intent_id.as_deref()
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        info!("Checkout status: {}", self.status);
        self.status_log.push(self.status.clone());
    }

    /// Fetch secrets and configure the sheet. Safe to call again after a
    /// failure ("Retry Setup").
    #[instrument(skip(self))]
    pub async fn initialize(&mut self) -> Result<(), Alert> {
        self.ready = false;
        self.alert = None;
        self.status_log.clear();
        self.set_status("Getting payment data...");

        let request = PaymentSheetRequest {
            amount: Some(self.price.amount),
            currency: Some(self.price.currency.as_str().to_string()),
        };

        self.set_status("Fetching from server...");
        let params = match self.backend.fetch_payment_sheet_params(&request).await {
            Ok(params) => params,
            Err(e) => {
                error!("Fetch error: {}", e);
                self.set_status(format!("Failed: {}", e.message()));
                return Err(self.raise(Alert::new("Initialization Failed", e.message())));
            }
        };
        self.set_status("Server response received");

        self.payment_intent_id = params
            .payment_intent
            .split("_secret_")
            .next()
            .map(String::from);

        self.set_status("Initializing payment sheet...");
        let setup = SheetSetup::from_params(&params, &self.config);
        if let Err(e) = self.sheet.init(setup).await {
            error!("Payment sheet init error: {}", e);
            self.set_status(format!("Init error: {}", e.message));
            return Err(self.raise(Alert::new("Payment Sheet Error", e.message)));
        }

        self.set_status("Ready to pay!");
        self.ready = true;
        Ok(())
    }

    /// Present the sheet. On success the flow moves to the success screen.
    #[instrument(skip(self))]
    pub async fn checkout(&mut self) -> CheckoutOutcome {
        if !self.ready {
            return CheckoutOutcome::NotReady;
        }

        match self.sheet.present().await {
            Ok(confirmation) => {
                let receipt = Receipt {
                    amount: self.price.clone(),
                    method: confirmation.method.unwrap_or_else(|| "Card".to_string()),
                };
                info!("Payment successful: {}", receipt.formatted_amount());
                self.raise(Alert::new("Success", "Your order is confirmed!"));
                // The intent is spent; a new payment needs fresh secrets
                self.ready = false;
                self.set_status("Payment complete");
                self.screen = Screen::Success(receipt.clone());
                CheckoutOutcome::Paid(receipt)
            }
            Err(e) => {
                error!("Payment error: {}", e);
                CheckoutOutcome::Failed(
                    self.raise(Alert::new(format!("Error code: {}", e.code), e.message)),
                )
            }
        }
    }

    /// "Make Another Payment": back to the checkout screen, not yet ready
    pub fn start_new_payment(&mut self) {
        self.screen = Screen::Checkout;
        self.ready = false;
        self.alert = None;
        self.payment_intent_id = None;
        self.set_status("Initializing...");
    }

    /// Ask the backend where the configured intent stands
    pub async fn refresh_payment_status(&self) -> PaymentResult<Option<PaymentIntentStatus>> {
        match self.payment_intent_id.as_deref() {
            Some(id) => Ok(Some(self.backend.payment_status(id).await?)),
            None => Ok(None),
        }
    }

    fn raise(&mut self, alert: Alert) -> Alert {
        self.alert = Some(alert.clone());
        alert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{PaymentConfirmation, SheetError, SheetErrorCode};
    use async_trait::async_trait;
    use serde_json::json;
    use sheet_core::{Currency, PaymentError};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Scripted sheet: returns queued results in order
    #[derive(Default)]
    struct ScriptedSheet {
        init_error: Option<SheetError>,
        present_results: Mutex<VecDeque<Result<PaymentConfirmation, SheetError>>>,
        setups: Mutex<Vec<SheetSetup>>,
    }

    impl ScriptedSheet {
        fn presenting(results: Vec<Result<PaymentConfirmation, SheetError>>) -> Self {
            Self {
                present_results: Mutex::new(results.into()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl PaymentSheet for ScriptedSheet {
        async fn init(&self, setup: SheetSetup) -> Result<(), SheetError> {
            self.setups.lock().unwrap().push(setup);
            match &self.init_error {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }

        async fn present(&self) -> Result<PaymentConfirmation, SheetError> {
            self.present_results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(SheetError::new(SheetErrorCode::Failed, "nothing scripted")))
        }
    }

    async fn backend_ok() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment-sheet"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "paymentIntent": "pi_123_secret_abc",
                "ephemeralKey": "ek_test_1",
                "customer": "cus_1"
            })))
            .mount(&server)
            .await;
        server
    }

    fn flow_for(server: &MockServer, sheet: ScriptedSheet) -> CheckoutFlow<ScriptedSheet> {
        CheckoutFlow::new(
            BackendClient::new(server.uri()).unwrap(),
            sheet,
            MobileConfig::new("pk_test_abc", server.uri()),
            Price::from_cents(1099, Currency::EUR),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_new_rejects_invalid_config() {
        let server = backend_ok().await;
        let result = CheckoutFlow::new(
            BackendClient::new(server.uri()).unwrap(),
            ScriptedSheet::default(),
            MobileConfig::new("YOUR_PUBLISHABLE_KEY", server.uri()),
            Price::from_cents(1099, Currency::EUR),
        );
        assert!(matches!(result, Err(PaymentError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_initialize_walks_status_to_ready() {
        let server = backend_ok().await;
        let mut flow = flow_for(&server, ScriptedSheet::default());

        assert!(!flow.is_ready());
        flow.initialize().await.unwrap();

        assert!(flow.is_ready());
        assert_eq!(flow.status(), "Ready to pay!");
        assert_eq!(
            flow.status_log(),
            [
                "Getting payment data...",
                "Fetching from server...",
                "Server response received",
                "Initializing payment sheet...",
                "Ready to pay!",
            ]
        );
        assert_eq!(flow.payment_intent_id(), Some("pi_123"));

        let setups = flow.sheet().setups.lock().unwrap();
        assert_eq!(setups[0].customer_id, "cus_1");
        assert_eq!(setups[0].publishable_key, "pk_test_abc");
        assert_eq!(setups[0].return_url, "paymentsheet://stripe-redirect");
        assert_eq!(setups[0].payment_intent_client_secret, "pi_123_secret_abc");
    }

    #[tokio::test]
    async fn test_successful_checkout_navigates_to_success() {
        let server = backend_ok().await;
        let sheet = ScriptedSheet::presenting(vec![Ok(PaymentConfirmation::default())]);
        let mut flow = flow_for(&server, sheet);
        flow.initialize().await.unwrap();

        let outcome = flow.checkout().await;

        let receipt = Receipt {
            amount: Price::from_cents(1099, Currency::EUR),
            method: "Card".to_string(),
        };
        assert_eq!(outcome, CheckoutOutcome::Paid(receipt.clone()));
        assert_eq!(flow.screen(), &Screen::Success(receipt.clone()));
        assert_eq!(receipt.formatted_amount(), "€10.99");
        assert_eq!(receipt.status_label(), "Completed");
        assert!(!flow.is_ready());
        assert_eq!(flow.alert().unwrap().message, "Your order is confirmed!");

        flow.start_new_payment();
        assert_eq!(flow.screen(), &Screen::Checkout);
        assert_eq!(flow.status(), "Initializing...");
    }

    #[tokio::test]
    async fn test_canceled_sheet_stays_on_checkout() {
        let server = backend_ok().await;
        let sheet = ScriptedSheet::presenting(vec![
            Err(SheetError::new(
                SheetErrorCode::Canceled,
                "The payment flow has been canceled",
            )),
            Ok(PaymentConfirmation {
                method: Some("Visa •••• 4242".into()),
            }),
        ]);
        let mut flow = flow_for(&server, sheet);
        flow.initialize().await.unwrap();

        match flow.checkout().await {
            CheckoutOutcome::Failed(alert) => {
                assert_eq!(alert.title, "Error code: Canceled");
                assert_eq!(alert.message, "The payment flow has been canceled");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(flow.screen(), &Screen::Checkout);
        assert!(flow.is_ready());

        // Presenting again is allowed after a cancel
        match flow.checkout().await {
            CheckoutOutcome::Paid(receipt) => assert_eq!(receipt.method, "Visa •••• 4242"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_checkout_before_ready() {
        let server = backend_ok().await;
        let mut flow = flow_for(&server, ScriptedSheet::default());
        assert_eq!(flow.checkout().await, CheckoutOutcome::NotReady);
    }

    #[tokio::test]
    async fn test_fetch_failure_then_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment-sheet"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/payment-sheet"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "paymentIntent": "pi_9_secret_z",
                "ephemeralKey": "ek_test_9",
                "customer": "cus_9"
            })))
            .mount(&server)
            .await;

        let mut flow = flow_for(&server, ScriptedSheet::default());

        let alert = flow.initialize().await.unwrap_err();
        assert_eq!(alert.title, "Initialization Failed");
        assert_eq!(alert.message, "Server error: 500");
        assert_eq!(flow.status(), "Failed: Server error: 500");
        assert!(!flow.is_ready());

        flow.initialize().await.unwrap();
        assert!(flow.is_ready());
        assert_eq!(flow.payment_intent_id(), Some("pi_9"));
        // The retry starts a fresh log
        assert_eq!(flow.status_log().len(), 5);
        assert_eq!(flow.status_log()[0], "Getting payment data...");
    }

    #[tokio::test]
    async fn test_server_error_message_is_shown_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payment-sheet"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"message": "Invalid API Key provided"}
            })))
            .mount(&server)
            .await;

        let mut flow = flow_for(&server, ScriptedSheet::default());
        let alert = flow.initialize().await.unwrap_err();

        assert_eq!(alert.message, "Invalid API Key provided");
        assert_eq!(flow.status(), "Failed: Invalid API Key provided");
    }

    #[tokio::test]
    async fn test_sheet_init_failure() {
        let server = backend_ok().await;
        let sheet = ScriptedSheet {
            init_error: Some(SheetError::new(
                SheetErrorCode::Failed,
                "Invalid ephemeral key",
            )),
            ..Default::default()
        };
        let mut flow = flow_for(&server, sheet);

        let alert = flow.initialize().await.unwrap_err();

        assert_eq!(alert.title, "Payment Sheet Error");
        assert_eq!(flow.status(), "Init error: Invalid ephemeral key");
        assert!(!flow.is_ready());
    }

    #[tokio::test]
    async fn test_refresh_payment_status() {
        let server = backend_ok().await;
        Mock::given(method("GET"))
            .and(path("/payment-status/pi_123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "succeeded"})))
            .mount(&server)
            .await;

        let mut flow = flow_for(&server, ScriptedSheet::default());
        assert_eq!(flow.refresh_payment_status().await.unwrap(), None);

        flow.initialize().await.unwrap();
        assert_eq!(
            flow.refresh_payment_status().await.unwrap(),
            Some(PaymentIntentStatus::Succeeded)
        );
    }
}
