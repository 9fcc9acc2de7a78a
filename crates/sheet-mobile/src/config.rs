//! # Client Configuration

use sheet_core::{PaymentError, PaymentResult};

/// Host loopback as seen from the Android emulator
pub const ANDROID_EMULATOR_API_URL: &str = "http://10.0.2.2:3000";

/// Client-side settings for the payment sheet
#[derive(Debug, Clone)]
pub struct MobileConfig {
    /// Publishable key (pk_test_... or pk_live_...)
    pub publishable_key: String,
    /// Apple Pay merchant identifier
    pub merchant_identifier: String,
    /// URL scheme used for redirects back into the app
    pub url_scheme: String,
    /// Base URL of the payment-sheet backend
    pub api_base_url: String,
    /// Name shown at the top of the sheet
    pub merchant_display_name: String,
    /// Billing name prefilled in the sheet
    pub default_billing_name: Option<String>,
}

impl MobileConfig {
    /// Configuration for a development build talking to a local backend
    pub fn development(publishable_key: impl Into<String>) -> Self {
        Self::new(publishable_key, ANDROID_EMULATOR_API_URL)
    }

    pub fn new(publishable_key: impl Into<String>, api_base_url: impl Into<String>) -> Self {
        Self {
            publishable_key: publishable_key.into(),
            merchant_identifier: "merchant.com.paymentsheet".to_string(),
            url_scheme: "paymentsheet".to_string(),
            api_base_url: api_base_url.into(),
            merchant_display_name: "Example, Inc.".to_string(),
            default_billing_name: None,
        }
    }

    /// Builder: prefill the billing name
    pub fn with_default_billing_name(mut self, name: impl Into<String>) -> Self {
        self.default_billing_name = Some(name.into());
        self
    }

    /// Builder: set merchant display name
    pub fn with_merchant_display_name(mut self, name: impl Into<String>) -> Self {
        self.merchant_display_name = name.into();
        self
    }

    /// Redirect target for payment methods that leave the app
    pub fn return_url(&self) -> String {
        format!("{}://stripe-redirect", self.url_scheme)
    }

    /// Reject placeholder keys and non-HTTP backends
    pub fn validate(&self) -> PaymentResult<()> {
        if !self.publishable_key.starts_with("pk_test_")
            && !self.publishable_key.starts_with("pk_live_")
        {
            return Err(PaymentError::Configuration(
                "publishable key must start with pk_test_ or pk_live_".to_string(),
            ));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(PaymentError::Configuration(format!(
                "API base URL must be http(s): {}",
                self.api_base_url
            )));
        }
        if self.url_scheme.is_empty() || self.url_scheme.contains(':') {
            return Err(PaymentError::Configuration(format!(
                "Invalid URL scheme: {:?}",
                self.url_scheme
            )));
        }
        Ok(())
    }
}
