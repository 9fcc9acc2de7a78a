//! # Stripe HTTP Client
//!
//! Thin wrapper over `reqwest` that adds Stripe auth, API version pinning,
//! form encoding and error translation.

use crate::config::StripeConfig;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sheet_core::{PaymentError, PaymentResult};
use std::time::Duration;
use tracing::{debug, error};

const PROVIDER: &str = "stripe";

/// Authenticated Stripe REST client
#[derive(Debug, Clone)]
pub struct StripeClient {
    config: StripeConfig,
    http: Client,
}

impl StripeClient {
    /// Create a client with a 30 second request timeout
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// `POST {api_base}{path}` with a form-encoded body
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> PaymentResult<T> {
        let url = format!("{}{}", self.config.api_base_url, path);
        debug!("Stripe POST {} ({} params)", path, params.len());
        self.send(self.http.post(&url).form(params)).await
    }

    /// `GET {api_base}{path}`
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> PaymentResult<T> {
        let url = format!("{}{}", self.config.api_base_url, path);
        debug!("Stripe GET {}", path);
        self.send(self.http.get(&url)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> PaymentResult<T> {
        let response = request
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);
            return Err(translate_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

fn translate_error(status: StatusCode, body: &str) -> PaymentError {
    match serde_json::from_str::<StripeErrorResponse>(body) {
        Ok(parsed) if status == StatusCode::NOT_FOUND => PaymentError::NotFound(parsed.error.message),
        Ok(parsed) => PaymentError::ProviderError {
            provider: PROVIDER.to_string(),
            message: parsed.error.message,
            code: parsed.error.code.or(parsed.error.kind),
        },
        Err(_) if status == StatusCode::NOT_FOUND => {
            PaymentError::NotFound(format!("HTTP {}: {}", status, body))
        }
        Err(_) => PaymentError::provider(PROVIDER, format!("HTTP {}: {}", status, body)),
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}
