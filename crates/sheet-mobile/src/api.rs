//! # Backend Client
//!
//! Calls the payment-sheet backend from the device.

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use sheet_core::{
    PaymentError, PaymentIntentStatus, PaymentResult, PaymentSheetParams, PaymentSheetRequest,
};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// HTTP client for the payment-sheet backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> PaymentResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /payment-sheet`
    #[instrument(skip(self))]
    pub async fn fetch_payment_sheet_params(
        &self,
        request: &PaymentSheetRequest,
    ) -> PaymentResult<PaymentSheetParams> {
        debug!("Fetching payment sheet params from {}", self.base_url);

        let response = self
            .http
            .post(format!("{}/payment-sheet", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        parse_response(response).await
    }

    /// `GET /payment-status/{id}`
    #[instrument(skip(self))]
    pub async fn payment_status(&self, payment_intent_id: &str) -> PaymentResult<PaymentIntentStatus> {
        // The id becomes a path segment
        if payment_intent_id.is_empty()
            || !payment_intent_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(PaymentError::InvalidRequest(format!(
                "Invalid payment intent id: {:?}",
                payment_intent_id
            )));
        }

        let response = self
            .http
            .get(format!("{}/payment-status/{}", self.base_url, payment_intent_id))
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let body: StatusResponse = parse_response(response).await?;
        Ok(body.status)
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(response: Response) -> PaymentResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

    if !status.is_success() {
        error!("Backend error: status={}, body={}", status, body);
        return Err(backend_error(status, &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| PaymentError::Serialization(format!("Unexpected backend response: {}", e)))
}

fn backend_error(status: StatusCode, body: &str) -> PaymentError {
    let parsed = serde_json::from_str::<ErrorResponse>(body).ok();
    let message = parsed
        .as_ref()
        .map(|r| r.error.message.clone())
        .unwrap_or_else(|| format!("Server error: {}", status.as_u16()));

    if status == StatusCode::NOT_FOUND {
        return PaymentError::NotFound(message);
    }
    if status.is_server_error() && parsed.is_none() {
        return PaymentError::NetworkError(message);
    }

    PaymentError::ProviderError {
        provider: "backend".to_string(),
        message,
        code: parsed.and_then(|r| r.error.code),
    }
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: PaymentIntentStatus,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_payment_sheet_params() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/payment-sheet"))
            .and(body_json(json!({"amount": 1099, "currency": "eur"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "paymentIntent": "pi_1_secret_2",
                "ephemeralKey": "ek_test_3",
                "customer": "cus_4"
            })))
            .mount(&server)
            .await;

        let client = BackendClient::new(format!("{}/", server.uri())).unwrap();
        let request = PaymentSheetRequest {
            amount: Some(1099),
            currency: Some("eur".into()),
        };
        let params = client.fetch_payment_sheet_params(&request).await.unwrap();

        assert_eq!(params.payment_intent, "pi_1_secret_2");
        assert_eq!(params.ephemeral_key, "ek_test_3");
        assert_eq!(params.customer, "cus_4");
    }

    #[tokio::test]
    async fn test_backend_error_message_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/payment-sheet"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"message": "Amount must be at least $0.50 usd", "code": "amount_too_small"}
            })))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri()).unwrap();
        let err = client
            .fetch_payment_sheet_params(&PaymentSheetRequest::default())
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some("amount_too_small"));
        assert!(err.to_string().contains("at least $0.50"));
    }

    #[tokio::test]
    async fn test_opaque_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/payment-sheet"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri()).unwrap();
        let err = client
            .fetch_payment_sheet_params(&PaymentSheetRequest::default())
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert!(err.to_string().contains("Server error: 502"));
    }

    #[tokio::test]
    async fn test_payment_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/payment-status/pi_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "processing"})))
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri()).unwrap();
        assert_eq!(
            client.payment_status("pi_1").await.unwrap(),
            PaymentIntentStatus::Processing
        );
    }

    #[tokio::test]
    async fn test_payment_status_rejects_path_like_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "succeeded"})))
            .expect(0)
            .mount(&server)
            .await;

        let client = BackendClient::new(server.uri()).unwrap();
        for id in ["", "pi_1/../../config", "pi_1?x=1", "pi 1"] {
            let err = client.payment_status(id).await.unwrap_err();
            assert!(matches!(err, PaymentError::InvalidRequest(_)), "id {:?}", id);
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Port 9 (discard) is closed on test machines
        let client = BackendClient::new("http://127.0.0.1:9").unwrap();
        let err = client
            .fetch_payment_sheet_params(&PaymentSheetRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::NetworkError(_)));
    }
}
