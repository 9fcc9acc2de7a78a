//! # Request Handlers
//!
//! Axum request handlers for the payment-sheet API.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use sheet_core::{create_payment_sheet, PaymentError, PaymentSheetParams, PaymentSheetRequest};
use sheet_stripe::{dispatch_webhook_event, LoggingWebhookHandler};
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Error response: `{ "error": { "message": ..., "code": ... } }`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    /// Provider error code, when the provider supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
                code: None,
            },
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.error.code = Some(code.into());
        self
    }
}

/// Payment status response
#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentStatusResponse {
    pub status: String,
}

/// Client configuration response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfigResponse {
    pub publishable_key: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn payment_error_to_response(err: PaymentError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut body = ErrorResponse::new(err.message());
    if let Some(code) = err.code() {
        body = body.with_code(code);
    }
    (status, Json(body))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "payment-sheet",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Publishable key for clients that do not bundle one
pub async fn client_config(
    State(state): State<AppState>,
) -> Result<Json<ClientConfigResponse>, ApiError> {
    let publishable_key = state.publishable_key.clone().ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Publishable key not configured")),
        )
    })?;

    Ok(Json(ClientConfigResponse { publishable_key }))
}

/// Create customer, ephemeral key and payment intent for a payment sheet.
///
/// The body is read raw: clients may POST with no body at all.
#[instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn create_sheet(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PaymentSheetParams>, ApiError> {
    let price = PaymentSheetRequest::from_body(&body)
        .and_then(|request| request.resolve(&state.defaults))
        .map_err(|e| {
            info!("Rejected payment sheet request: {}", e);
            payment_error_to_response(e)
        })?;

    info!("Creating payment sheet: amount={}", price.display());

    let params = create_payment_sheet(state.provider.as_ref(), &price)
        .await
        .map_err(|e| {
            error!("Failed to create payment sheet: {}", e);
            payment_error_to_response(e)
        })?;

    Ok(Json(params))
}

/// Report the status of a payment intent
#[instrument(skip(state))]
pub async fn payment_status(
    State(state): State<AppState>,
    Path(payment_intent_id): Path<String>,
) -> Result<Json<PaymentStatusResponse>, ApiError> {
    let intent = state
        .provider
        .retrieve_payment_intent(&payment_intent_id)
        .await
        .map_err(|e| {
            error!("Failed to retrieve payment intent: {}", e);
            payment_error_to_response(e)
        })?;

    Ok(Json(PaymentStatusResponse {
        status: intent.status.as_str().to_string(),
    }))
}

/// Handle a provider webhook
#[instrument(skip(state, headers, body))]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Missing Stripe-Signature header")),
            )
        })?;

    let event = state
        .provider
        .verify_webhook(&body, signature)
        .await
        .map_err(|e| {
            error!("Webhook verification failed: {}", e);
            payment_error_to_response(e)
        })?;

    info!(
        "Received webhook: type={}, id={}",
        event.event_type.as_str(),
        event.event_id
    );

    dispatch_webhook_event(&LoggingWebhookHandler, &event).map_err(|e| {
        error!("Webhook handler error: {}", e);
        payment_error_to_response(e)
    })?;

    Ok(Json(serde_json::json!({ "received": true })))
}
