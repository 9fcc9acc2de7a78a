//! # Payment Error Types
//!
//! Typed error handling for the payment-sheet backend.
//! All provider and request operations return `Result<T, PaymentError>`.

use std::borrow::Cow;
use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Non-positive or otherwise unusable amount
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// Currency not supported
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError {
        provider: String,
        message: String,
        code: Option<String>,
    },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Webhook signature verification failed
    #[error("Webhook verification failed: {0}")]
    WebhookVerificationFailed(String),

    /// Webhook payload parsing error
    #[error("Webhook parse error: {0}")]
    WebhookParseError(String),

    /// Resource unknown to the provider
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PaymentError {
    /// Shorthand for a provider error without a provider error code
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::ProviderError {
            provider: provider.into(),
            message: message.into(),
            code: None,
        }
    }

    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentError::NetworkError(_))
    }

    /// Provider error code (e.g. `amount_too_small`), if any
    pub fn code(&self) -> Option<&str> {
        match self {
            PaymentError::ProviderError { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// The message without the variant prefix. This is what clients see;
    /// provider messages pass through unchanged.
    pub fn message(&self) -> Cow<'_, str> {
        match self {
            PaymentError::Configuration(m)
            | PaymentError::InvalidRequest(m)
            | PaymentError::NetworkError(m)
            | PaymentError::WebhookVerificationFailed(m)
            | PaymentError::WebhookParseError(m)
            | PaymentError::NotFound(m)
            | PaymentError::Serialization(m)
            | PaymentError::Internal(m) => Cow::Borrowed(m.as_str()),
            PaymentError::InvalidPrice { message } | PaymentError::ProviderError { message, .. } => {
                Cow::Borrowed(message.as_str())
            }
            PaymentError::UnsupportedCurrency { .. } => Cow::Owned(self.to_string()),
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::InvalidPrice { .. } => 400,
            PaymentError::UnsupportedCurrency { .. } => 400,
            PaymentError::ProviderError { .. } => 400,
            PaymentError::NetworkError(_) => 503,
            PaymentError::WebhookVerificationFailed(_) => 400,
            PaymentError::WebhookParseError(_) => 400,
            PaymentError::NotFound(_) => 404,
            PaymentError::Serialization(_) => 500,
            PaymentError::Internal(_) => 500,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
