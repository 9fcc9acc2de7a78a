//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment provider, sheet defaults and server configuration.

use sheet_core::{BoxedPaymentProvider, SheetDefaults};
use sheet_stripe::StripeProvider;
use std::net::SocketAddr;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            // All interfaces, so emulators and devices on the LAN can reach it
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Hosted payment processor
    pub provider: BoxedPaymentProvider,
    /// Amount/currency used when the client omits them
    pub defaults: SheetDefaults,
    /// Application config
    pub config: AppConfig,
    /// Publishable key served to clients at `/config`
    pub publishable_key: Option<String>,
}

impl AppState {
    /// Create a new AppState backed by Stripe, configured from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let defaults = load_sheet_defaults()?;

        let stripe = StripeProvider::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        if stripe.config().webhook_secret.is_none() {
            tracing::warn!("STRIPE_WEBHOOK_SECRET not set, /webhook will reject every event");
        }

        let publishable_key = stripe.config().publishable_key.clone();

        Ok(Self {
            provider: Arc::new(stripe) as BoxedPaymentProvider,
            defaults,
            config,
            publishable_key,
        })
    }

    /// Create state around an existing provider
    pub fn with_provider(provider: BoxedPaymentProvider, config: AppConfig) -> Self {
        Self {
            provider,
            defaults: SheetDefaults::default(),
            config,
            publishable_key: None,
        }
    }

    /// Builder: override sheet defaults
    pub fn with_defaults(mut self, defaults: SheetDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Builder: set the publishable key
    pub fn with_publishable_key(mut self, key: impl Into<String>) -> Self {
        self.publishable_key = Some(key.into());
        self
    }
}

/// Load sheet defaults from config file
fn load_sheet_defaults() -> anyhow::Result<SheetDefaults> {
    let config_paths = [
        "config/payment-sheet.toml",
        "../config/payment-sheet.toml",
        "../../config/payment-sheet.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let defaults = SheetDefaults::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!(
                "Loaded sheet defaults from {}: amount={}, currency={}",
                path,
                defaults.amount,
                defaults.currency
            );
            return Ok(defaults);
        }
    }

    tracing::info!("No sheet defaults file found, using built-in defaults");
    Ok(SheetDefaults::default())
}
