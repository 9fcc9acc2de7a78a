//! # Stripe Webhook Handling
//!
//! Utilities for handling verified Stripe webhook events.
//! Events are only logged; nothing is persisted.

use sheet_core::{PaymentResult, WebhookEvent, WebhookEventType};
use tracing::{debug, info, warn};

/// Webhook event handler trait
///
/// Implement this trait to react to payment intent events. Every method
/// defaults to logging the event.
pub trait WebhookHandler: Send + Sync {
    /// payment_intent.succeeded
    fn on_payment_succeeded(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!(
            "Payment succeeded: intent={:?}, amount={:?}",
            event.payment_intent_id, event.amount
        );
        Ok(())
    }

    /// payment_intent.payment_failed
    fn on_payment_failed(&self, event: &WebhookEvent) -> PaymentResult<()> {
        warn!(
            "Payment failed: intent={:?}, reason={:?}",
            event.payment_intent_id, event.failure_message
        );
        Ok(())
    }

    /// payment_intent.canceled
    fn on_payment_canceled(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!("Payment canceled: intent={:?}", event.payment_intent_id);
        Ok(())
    }

    /// payment_intent.processing
    fn on_payment_processing(&self, event: &WebhookEvent) -> PaymentResult<()> {
        info!("Payment processing: intent={:?}", event.payment_intent_id);
        Ok(())
    }

    /// Called for unknown/unhandled events
    fn on_unknown_event(&self, event: &WebhookEvent) -> PaymentResult<()> {
        debug!("Unhandled event type {}", event.event_type.as_str());
        Ok(())
    }
}

/// Default webhook handler (just logs events)
pub struct LoggingWebhookHandler;

impl WebhookHandler for LoggingWebhookHandler {}

/// Dispatch a webhook event to the appropriate handler method
pub fn dispatch_webhook_event(
    handler: &dyn WebhookHandler,
    event: &WebhookEvent,
) -> PaymentResult<()> {
    match &event.event_type {
        WebhookEventType::PaymentSucceeded => handler.on_payment_succeeded(event),
        WebhookEventType::PaymentFailed => handler.on_payment_failed(event),
        WebhookEventType::PaymentCanceled => handler.on_payment_canceled(event),
        WebhookEventType::PaymentProcessing => handler.on_payment_processing(event),
        WebhookEventType::Unknown(_) => handler.on_unknown_event(event),
    }
}

/// Events to enable on the webhook endpoint in the Stripe Dashboard
pub const HANDLED_WEBHOOK_EVENTS: &[&str] = &[
    "payment_intent.succeeded",
    "payment_intent.payment_failed",
    "payment_intent.canceled",
    "payment_intent.processing",
];
