//! # sheet-mobile
//!
//! Client-side checkout flow for payment-sheet-rs.
//!
//! The flow has two screens. `Checkout` fetches the three payment-sheet
//! secrets from the backend, hands them to a native payment sheet and
//! enables the checkout button; `Success` shows a receipt once the sheet
//! reports a completed payment.
//!
//! The native widget sits behind the `PaymentSheet` trait, so the flow runs
//! against any implementation (platform bindings, or a fake in tests).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sheet_mobile::{BackendClient, CheckoutFlow, CheckoutOutcome, MobileConfig};
//! use sheet_core::{Currency, Price};
//!
//! let config = MobileConfig::development("pk_test_...");
//! let backend = BackendClient::new(&config.api_base_url)?;
//! let mut flow = CheckoutFlow::new(backend, native_sheet, config, Price::from_cents(1099, Currency::EUR))?;
//!
//! flow.initialize().await.ok();
//! if let CheckoutOutcome::Paid(receipt) = flow.checkout().await {
//!     println!("Paid {}", receipt.formatted_amount());
//! }
//! ```

pub mod api;
pub mod config;
pub mod flow;
pub mod sheet;

pub use api::BackendClient;
pub use config::MobileConfig;
pub use flow::{Alert, CheckoutFlow, CheckoutOutcome, Receipt, Screen};
pub use sheet::{PaymentConfirmation, PaymentSheet, SheetError, SheetErrorCode, SheetSetup};
