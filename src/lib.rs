//! Page behaviour for the Alumni Connect portal
//!
//! This library provides the interactive pieces of the portal's pages:
//! password strength hints, debounced search, card checkout, notifications
//! and display formatting, over a headless page model.
//!
//! # Features
//!
//! - `tracing` (default): Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `ALUMNI_CONNECT_CONFIG`: JSON config file read by [`UiConfig::load`]
//! - `ALUMNI_CONNECT_BASE_URL`: origin for relative request paths
//! - `ALUMNI_CONNECT_INTENT_ENDPOINT`: payment intent path
//!   (default: `/payment/create-intent/`)
//! - `ALUMNI_CONNECT_SUCCESS_URL`: redirect after payment
//!   (default: `/payment/success/`)
//! - `ALUMNI_CONNECT_PROVIDER_API`: card provider API
//!   (default: `https://api.stripe.com`)
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use alumni_connect_ui::{
//!     attach, Browser, Element, HeadlessToolkit, HttpCheckout, Page, Ports,
//!     ReqwestTransport, ScrollOptions, UiConfig,
//! };
//!
//! struct Window;
//!
//! impl Browser for Window {
//!     fn alert(&self, message: &str) { eprintln!("{message}"); }
//!     fn navigate(&self, url: &str) { println!("-> {url}"); }
//!     fn scroll_into_view(&self, _target: &Element, _options: ScrollOptions) {}
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = UiConfig::load()?;
//! let transport = Arc::new(ReqwestTransport::new(config.base_url.as_deref())?);
//! let ports = Ports {
//!     browser: Arc::new(Window),
//!     toolkit: Arc::new(HeadlessToolkit),
//!     checkout: Arc::new(HttpCheckout::new(transport, &config)),
//! };
//!
//! let page = Page::new();
//! let ui = attach(&page, &ports, &config);
//! if let Some(search) = &ui.search {
//!     search.on_input("batch of 2015");
//! }
//! # Ok(())
//! # }
//! ```

// Internal modules
mod sections;

// Public modules
pub mod bootstrap;
pub mod checkout;
pub mod config;
pub mod debounce;
pub mod evaluator;
pub mod format;
pub mod global;
pub mod notify;
pub mod page;
pub mod ports;
pub mod request;
pub mod search;
pub mod widgets;

#[cfg(test)]
mod testing;

// Public API
pub use bootstrap::{AttachedUi, Ports, attach};
pub use checkout::{CheckoutError, CheckoutFlow, CheckoutPort, HttpCheckout};
pub use config::{ConfigError, UiConfig};
pub use debounce::Debouncer;
pub use evaluator::{
    PasswordStrengthMeter, StrengthEvaluation, StrengthScore, check_password_strength,
    evaluate_password_strength,
};
pub use format::{FormatError, format_currency, format_date, format_date_time};
pub use global::AlumniConnect;
pub use notify::{Notification, Notifier, Severity};
pub use page::{DomEvent, Element, Page, SelectedFile};
pub use ports::{Browser, HeadlessToolkit, ScrollOptions, Toolkit};
pub use request::{RequestClient, RequestError, ReqwestTransport, Transport};
