//! The `AlumniConnect` helper bundle exposed to other page scripts.

use std::sync::Arc;
use std::time::Duration;

use http::{HeaderMap, Method};
use serde_json::Value;

use crate::config::UiConfig;
use crate::format::{self, FormatError};
use crate::notify::{Notification, Notifier, Severity};
use crate::page::Page;
use crate::request::{RequestClient, RequestError, Transport};

#[derive(Clone)]
pub struct AlumniConnect {
    client: RequestClient,
    notifier: Notifier,
}

impl AlumniConnect {
    /// CSRF tokens are read from `page` on every request.
    pub fn new(page: &Page, transport: Arc<dyn Transport>, config: &UiConfig) -> Self {
        Self {
            client: RequestClient::new(transport, Arc::new(page.clone())),
            notifier: Notifier::new(page.clone(), config.notification_duration()),
        }
    }

    pub fn format_currency(&self, amount: f64, currency: &str) -> Result<String, FormatError> {
        format::format_currency(amount, currency)
    }

    pub fn format_date(&self, input: &str) -> String {
        format::format_date(input)
    }

    pub fn format_date_time(&self, input: &str) -> String {
        format::format_date_time(input)
    }

    pub async fn make_ajax_request(
        &self,
        url: &str,
        method: Method,
        data: Option<&Value>,
        headers: HeaderMap,
    ) -> Result<Value, RequestError> {
        self.client.request(url, method, data, headers).await
    }

    pub fn show_notification(
        &self,
        message: &str,
        severity: Severity,
        duration: Option<Duration>,
    ) -> Notification {
        self.notifier.notify(message, severity, duration)
    }
}
