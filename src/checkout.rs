//! Card checkout: intent request, provider confirmation, redirect.
//!
//! [`CheckoutFlow`] owns the sequencing and the submit control; everything
//! that leaves the page goes through a [`CheckoutPort`]. [`HttpCheckout`] is
//! the production port.

use std::sync::Arc;

use async_trait::async_trait;
use http::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::{
    CARD_CVC_ID, CARD_EXP_MONTH_ID, CARD_EXP_YEAR_ID, CARD_NAME_ID, CARD_NUMBER_ID,
    CSRF_FIELD_NAME, PUBLISHABLE_KEY_META, UiConfig,
};
use crate::page::{DomEvent, Element, Page};
use crate::ports::Browser;
use crate::request::{Body, HttpRequest, HttpResponse, RequestError, Transport, json_headers};

pub const PROCESSING_PAYMENT_HTML: &str = r#"<span class="loading"></span> Processing Payment..."#;

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Payment system not configured")]
    NotConfigured,
    /// `error` field of the intent endpoint's reply.
    #[error("{0}")]
    Server(String),
    /// Message reported by the card provider.
    #[error("{0}")]
    Provider(String),
    #[error("payment field #{0} is missing")]
    MissingField(&'static str),
    #[error("intent response did not include a client secret")]
    MissingClientSecret,
    #[error(transparent)]
    Request(#[from] RequestError),
}

impl CheckoutError {
    /// Text shown in the blocking alert.
    pub fn alert_message(&self) -> String {
        match self {
            CheckoutError::NotConfigured => self.to_string(),
            other => format!("Payment failed: {other}"),
        }
    }
}

/// Body of the intent-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    pub currency: String,
}

#[derive(Debug)]
pub struct CardDetails {
    pub number: SecretString,
    pub exp_month: String,
    pub exp_year: String,
    pub cvc: SecretString,
}

#[derive(Debug)]
pub struct PaymentMethod {
    pub card: CardDetails,
    pub billing_name: String,
}

/// Server side of the checkout, as seen from the page.
#[async_trait]
pub trait CheckoutPort: Send + Sync {
    /// Asks the backend for a payment intent; returns its client secret.
    async fn create_intent(
        &self,
        request: &IntentRequest,
        csrf_token: &str,
    ) -> Result<SecretString, CheckoutError>;

    /// Confirms the intent with the card provider.
    async fn confirm_card_payment(
        &self,
        publishable_key: &str,
        client_secret: &SecretString,
        method: &PaymentMethod,
    ) -> Result<(), CheckoutError>;
}

/// Snapshot of the submit control taken before the attempt.
#[derive(Debug, Clone)]
struct ControlState {
    label: String,
    disabled: bool,
}

/// Submit handler for the `payment-form`.
#[derive(Clone)]
pub struct CheckoutFlow {
    page: Page,
    form: Element,
    control: Option<Element>,
    port: Arc<dyn CheckoutPort>,
    browser: Arc<dyn Browser>,
    currency: String,
    success_url: String,
}

impl CheckoutFlow {
    pub fn new(
        page: Page,
        form: Element,
        port: Arc<dyn CheckoutPort>,
        browser: Arc<dyn Browser>,
        config: &UiConfig,
    ) -> Self {
        let control = form.find(|e| e.is_typed("button", "submit"));
        Self {
            page,
            form,
            control,
            port,
            browser,
            currency: config.currency.clone(),
            success_url: config.success_url.clone(),
        }
    }

    pub fn form(&self) -> &Element {
        &self.form
    }

    /// Submit handler: keeps the browser from navigating and runs the
    /// attempt in the background.
    ///
    /// The control is disabled before this returns. Must be called from
    /// within a tokio runtime.
    pub fn on_submit(&self, event: &mut DomEvent) -> tokio::task::JoinHandle<Result<(), CheckoutError>> {
        event.prevent_default();
        let saved = self.begin();
        let flow = self.clone();
        tokio::spawn(async move { flow.finish(saved).await })
    }

    /// Runs one checkout attempt to completion.
    ///
    /// On success the browser is sent to the success URL and the control
    /// stays disabled. On failure the user is alerted and the control is
    /// restored.
    pub async fn submit(&self) -> Result<(), CheckoutError> {
        let saved = self.begin();
        self.finish(saved).await
    }

    fn begin(&self) -> Option<ControlState> {
        self.control.as_ref().map(|control| {
            let saved = ControlState {
                label: control.inner_html(),
                disabled: control.is_disabled(),
            };
            control.set_inner_html(PROCESSING_PAYMENT_HTML);
            control.set_disabled(true);
            saved
        })
    }

    async fn finish(&self, saved: Option<ControlState>) -> Result<(), CheckoutError> {
        match self.attempt().await {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::info!(redirect = %self.success_url, "payment confirmed");
                self.browser.navigate(&self.success_url);
                Ok(())
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Payment error: {}", err);
                self.browser.alert(&err.alert_message());
                self.restore(saved);
                Err(err)
            }
        }
    }

    async fn attempt(&self) -> Result<(), CheckoutError> {
        let publishable_key = self
            .page
            .meta_content(PUBLISHABLE_KEY_META)
            .filter(|key| !key.is_empty())
            .ok_or(CheckoutError::NotConfigured)?;

        let request = IntentRequest {
            amount: self.form.dataset("amount"),
            currency: self.currency.clone(),
        };
        let csrf_token = self.page.field_value(CSRF_FIELD_NAME).unwrap_or_default();

        #[cfg(feature = "tracing")]
        tracing::info!(amount = ?request.amount, currency = %request.currency, "requesting payment intent");

        let client_secret = self.port.create_intent(&request, &csrf_token).await?;
        let method = self.read_payment_method()?;
        self.port
            .confirm_card_payment(&publishable_key, &client_secret, &method)
            .await
    }

    fn field(&self, id: &'static str) -> Result<String, CheckoutError> {
        self.form
            .find_by_id(id)
            .map(|field| field.value())
            .ok_or(CheckoutError::MissingField(id))
    }

    fn read_payment_method(&self) -> Result<PaymentMethod, CheckoutError> {
        Ok(PaymentMethod {
            card: CardDetails {
                number: SecretString::new(self.field(CARD_NUMBER_ID)?.into()),
                exp_month: self.field(CARD_EXP_MONTH_ID)?,
                exp_year: self.field(CARD_EXP_YEAR_ID)?,
                cvc: SecretString::new(self.field(CARD_CVC_ID)?.into()),
            },
            billing_name: self.field(CARD_NAME_ID)?,
        })
    }

    fn restore(&self, saved: Option<ControlState>) {
        if let (Some(control), Some(saved)) = (&self.control, saved) {
            control.set_inner_html(&saved.label);
            control.set_disabled(saved.disabled);
        }
    }
}

/// JS-style truthiness of an `error` field: empty strings, `false`, `0` and
/// `null` are not errors.
fn error_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// [`CheckoutPort`] over HTTP: the site backend for intents, the card
/// provider's REST API for confirmation.
#[derive(Clone)]
pub struct HttpCheckout {
    transport: Arc<dyn Transport>,
    intent_endpoint: String,
    provider_api_base: String,
}

impl HttpCheckout {
    pub fn new(transport: Arc<dyn Transport>, config: &UiConfig) -> Self {
        Self {
            transport,
            intent_endpoint: config.intent_endpoint.clone(),
            provider_api_base: config.provider_api_base.trim_end_matches('/').to_string(),
        }
    }

    fn parse_intent(response: &HttpResponse) -> Result<SecretString, CheckoutError> {
        let body = response.json();
        if let Ok(body) = &body {
            if let Some(message) = body.get("error").and_then(error_message) {
                return Err(CheckoutError::Server(message));
            }
        }
        if !response.is_success() {
            return Err(RequestError::Http {
                status: response.status.as_u16(),
            }
            .into());
        }
        body?
            .get("client_secret")
            .and_then(Value::as_str)
            .filter(|secret| !secret.is_empty())
            .map(|secret| SecretString::new(secret.to_string().into()))
            .ok_or(CheckoutError::MissingClientSecret)
    }
}

/// `pi_123_secret_abc` -> `pi_123`.
fn intent_id(client_secret: &str) -> &str {
    client_secret
        .split_once("_secret_")
        .map(|(id, _)| id)
        .unwrap_or(client_secret)
}

#[async_trait]
impl CheckoutPort for HttpCheckout {
    async fn create_intent(
        &self,
        request: &IntentRequest,
        csrf_token: &str,
    ) -> Result<SecretString, CheckoutError> {
        let response = self
            .transport
            .send(HttpRequest {
                method: Method::POST,
                url: self.intent_endpoint.clone(),
                headers: json_headers(csrf_token)?,
                body: Some(Body::Json(
                    serde_json::to_value(request).map_err(RequestError::from)?,
                )),
            })
            .await?;
        Self::parse_intent(&response)
    }

    async fn confirm_card_payment(
        &self,
        publishable_key: &str,
        client_secret: &SecretString,
        method: &PaymentMethod,
    ) -> Result<(), CheckoutError> {
        let secret = client_secret.expose_secret();
        let url = format!(
            "{}/v1/payment_intents/{}/confirm",
            self.provider_api_base,
            intent_id(secret)
        );
        let card = &method.card;
        let form = vec![
            ("key".to_string(), publishable_key.to_string()),
            ("client_secret".to_string(), secret.to_string()),
            ("payment_method_data[type]".to_string(), "card".to_string()),
            (
                "payment_method_data[card][number]".to_string(),
                card.number.expose_secret().to_string(),
            ),
            ("payment_method_data[card][exp_month]".to_string(), card.exp_month.clone()),
            ("payment_method_data[card][exp_year]".to_string(), card.exp_year.clone()),
            (
                "payment_method_data[card][cvc]".to_string(),
                card.cvc.expose_secret().to_string(),
            ),
            (
                "payment_method_data[billing_details][name]".to_string(),
                method.billing_name.clone(),
            ),
        ];

        let response = self
            .transport
            .send(HttpRequest {
                method: Method::POST,
                url,
                headers: http::HeaderMap::new(),
                body: Some(Body::Form(form)),
            })
            .await?;

        let body = response.json().ok();
        let provider_message = body
            .as_ref()
            .and_then(|b| b.get("error"))
            .map(|error| {
                error
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string())
            });
        if let Some(message) = provider_message {
            return Err(CheckoutError::Provider(message));
        }
        if !response.is_success() {
            return Err(RequestError::Http {
                status: response.status.as_u16(),
            }
            .into());
        }
        Ok(())
    }
}
