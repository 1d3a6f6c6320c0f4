//! Recording fakes for the ports.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use http::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use crate::checkout::{CheckoutError, CheckoutPort, IntentRequest, PaymentMethod};
use crate::page::Element;
use crate::ports::{Browser, ScrollOptions, Toolkit};
use crate::request::{HttpRequest, HttpResponse, RequestError, Transport};

#[derive(Default)]
pub struct RecordingBrowser {
    pub alerts: Mutex<Vec<String>>,
    pub navigations: Mutex<Vec<String>>,
    pub scrolls: Mutex<Vec<(Element, ScrollOptions)>>,
}

impl RecordingBrowser {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

impl Browser for RecordingBrowser {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn navigate(&self, url: &str) {
        self.navigations.lock().unwrap().push(url.to_string());
    }

    fn scroll_into_view(&self, target: &Element, options: ScrollOptions) {
        self.scrolls.lock().unwrap().push((target.clone(), options));
    }
}

#[derive(Default)]
pub struct RecordingToolkit {
    pub tooltips: Mutex<Vec<Element>>,
    pub popovers: Mutex<Vec<Element>>,
    pub closed: Mutex<Vec<Element>>,
}

impl Toolkit for RecordingToolkit {
    fn tooltip(&self, trigger: &Element) {
        self.tooltips.lock().unwrap().push(trigger.clone());
    }

    fn popover(&self, trigger: &Element) {
        self.popovers.lock().unwrap().push(trigger.clone());
    }

    fn close_alert(&self, alert: &Element) {
        self.closed.lock().unwrap().push(alert.clone());
        alert.remove();
    }
}

/// Replies with queued responses in order and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.as_bytes().to_vec(),
        });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| RequestError::Transport("no scripted response".to_string()))
    }
}

/// What a [`FakeCheckout`] saw, with secrets exposed for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutCall {
    CreateIntent {
        amount: Option<String>,
        currency: String,
        csrf_token: String,
    },
    Confirm {
        publishable_key: String,
        client_secret: String,
        card_number: String,
        billing_name: String,
    },
}

pub struct FakeCheckout {
    pub intent: Mutex<Option<Result<String, CheckoutError>>>,
    pub confirmation: Mutex<Option<Result<(), CheckoutError>>>,
    pub calls: Mutex<Vec<CheckoutCall>>,
}

impl FakeCheckout {
    pub fn new(
        intent: Result<String, CheckoutError>,
        confirmation: Result<(), CheckoutError>,
    ) -> Self {
        Self {
            intent: Mutex::new(Some(intent)),
            confirmation: Mutex::new(Some(confirmation)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<CheckoutCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CheckoutPort for FakeCheckout {
    async fn create_intent(
        &self,
        request: &IntentRequest,
        csrf_token: &str,
    ) -> Result<SecretString, CheckoutError> {
        self.calls.lock().unwrap().push(CheckoutCall::CreateIntent {
            amount: request.amount.clone(),
            currency: request.currency.clone(),
            csrf_token: csrf_token.to_string(),
        });
        self.intent
            .lock()
            .unwrap()
            .take()
            .expect("create_intent called twice")
            .map(|secret| SecretString::new(secret.into()))
    }

    async fn confirm_card_payment(
        &self,
        publishable_key: &str,
        client_secret: &SecretString,
        method: &PaymentMethod,
    ) -> Result<(), CheckoutError> {
        self.calls.lock().unwrap().push(CheckoutCall::Confirm {
            publishable_key: publishable_key.to_string(),
            client_secret: client_secret.expose_secret().to_string(),
            card_number: method.card.number.expose_secret().to_string(),
            billing_name: method.billing_name.clone(),
        });
        self.confirmation
            .lock()
            .unwrap()
            .take()
            .expect("confirm_card_payment called twice")
    }
}
