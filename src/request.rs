//! JSON request helper with CSRF headers.

use std::sync::Arc;

use async_trait::async_trait;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::config::{CSRF_FIELD_NAME, CSRF_HEADER};
use crate::page::Page;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
    #[error("Failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        RequestError::Transport(e.to_string())
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    /// `application/x-www-form-urlencoded` pairs, in order.
    Form(Vec<(String, String)>),
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Body>,
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json(&self) -> Result<Value, RequestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Sends one request. No retries, no timeout.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError>;
}

/// Where the CSRF token is read from, fresh on each request.
pub trait CsrfSource: Send + Sync {
    fn csrf_token(&self) -> Option<String>;
}

impl CsrfSource for Page {
    fn csrf_token(&self) -> Option<String> {
        self.field_value(CSRF_FIELD_NAME)
    }
}

/// `Content-Type: application/json` plus the CSRF header.
pub(crate) fn json_headers(csrf_token: &str) -> Result<HeaderMap, RequestError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    let token = HeaderValue::from_str(csrf_token)
        .map_err(|_| RequestError::InvalidHeader(CSRF_HEADER.to_string()))?;
    headers.insert(HeaderName::from_static("x-csrftoken"), token);
    Ok(headers)
}

/// Generic AJAX helper shared by page scripts.
#[derive(Clone)]
pub struct RequestClient {
    transport: Arc<dyn Transport>,
    csrf: Arc<dyn CsrfSource>,
}

impl RequestClient {
    pub fn new(transport: Arc<dyn Transport>, csrf: Arc<dyn CsrfSource>) -> Self {
        Self { transport, csrf }
    }

    /// Default headers for the next request; the token is empty when absent.
    pub fn default_headers(&self) -> Result<HeaderMap, RequestError> {
        json_headers(&self.csrf.csrf_token().unwrap_or_default())
    }

    /// Issues the request and resolves with the parsed JSON body.
    ///
    /// Caller headers replace defaults with the same name. A status outside
    /// 2xx fails with [`RequestError::Http`].
    pub async fn request(
        &self,
        url: &str,
        method: Method,
        body: Option<&Value>,
        headers: HeaderMap,
    ) -> Result<Value, RequestError> {
        let mut merged = self.default_headers()?;
        merged.extend(headers);

        #[cfg(feature = "tracing")]
        tracing::debug!(%method, url, "sending request");

        let response = self
            .transport
            .send(HttpRequest {
                method,
                url: url.to_string(),
                headers: merged,
                body: body.cloned().map(Body::Json),
            })
            .await?;

        if !response.is_success() {
            #[cfg(feature = "tracing")]
            tracing::debug!(status = response.status.as_u16(), url, "request rejected");
            return Err(RequestError::Http {
                status: response.status.as_u16(),
            });
        }
        response.json()
    }
}

/// [`Transport`] over reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Option<reqwest::Url>,
}

impl ReqwestTransport {
    /// `base_url` resolves relative paths such as `/payment/create-intent/`.
    pub fn new(base_url: Option<&str>) -> Result<Self, RequestError> {
        let base_url = base_url
            .map(|url| {
                reqwest::Url::parse(url).map_err(|e| RequestError::InvalidUrl(e.to_string()))
            })
            .transpose()?;
        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    fn resolve(&self, url: &str) -> Result<reqwest::Url, RequestError> {
        match reqwest::Url::parse(url) {
            Ok(absolute) => Ok(absolute),
            Err(_) => self
                .base_url
                .as_ref()
                .ok_or_else(|| RequestError::InvalidUrl(url.to_string()))?
                .join(url)
                .map_err(|e| RequestError::InvalidUrl(e.to_string())),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RequestError> {
        let url = self.resolve(&request.url)?;
        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);
        builder = match request.body {
            Some(Body::Json(value)) => builder.json(&value),
            Some(Body::Form(pairs)) => builder.form(&pairs),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}
