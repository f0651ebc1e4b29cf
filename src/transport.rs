//! Transport collaborator: anything that can carry a [`Request`] to the store
//! and hand back its status and body.

use crate::request::{Body, Method, Request};
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Status and body returned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    /// A `200 OK` carrying `body`.
    pub fn ok<S: Into<String>>(body: S) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid store URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{method} {path} failed: {source}")]
    Network {
        method: Method,
        path: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Sends one request and waits for its completion.
pub trait Transport {
    fn send(&self, request: &Request) -> Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        (**self).send(request)
    }
}

/// Blocking HTTP transport rooted at the store's base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for `base_url`. No request timeout is applied.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let base_url = validate_base_url(base_url)?;
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        let method = request.endpoint.method();
        let path = request.endpoint.path();
        let url = self.url_for(path);
        debug!(%method, %url, "sending store request");

        let builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        let builder = match &request.body {
            Body::Empty => builder,
            Body::Text(text) => builder
                .header(CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(text.clone()),
            Body::Json(payload) => builder.json(payload),
        };

        let network = move |source: reqwest::Error| TransportError::Network {
            method,
            path,
            source,
        };
        let response = builder.send().map_err(network)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(network)?;
        debug!(status, bytes = body.len(), "store responded");
        Ok(Response { status, body })
    }
}

/// Accept `http`/`https` URLs and drop any trailing slash.
pub fn validate_base_url(raw: &str) -> Result<String, TransportError> {
    let invalid = |reason: String| TransportError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    Ok(raw.trim_end_matches('/').to_string())
}
