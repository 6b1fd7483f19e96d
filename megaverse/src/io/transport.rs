//! Transport abstraction for the Megaverse API.
//!
//! The [`Transport`] trait decouples pacing and retry from the HTTP stack.
//! Tests use scripted transports that return queued responses without opening
//! sockets.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Url;
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::core::request::{ApiRequest, ApiResponse, Method};

/// A single exchange that did not produce a usable response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connect, send or timeout failure. Worth retrying.
    #[error("network error: {0}")]
    Network(String),
    /// The request could not be built, so no attempt reached the network.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The server answered but the body could not be read.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl TransportError {
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// One outbound exchange with the remote API.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Transport over a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("parse base url {base_url:?}"))?;
        if base_url.cannot_be_a_base() {
            bail!("base url {base_url} cannot carry a path");
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self { client, base_url })
    }

    /// Absolute URL for `request`. Each path segment is percent-encoded.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                TransportError::InvalidRequest(format!("base url {} has no path", self.base_url))
            })?
            .pop_if_empty()
            .extend(&request.segments);
        Ok(url)
    }
}

impl Transport for HttpTransport {
    #[instrument(skip_all, fields(method = %request.method, path = %request.path()))]
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url_for(request)?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|err| {
            if err.is_builder() {
                TransportError::InvalidRequest(err.to_string())
            } else {
                TransportError::Network(err.to_string())
            }
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| TransportError::MalformedResponse(err.to_string()))?;
        debug!(status, body_len = body.len(), "response received");
        Ok(ApiResponse { status, body })
    }
}
