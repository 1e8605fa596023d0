//! HTTP transport for provider calls
//!
//! The client only ever POSTs a JSON body, so the transport surface is a
//! single `post_json`. A network failure or a non-2xx status comes back as
//! `Error::Http`; status is 0 and body `None` when no response arrived.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::error::{Error, Result};

/// Raw provider response: status plus undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Boxed future returned by `HttpTransport::post_json`.
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send + 'a>>;

/// Injected HTTP collaborator.
pub trait HttpTransport: Send + Sync {
    /// POST `body` as JSON to `url` with the given extra headers.
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        headers: &'a [(&'static str, String)],
        body: &'a serde_json::Value,
    ) -> TransportFuture<'a>;
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Transport with the default 30s request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http {
                status: 0,
                body: None,
                message: format!("building HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing client (shared connection pool, custom TLS, ...).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        headers: &'a [(&'static str, String)],
        body: &'a serde_json::Value,
    ) -> TransportFuture<'a> {
        Box::pin(async move {
            let header_map = build_headers(headers)?;

            let response = self
                .client
                .post(url)
                .headers(header_map)
                .json(body)
                .send()
                .await
                .map_err(|e| Error::Http {
                    status: 0,
                    body: None,
                    message: format!("request to '{url}' failed: {e}"),
                })?;

            let status = response.status();
            let text = response.text().await.map_err(|e| Error::Http {
                status: status.as_u16(),
                body: None,
                message: format!("reading response from '{url}' failed: {e}"),
            })?;
            debug!(url, status = status.as_u16(), "provider responded");

            if !status.is_success() {
                return Err(Error::Http {
                    status: status.as_u16(),
                    body: Some(text),
                    message: format!("'{url}' returned {status}"),
                });
            }

            Ok(HttpResponse {
                status: status.as_u16(),
                body: text,
            })
        })
    }
}

fn build_headers(headers: &[(&'static str, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::InvalidArgument(format!("invalid header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::InvalidArgument(format!("invalid value for header {name}: {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}
