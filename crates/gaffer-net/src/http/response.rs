//! HTTP response types.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use super::stream::LineStream;
use crate::error::{GafferError, Result};

/// A response from the Gaffer service.
///
/// The body is not read until one of the body accessors is called.
pub struct GafferResponse {
    inner: reqwest::Response,
}

impl GafferResponse {
    /// Create from a reqwest response.
    pub(crate) fn from_reqwest(response: reqwest::Response) -> Self {
        Self { inner: response }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Check if the status is exactly 200, the only status the service
    /// uses for a successful operation.
    pub fn is_success(&self) -> bool {
        self.inner.status() == http::StatusCode::OK
    }

    /// Get the response headers.
    pub fn headers(&self) -> &http::HeaderMap {
        self.inner.headers()
    }

    /// Get a specific header value.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.inner
            .headers()
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Get the Content-Type header value.
    pub fn content_type(&self) -> Option<&str> {
        self.header(http::header::CONTENT_TYPE.as_str())
    }

    /// Get the final URL after redirects.
    pub fn url(&self) -> &str {
        self.inner.url().as_str()
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        Ok(self.inner.text().await?)
    }

    /// Get the response body as raw bytes.
    pub async fn bytes(self) -> Result<Bytes> {
        Ok(self.inner.bytes().await?)
    }

    /// Parse the response body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.inner.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Read the body lazily, one line at a time.
    pub fn lines(self) -> LineStream {
        LineStream::new(self.inner)
    }

    /// Fail with [`GafferError::Service`] unless the status is 200.
    ///
    /// The body of a failed response is read in full for the error. A failure
    /// while reading it is reported as a transport error.
    pub(crate) async fn ensure_ok(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }

        let status = self.status();
        let url = self.url().to_string();
        let body = self.text().await?;
        tracing::warn!(
            target: "gaffer_net::client",
            status,
            url = %url,
            "Gaffer request failed: {}",
            body
        );
        Err(GafferError::Service { status, body })
    }
}

impl std::fmt::Debug for GafferResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GafferResponse")
            .field("status", &self.status())
            .field("url", &self.url())
            .finish()
    }
}
