//! HTTP capability used to reach the verification service.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{ConfigError, TransportError};

/// Default connection timeout. The overall request timeout is configured per engine.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends a form-encoded POST and hands back the response body unread.
///
/// Implementations must be safe to share between concurrent callers.
#[async_trait]
pub trait FormPoster: Send + Sync {
    async fn post_form(
        &self,
        url: &str,
        fields: &[(&'static str, String)],
    ) -> Result<Box<dyn ResponseBody>, TransportError>;
}

/// A response whose body has not been read yet.
///
/// Dropping it releases the underlying connection whether or not the body
/// was read.
#[async_trait]
pub trait ResponseBody: Send {
    async fn read_all(&mut self) -> Result<String, TransportError>;
}

/// Production [`FormPoster`] backed by a pooled `reqwest` client.
#[derive(Clone)]
pub struct HttpFormPoster {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
}

impl HttpFormPoster {
    /// Build a client whose requests give up after `timeout`.
    ///
    /// A zero `timeout` disables both the request and the connect timeout.
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if !timeout.is_zero() {
            builder = builder
                .timeout(timeout)
                .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout));
        }
        let http_client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl FormPoster for HttpFormPoster {
    async fn post_form(
        &self,
        url: &str,
        fields: &[(&'static str, String)],
    ) -> Result<Box<dyn ResponseBody>, TransportError> {
        let response = self.http_client.post(url).form(fields).send().await?;
        if !response.status().is_success() {
            // The body still decides the outcome; a non-JSON error page
            // surfaces as a parse failure with the raw text attached.
            tracing::debug!(status = %response.status(), "verification endpoint returned non-success status");
        }
        Ok(Box::new(HttpResponseBody {
            response: Some(response),
        }))
    }
}

struct HttpResponseBody {
    response: Option<reqwest::Response>,
}

#[async_trait]
impl ResponseBody for HttpResponseBody {
    async fn read_all(&mut self) -> Result<String, TransportError> {
        let response = self
            .response
            .take()
            .ok_or_else(|| TransportError::Body("response body already consumed".into()))?;
        response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))
    }
}
