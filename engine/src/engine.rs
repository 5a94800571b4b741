//! The verification engine.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use siteverify_types::{
    PolicyOptions, ProtocolVersion, VerificationRequest, VerificationResult, VERIFY_ENDPOINT,
};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{ConfigError, VerificationError};
use crate::policy::{self, Verdict};
use crate::transport::{FormPoster, HttpFormPoster};

/// Verifies challenge tokens against the remote service.
///
/// Configuration is fixed at construction. The engine holds no per-call
/// state, so one instance can be shared (e.g. behind an `Arc`) by any number
/// of concurrent callers.
pub struct VerifyEngine {
    secret: String,
    version: ProtocolVersion,
    endpoint: String,
    timeout: Duration,
    transport: Arc<dyn FormPoster>,
    clock: Arc<dyn Clock>,
}

impl VerifyEngine {
    /// Create an engine talking to the fixed verification endpoint.
    ///
    /// Fails without touching the network if `secret` is blank. A zero
    /// `timeout` means requests never time out; [`timeout`](Self::timeout)
    /// still reports it as given.
    pub fn new(
        secret: impl Into<String>,
        version: ProtocolVersion,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ConfigError::BlankSecret);
        }
        let transport = HttpFormPoster::new(timeout)?;
        Ok(Self {
            secret,
            version,
            endpoint: VERIFY_ENDPOINT.to_string(),
            timeout,
            transport: Arc::new(transport),
            clock: Arc::new(SystemClock),
        })
    }

    /// Create an engine from a loaded configuration file.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.secret.clone(), config.version, config.timeout())?
            .with_endpoint(config.endpoint.clone()))
    }

    /// Target a different verification server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replace the HTTP capability.
    pub fn with_transport(mut self, transport: Arc<dyn FormPoster>) -> Self {
        self.transport = transport;
        self
    }

    /// Replace the time source used for the response-age check.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Verify a token with no extra policy.
    ///
    /// Rejects on remote error codes or an unsuccessful verdict. Under V3 the
    /// default score threshold still applies.
    pub async fn verify(&self, token: &str) -> Result<VerificationResult, VerificationError> {
        self.verify_with_options(token, &PolicyOptions::default())
            .await
    }

    /// Verify a token and apply `options` to the service's verdict.
    ///
    /// Score and action options are ignored under V2.
    pub async fn verify_with_options(
        &self,
        token: &str,
        options: &PolicyOptions,
    ) -> Result<VerificationResult, VerificationError> {
        let request = self.build_request(token, options);
        let raw_body = self.send(&request).await?;

        let result = VerificationResult::from_json(&raw_body).map_err(|e| {
            warn!(error = %e, "verification response is not valid JSON");
            VerificationError::InvalidJson {
                reason: e.to_string(),
                body: raw_body.clone(),
            }
        })?;

        let verdict = Verdict {
            result: &result,
            raw_body: &raw_body,
            caller_address_sent: request.caller_address().is_some(),
        };
        if let Err(e) = policy::evaluate(&verdict, options, self.version, self.clock.as_ref()) {
            debug!(kind = ?e.kind(), reason = %e, "challenge token rejected");
            return Err(e);
        }

        debug!(
            version = %self.version,
            hostname = result.hostname(),
            score = result.score(),
            "challenge token accepted"
        );
        Ok(result)
    }

    fn build_request(&self, token: &str, options: &PolicyOptions) -> VerificationRequest {
        VerificationRequest::new(
            self.secret.as_str(),
            token,
            options.caller_address().map(str::to_string),
        )
    }

    /// POST the request and read the whole body. The response is dropped,
    /// releasing its connection, on every path out of this function.
    async fn send(&self, request: &VerificationRequest) -> Result<String, VerificationError> {
        debug!(
            endpoint = %self.endpoint,
            with_caller_address = request.caller_address().is_some(),
            "posting challenge token for verification"
        );

        let mut response = self
            .transport
            .post_form(&self.endpoint, &request.form_fields())
            .await
            .map_err(|e| {
                warn!(error = %e, "verification request failed");
                VerificationError::Transport(e)
            })?;

        response.read_all().await.map_err(|e| {
            warn!(error = %e, "failed to read verification response");
            VerificationError::BodyRead(e)
        })
    }
}

impl fmt::Debug for VerifyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyEngine")
            .field("secret", &"<redacted>")
            .field("version", &self.version)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
