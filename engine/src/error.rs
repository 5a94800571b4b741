use std::time::Duration;
use thiserror::Error;

/// Why a token was not accepted.
///
/// Transport-class variants (`Transport`, `BodyRead`, `InvalidJson`) mean the
/// service's verdict could not be obtained. All other variants are policy
/// rejections of a verdict that was obtained, and carry the raw response body.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VerificationError {
    #[error("error posting to verification endpoint: '{0}'")]
    Transport(TransportError),

    #[error("couldn't read response body: '{0}'")]
    BodyRead(TransportError),

    #[error("invalid response body json: '{reason}'")]
    InvalidJson { reason: String, body: String },

    #[error("invalid response action '{received}', while expecting '{expected}'")]
    ActionMismatch {
        received: String,
        expected: String,
        body: String,
    },

    #[error("received score '{score:.6}', while expecting minimum '{threshold:.6}'")]
    ScoreBelowMinimum {
        score: f32,
        threshold: f32,
        body: String,
    },

    #[error("remote error codes: [{}]", join_codes(.codes))]
    RemoteErrorCodes { codes: Vec<String>, body: String },

    #[error("{}", invalid_solution_message(.caller_address_sent))]
    InvalidSolution {
        caller_address_sent: bool,
        body: String,
    },

    #[error("invalid response hostname '{received}', while expecting '{expected}'")]
    HostnameMismatch {
        received: String,
        expected: String,
        body: String,
    },

    #[error("invalid response app package name '{received}', while expecting '{expected}'")]
    AppPackageMismatch {
        received: String,
        expected: String,
        body: String,
    },

    #[error(
        "time spent in resolving challenge '{:.6}s', while expecting maximum '{:.6}s'",
        .elapsed.as_secs_f64(),
        .max.as_secs_f64()
    )]
    ResponseTooSlow {
        elapsed: Duration,
        max: Duration,
        body: String,
    },
}

fn join_codes(codes: &[String]) -> String {
    codes.join(", ")
}

fn invalid_solution_message(caller_address_sent: &bool) -> &'static str {
    if *caller_address_sent {
        "invalid challenge solution or remote IP"
    } else {
        "invalid challenge solution"
    }
}

/// Fieldless discriminant of [`VerificationError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    BodyRead,
    InvalidJson,
    ActionMismatch,
    ScoreBelowMinimum,
    RemoteErrorCodes,
    InvalidSolution,
    HostnameMismatch,
    AppPackageMismatch,
    ResponseTooSlow,
}

impl VerificationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::BodyRead(_) => ErrorKind::BodyRead,
            Self::InvalidJson { .. } => ErrorKind::InvalidJson,
            Self::ActionMismatch { .. } => ErrorKind::ActionMismatch,
            Self::ScoreBelowMinimum { .. } => ErrorKind::ScoreBelowMinimum,
            Self::RemoteErrorCodes { .. } => ErrorKind::RemoteErrorCodes,
            Self::InvalidSolution { .. } => ErrorKind::InvalidSolution,
            Self::HostnameMismatch { .. } => ErrorKind::HostnameMismatch,
            Self::AppPackageMismatch { .. } => ErrorKind::AppPackageMismatch,
            Self::ResponseTooSlow { .. } => ErrorKind::ResponseTooSlow,
        }
    }

    /// True when the service's verdict could not be obtained or understood.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::BodyRead(_) | Self::InvalidJson { .. }
        )
    }

    /// Error codes reported by the service. Only set for `RemoteErrorCodes`.
    pub fn error_codes(&self) -> Option<&[String]> {
        match self {
            Self::RemoteErrorCodes { codes, .. } => Some(codes),
            _ => None,
        }
    }

    /// The raw response body, when one was received.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Transport(_) | Self::BodyRead(_) => None,
            Self::InvalidJson { body, .. }
            | Self::ActionMismatch { body, .. }
            | Self::ScoreBelowMinimum { body, .. }
            | Self::RemoteErrorCodes { body, .. }
            | Self::InvalidSolution { body, .. }
            | Self::HostnameMismatch { body, .. }
            | Self::AppPackageMismatch { body, .. }
            | Self::ResponseTooSlow { body, .. } => Some(body),
        }
    }
}

/// Failure of the injected HTTP capability.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Request(String),

    #[error("{0}")]
    Body(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            Self::Body(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

/// Failure to build an engine.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("verification secret cannot be blank")]
    BlankSecret,

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
