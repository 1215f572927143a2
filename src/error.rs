use std::fmt;
use std::path::PathBuf;

/// How many journal entries a verification expects to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    AtLeastOnce,
    Exactly(usize),
}

impl Expectation {
    /// Whether `actual` matching requests satisfy this expectation.
    pub fn is_met_by(&self, actual: usize) -> bool {
        match self {
            Expectation::AtLeastOnce => actual >= 1,
            Expectation::Exactly(n) => actual == *n,
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expectation::AtLeastOnce => write!(f, "at least one request"),
            Expectation::Exactly(1) => write!(f, "exactly 1 request"),
            Expectation::Exactly(n) => write!(f, "exactly {n} requests"),
        }
    }
}

/// A journal query did not return the expected number of requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Expected {expected} matching {filter}, but found {actual}")]
pub struct VerificationError {
    pub expected: Expectation,
    pub actual: usize,
    /// JSON rendering of the request filter that was queried.
    pub filter: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Invalid admin URL '{url}': {detail}")]
    InvalidUrl { url: String, detail: String },

    #[error("Cannot connect to {url}: {source}")]
    ConnectionFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response from {url}: {detail}")]
    Decode { url: String, detail: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(Box<dyn std::error::Error + Send + Sync>),

    #[error("Error in config {}: {detail}", path.display())]
    Config { path: PathBuf, detail: String },

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdminError {
    /// Stable identifier for the error kind, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            AdminError::InvalidUrl { .. } => "invalid_url",
            AdminError::ConnectionFailed { .. } => "connection_refused",
            AdminError::HttpStatus { .. } => "http_status",
            AdminError::Decode { .. } => "parse_error",
            AdminError::Client(_) => "client_error",
            AdminError::Config { .. } => "config_error",
            AdminError::Verification(_) => "verification_failed",
            AdminError::Io(_) => "io_error",
        }
    }

    /// The admin endpoint the failing request targeted, when known.
    pub fn url(&self) -> Option<&str> {
        match self {
            AdminError::InvalidUrl { url, .. } => Some(url),
            AdminError::ConnectionFailed { url, .. } => Some(url),
            AdminError::HttpStatus { url, .. } => Some(url),
            AdminError::Decode { url, .. } => Some(url),
            _ => None,
        }
    }
}
