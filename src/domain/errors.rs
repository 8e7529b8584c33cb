use hyper::StatusCode;
use thiserror::Error;

/// No usable URL could be derived from the invocation and stored credentials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("no valid URL: pass --url, or set a base URL and give a path")]
    NoValidUrl,
}

/// Problems detected while turning user input into a wire request.
///
/// Every variant is raised before any network I/O happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported HTTP method: '{0}'")]
    UnsupportedMethod(String),

    #[error("invalid data '{0}': expected key=value")]
    InvalidDataPair(String),

    #[error("invalid value for header '{0}'")]
    InvalidHeader(String),

    #[error("request body could not be encoded: {0}")]
    InvalidBody(String),
}

/// The request never produced a response (DNS, refused connection, TLS, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("URLError: {reason}")]
pub struct TransportError {
    pub reason: String,
}

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("HTTPError: {} {reason}", .status.as_u16())]
    Http { status: StatusCode, reason: String },

    #[error("login failed: no Authorization header in response")]
    NoAuthHeader,
}
