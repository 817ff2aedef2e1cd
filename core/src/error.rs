use std::fmt;
use std::sync::Arc;
use thiserror::Error;

type Source = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for credsign operations.
///
/// `Error` is cheap to clone so that a single failed refresh can be handed to
/// every caller that waited on it.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<Source>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A caller supplied parameter is out of its accepted range
    InvalidParameter,

    /// The private key is missing or malformed, or signing failed
    Signing,

    /// The request could not be sent or the service answered with a non-2xx status
    RefreshTransport,

    /// The response body has an unexpected shape or unparsable values
    MalformedResponse,

    /// A required field is absent (or null) in the response body
    FieldMissing,

    /// Configuration error (missing fields, invalid values)
    ConfigInvalid,

    /// Unexpected errors (I/O, encoding, etc.)
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        let source: anyhow::Error = source.into();
        let source: Box<dyn std::error::Error + Send + Sync + 'static> = source.into();
        self.source = Some(Arc::from(source));
        self
    }

    /// Prefix the message with `context`, keeping kind and source.
    pub fn with_context(mut self, context: impl fmt::Display) -> Self {
        self.message = format!("{context}: {}", self.message);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message without its source chain.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this error came from the shape of a service response.
    pub fn is_response_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::MalformedResponse | ErrorKind::FieldMissing
        )
    }

    /// Check if issuing the same call again may succeed.
    ///
    /// Only transport failures are transient; every other kind fails the same
    /// way until the input changes.
    pub fn is_temporary(&self) -> bool {
        self.kind == ErrorKind::RefreshTransport
    }
}

// Convenience constructors
impl Error {
    /// Create an invalid parameter error
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParameter, message)
    }

    /// Create a signing error
    pub fn signing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Signing, message)
    }

    /// Create a refresh transport error
    pub fn refresh_transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RefreshTransport, message)
    }

    /// Create a malformed response error
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, message)
    }

    /// Create a field missing error
    pub fn field_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FieldMissing, message)
    }

    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidParameter => write!(f, "invalid parameter"),
            ErrorKind::Signing => write!(f, "signing failed"),
            ErrorKind::RefreshTransport => write!(f, "refresh transport failed"),
            ErrorKind::MalformedResponse => write!(f, "malformed response"),
            ErrorKind::FieldMissing => write!(f, "missing field"),
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<std::fmt::Error> for Error {
    fn from(err: std::fmt::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::config_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUriParts> for Error {
    fn from(err: http::uri::InvalidUriParts) -> Self {
        Self::config_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(anyhow::Error::from(err))
    }
}
