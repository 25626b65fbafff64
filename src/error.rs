//! Error types for igcflow.
//!
//! All errors are represented by the `IgcError` enum. The first three variants
//! form the invocation taxonomy (missing parameter, malformed JSON, transport
//! failure); the rest cover configuration and host-side plumbing.

use std::{collections::BTreeMap, io::ErrorKind};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all igcflow operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum IgcError {
    /// A required parameter resolved to empty or absent.
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// Malformed embedded JSON in a query/details/update field, or an
    /// unparseable URL.
    #[error("parse error: {0}")]
    Parse(String),

    /// The REST client reported a failure or a non-success status code.
    #[error("{}", transport_message(.status, .message))]
    Transport {
        status: Option<u16>,
        headers: BTreeMap<String, String>,
        message: String,
    },

    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// Engine-level errors (startup, deploy, routing).
    #[error("{0}")]
    Engine(String),

    /// Node definition errors.
    #[error("{0}")]
    Node(String),

    /// Data conversion errors.
    #[error("{0}")]
    Convert(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),

    /// Message queue errors.
    #[error("{0}")]
    Queue(String),
}

fn transport_message(
    status: &Option<u16>,
    message: &str,
) -> String {
    match status {
        Some(code) => format!("unsuccessful request {}: {}", code, message),
        None => format!("transport error: {}", message),
    }
}

impl IgcError {
    /// Transport error carrying a status code and the response headers.
    pub fn status(
        code: u16,
        headers: BTreeMap<String, String>,
        message: impl Into<String>,
    ) -> Self {
        IgcError::Transport {
            status: Some(code),
            headers,
            message: message.into(),
        }
    }

    /// Transport error without a response (connection refused, timeout, ...).
    pub fn transport(message: impl Into<String>) -> Self {
        IgcError::Transport {
            status: None,
            headers: BTreeMap::new(),
            message: message.into(),
        }
    }

    /// Name of the error category, used as the `kind` of error reports.
    pub fn kind(&self) -> &'static str {
        match self {
            IgcError::MissingParameter(_) => "missing_parameter",
            IgcError::Parse(_) => "parse_error",
            IgcError::Transport { .. } => "transport_error",
            IgcError::Config(_) => "config",
            IgcError::Engine(_) => "engine",
            IgcError::Node(_) => "node",
            IgcError::Convert(_) => "convert",
            IgcError::IoError(_) => "io",
            IgcError::Queue(_) => "queue",
        }
    }

    /// HTTP status of a transport error, if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            IgcError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Response headers of a transport error.
    pub fn headers(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            IgcError::Transport { headers, .. } => Some(headers),
            _ => None,
        }
    }

    /// True for errors detected before any network call was issued.
    pub fn is_pre_dispatch(&self) -> bool {
        matches!(self, IgcError::MissingParameter(_) | IgcError::Parse(_))
    }
}

impl From<IgcError> for String {
    fn from(val: IgcError) -> Self {
        val.to_string()
    }
}

impl From<std::io::Error> for IgcError {
    fn from(error: std::io::Error) -> Self {
        IgcError::IoError(error.to_string())
    }
}

impl From<IgcError> for std::io::Error {
    fn from(val: IgcError) -> Self {
        #[allow(clippy::io_other_error)]
        std::io::Error::new(ErrorKind::Other, val.to_string())
    }
}

impl From<serde_json::Error> for IgcError {
    fn from(error: serde_json::Error) -> Self {
        IgcError::Convert(error.to_string())
    }
}

impl From<jsonschema::ValidationError<'_>> for IgcError {
    fn from(error: jsonschema::ValidationError<'_>) -> Self {
        IgcError::Config(error.to_string())
    }
}

impl From<toml::de::Error> for IgcError {
    fn from(error: toml::de::Error) -> Self {
        IgcError::Config(error.to_string())
    }
}

impl From<reqwest::Error> for IgcError {
    fn from(error: reqwest::Error) -> Self {
        IgcError::Transport {
            status: error.status().map(|s| s.as_u16()),
            headers: BTreeMap::new(),
            message: error.to_string(),
        }
    }
}
