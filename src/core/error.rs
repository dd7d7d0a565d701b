//! Error taxonomy for retrieval
//!
//! Every failure is returned as a value so callers can tell configuration,
//! tier I/O, protocol, decode and transport problems apart.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid construction-time configuration
    Config,
    /// A cache tier failed to read or write its storage
    TierIo,
    /// The upstream violated the HTTP contract
    Protocol,
    /// The response body did not match the document shape
    Decode,
    /// The request never produced a response (connect, timeout, ...)
    Transport,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("client identifier must not be empty")]
    MissingClientId,

    #[error("client identifier '{0}' is not a valid header value")]
    InvalidClientId(String),

    #[error("{tier} tier: I/O failure on {path:?}: {source}")]
    TierIo {
        tier: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{tier} tier: failed to encode {path:?}: {source}")]
    TierEncode {
        tier: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("upstream response is missing the '{0}' header")]
    MissingHeader(&'static str),

    #[error("upstream response has an invalid '{header}' header '{value}': {source}")]
    InvalidHeader {
        header: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("upstream answered with status {0}")]
    UpstreamStatus(u16),

    #[error("upstream answered 304 Not Modified but no prior entry was held")]
    UnexpectedNotModified,

    #[error("failed to decode the response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("request to upstream failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::MissingClientId | Error::InvalidClientId(_) => ErrorCategory::Config,
            Error::TierIo { .. } | Error::TierEncode { .. } => ErrorCategory::TierIo,
            Error::MissingHeader(_)
            | Error::InvalidHeader { .. }
            | Error::UpstreamStatus(_)
            | Error::UnexpectedNotModified => ErrorCategory::Protocol,
            Error::Decode(_) => ErrorCategory::Decode,
            Error::Transport(_) => ErrorCategory::Transport,
        }
    }
}
