//! Common error types used throughout subscout.
//!
//! This module provides a unified error type covering configuration
//! validation, engine lifecycle misuse, and provider faults.

/// Common error type for subscout.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A language code outside the ISO-639-1 set was supplied.
    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),

    /// A provider name not present in the registry was supplied.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// A provider misbehaved while listing or downloading.
    #[error("Provider {provider} failed: {message}")]
    Provider { provider: String, message: String },

    /// An engine operation was called in the wrong lifecycle state.
    #[error("Engine is {actual}, expected {expected}")]
    InvalidState { expected: String, actual: String },

    /// A stop task (or other unsubmittable task) was handed to `submit`.
    #[error("Only list and download tasks may be submitted")]
    WrongTask,

    /// A single download attempt failed; recoverable by candidate fallback.
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new InvalidLanguage error.
    pub fn invalid_language<S: Into<String>>(code: S) -> Self {
        Self::InvalidLanguage(code.into())
    }

    /// Create a new UnknownProvider error.
    pub fn unknown_provider<S: Into<String>>(name: S) -> Self {
        Self::UnknownProvider(name.into())
    }

    /// Create a new Provider error.
    pub fn provider<P: Into<String>, M: Into<String>>(provider: P, message: M) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a new InvalidState error.
    pub fn invalid_state<E: Into<String>, A: Into<String>>(expected: E, actual: A) -> Self {
        Self::InvalidState {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a new DownloadFailed error.
    pub fn download_failed<S: Into<String>>(msg: S) -> Self {
        Self::DownloadFailed(msg.into())
    }

    /// Create a new Http error.
    pub fn http<S: Into<String>>(msg: S) -> Self {
        Self::Http(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
