//! Error types for the SES outbound client.
//!
//! The client does not classify or retry failures. Each variant records
//! which stage failed (configuration, credentials, signing, serialization,
//! transport) and carries the underlying message. An HTTP error status from
//! SES is not an error here: it is returned as a normal
//! [`SesResponse`](crate::http::SesResponse) for the caller to inspect.
//!
//! # Examples
//!
//! ```rust
//! use integrations_ses_outbound::error::SesError;
//!
//! fn describe(error: &SesError) -> &'static str {
//!     match error {
//!         SesError::Transport { .. } | SesError::Timeout { .. } => "network",
//!         SesError::Credential { .. } => "credentials",
//!         _ => "other",
//!     }
//! }
//! ```

use thiserror::Error;

use crate::config::ConfigError;
use crate::credentials::CredentialError;
use crate::signing::SigningError;

/// Result type alias for SES operations.
pub type SesResult<T> = Result<T, SesError>;

/// Top-level error type for the SES outbound client.
#[derive(Debug, Error)]
pub enum SesError {
    /// The client is misconfigured (missing region, bad endpoint URL, ...).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// Credentials could not be resolved.
    #[error("Credential error: {message}")]
    Credential {
        /// Description of the credential error.
        message: String,
    },

    /// AWS Signature V4 signing failed.
    #[error("Signing error: {message}")]
    Signing {
        /// Description of the signing error.
        message: String,
    },

    /// The request payload could not be serialized.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
    },

    /// HTTP communication with SES failed.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport error.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The request timed out.
    #[error("Timeout: {message}")]
    Timeout {
        /// Description of the timeout.
        message: String,
    },
}

impl SesError {
    /// Create a transport error without an underlying source.
    pub fn transport(message: impl Into<String>) -> Self {
        SesError::Transport {
            message: message.into(),
            source: None,
        }
    }
}

impl From<ConfigError> for SesError {
    fn from(err: ConfigError) -> Self {
        SesError::Configuration {
            message: err.to_string(),
        }
    }
}

impl From<CredentialError> for SesError {
    fn from(err: CredentialError) -> Self {
        SesError::Credential {
            message: err.to_string(),
        }
    }
}

impl From<SigningError> for SesError {
    fn from(err: SigningError) -> Self {
        SesError::Signing {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SesError {
    fn from(err: serde_json::Error) -> Self {
        SesError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for SesError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SesError::Timeout {
                message: err.to_string(),
            }
        } else {
            SesError::Transport {
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        }
    }
}
