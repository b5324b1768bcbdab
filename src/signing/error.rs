//! Signing error types.
//!
//! Errors raised while building the SigV4 authorization for a request.

use thiserror::Error;

/// Errors that can occur during AWS Signature V4 signing.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The signing parameters are missing a credential component.
    ///
    /// # Examples
    ///
    /// ```
    /// use integrations_ses_outbound::signing::SigningError;
    ///
    /// let error = SigningError::MissingCredential {
    ///     field: "access_key_id".to_string(),
    /// };
    /// assert_eq!(error.to_string(), "Missing credential component: access_key_id");
    /// ```
    #[error("Missing credential component: {field}")]
    MissingCredential {
        /// Which component is empty.
        field: String,
    },

    /// A value could not be used as an HTTP header value.
    ///
    /// # Examples
    ///
    /// ```
    /// use integrations_ses_outbound::signing::SigningError;
    ///
    /// let error = SigningError::InvalidHeaderValue {
    ///     header: "host".to_string(),
    /// };
    /// assert_eq!(error.to_string(), "Invalid value for header: host");
    /// ```
    #[error("Invalid value for header: {header}")]
    InvalidHeaderValue {
        /// The header whose value was rejected.
        header: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_error() {
        let error = SigningError::MissingCredential {
            field: "secret_access_key".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Missing credential component: secret_access_key"
        );
    }

    #[test]
    fn test_invalid_header_value_error() {
        let error = SigningError::InvalidHeaderValue {
            header: "host".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid value for header: host");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SigningError>();
    }
}
