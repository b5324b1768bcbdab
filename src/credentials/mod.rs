//! AWS credentials for request signing.
//!
//! A request is signed with one access key id and its secret. Credentials
//! come from a [`CredentialProvider`]:
//!
//! - [`StaticCredentialProvider`]: fixed credentials passed in by the caller
//! - [`EnvironmentCredentialProvider`]: `AWS_ACCESS_KEY_ID` and
//!   `AWS_SECRET_ACCESS_KEY`
//!
//! Providers are asked once per send; nothing is cached or refreshed.
//!
//! # Example
//!
//! ```
//! use integrations_ses_outbound::credentials::{
//!     AwsCredentials, CredentialProvider, StaticCredentialProvider,
//! };
//!
//! # tokio_test::block_on(async {
//! let provider = StaticCredentialProvider::new(AwsCredentials::new("AKIDEXAMPLE", "secret"));
//! let credentials = provider.credentials().await.unwrap();
//! assert_eq!(credentials.access_key_id(), "AKIDEXAMPLE");
//! # });
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

pub mod env;
pub mod error;
pub mod static_creds;

pub use env::EnvironmentCredentialProvider;
pub use error::CredentialError;
pub use static_creds::StaticCredentialProvider;

/// An AWS access key id and its secret access key.
///
/// The secret is held in a `SecretString`: it is zeroized on drop and
/// redacted from `Debug` output.
///
/// # Example
///
/// ```
/// use integrations_ses_outbound::credentials::AwsCredentials;
///
/// let credentials = AwsCredentials::new("AKIDEXAMPLE", "secret");
/// assert_eq!(credentials.access_key_id(), "AKIDEXAMPLE");
/// assert!(!format!("{:?}", credentials).contains("\"secret\""));
/// ```
#[derive(Clone)]
pub struct AwsCredentials {
    access_key_id: String,
    secret_access_key: SecretString,
}

impl AwsCredentials {
    /// Create new AWS credentials.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::new(secret_access_key.into()),
        }
    }

    /// Get the access key ID.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Get the secret access key.
    ///
    /// # Security
    ///
    /// This exposes the secret. Do not log or persist the returned value.
    pub fn secret_access_key(&self) -> &str {
        self.secret_access_key.expose_secret()
    }

    /// Check that neither component is empty.
    pub fn validate(&self) -> Result<(), CredentialError> {
        if self.access_key_id.is_empty() {
            return Err(CredentialError::Invalid {
                message: "access key id is empty".to_string(),
            });
        }
        if self.secret_access_key.expose_secret().is_empty() {
            return Err(CredentialError::Invalid {
                message: "secret access key is empty".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .finish()
    }
}

/// Source of credentials for signing.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Retrieve AWS credentials.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError` if credentials cannot be retrieved or are invalid.
    async fn credentials(&self) -> Result<AwsCredentials, CredentialError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_accessors() {
        let creds = AwsCredentials::new("AKID", "SECRET");
        assert_eq!(creds.access_key_id(), "AKID");
        assert_eq!(creds.secret_access_key(), "SECRET");
        assert!(creds.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = AwsCredentials::new("AKID", "SUPERSECRET");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("AKID"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("SUPERSECRET"));
    }

    #[test]
    fn test_validate_rejects_empty_parts() {
        assert!(matches!(
            AwsCredentials::new("", "SECRET").validate(),
            Err(CredentialError::Invalid { .. })
        ));
        assert!(matches!(
            AwsCredentials::new("AKID", "").validate(),
            Err(CredentialError::Invalid { .. })
        ));
    }
}
