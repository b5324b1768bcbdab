//! Environment variable credentials provider.

use super::{AwsCredentials, CredentialProvider};
use crate::credentials::error::CredentialError;
use async_trait::async_trait;
use std::env;

/// Environment variable holding the access key id.
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the secret access key.
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Credentials provider that reads from environment variables.
///
/// Reads `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY` at every call.
/// Both must be set and non-empty.
///
/// # Example
///
/// ```no_run
/// use integrations_ses_outbound::credentials::{CredentialProvider, EnvironmentCredentialProvider};
///
/// # async {
/// let provider = EnvironmentCredentialProvider::new();
/// let credentials = provider.credentials().await?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// # };
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvironmentCredentialProvider;

impl EnvironmentCredentialProvider {
    /// Create a new environment credentials provider.
    pub fn new() -> Self {
        Self
    }
}

fn read_var(name: &str) -> Result<String, CredentialError> {
    let value = env::var(name).map_err(|_| CredentialError::Missing {
        message: format!("{} environment variable not set", name),
    })?;

    if value.is_empty() {
        return Err(CredentialError::Invalid {
            message: format!("{} is empty", name),
        });
    }

    Ok(value)
}

#[async_trait]
impl CredentialProvider for EnvironmentCredentialProvider {
    async fn credentials(&self) -> Result<AwsCredentials, CredentialError> {
        let access_key_id = read_var(AWS_ACCESS_KEY_ID)?;
        let secret_access_key = read_var(AWS_SECRET_ACCESS_KEY)?;
        Ok(AwsCredentials::new(access_key_id, secret_access_key))
    }
}
