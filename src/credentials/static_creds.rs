//! Static credentials provider.

use super::{AwsCredentials, CredentialProvider};
use crate::credentials::error::CredentialError;
use async_trait::async_trait;
use std::fmt;

/// Provider that returns one fixed set of credentials.
///
/// This is what `SesConfigBuilder::credentials` installs when the caller
/// passes an access key id and secret directly.
#[derive(Clone)]
pub struct StaticCredentialProvider {
    credentials: AwsCredentials,
}

impl StaticCredentialProvider {
    /// Create a new static credentials provider.
    pub fn new(credentials: AwsCredentials) -> Self {
        Self { credentials }
    }

    /// Create a provider from a key id and secret.
    pub fn from_keys(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self::new(AwsCredentials::new(access_key_id, secret_access_key))
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn credentials(&self) -> Result<AwsCredentials, CredentialError> {
        self.credentials.validate()?;
        Ok(self.credentials.clone())
    }
}

impl fmt::Debug for StaticCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentialProvider")
            .field("credentials", &self.credentials)
            .finish()
    }
}
