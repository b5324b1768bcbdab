//! Configuration for the SES outbound client.
//!
//! - Region and endpoint
//! - Credential provider
//! - Request and connect timeouts
//! - User agent

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub mod error;

pub use error::ConfigError;

use crate::credentials::{CredentialProvider, EnvironmentCredentialProvider, StaticCredentialProvider};

/// Environment variable overriding the SES endpoint URL.
pub const AWS_ENDPOINT_URL_SES: &str = "AWS_ENDPOINT_URL_SES";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the SES client.
#[derive(Clone)]
pub struct SesConfig {
    /// AWS region (e.g., "us-east-1").
    pub region: String,

    /// Custom endpoint URL (VPC endpoint, LocalStack, test server).
    pub endpoint: Option<String>,

    /// Credential provider for signing.
    pub credentials_provider: Arc<dyn CredentialProvider + Send + Sync>,

    /// Timeout for the entire request.
    pub timeout: Duration,

    /// Timeout for establishing the connection.
    pub connect_timeout: Duration,

    /// Custom user agent string.
    pub user_agent: Option<String>,
}

impl SesConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_ses_outbound::config::SesConfig;
    ///
    /// let config = SesConfig::builder()
    ///     .region("us-east-1")
    ///     .credentials("AKIDEXAMPLE", "secret")
    ///     .build()?;
    /// # Ok::<(), integrations_ses_outbound::config::ConfigError>(())
    /// ```
    pub fn builder() -> SesConfigBuilder {
        SesConfigBuilder::default()
    }

    /// Create a configuration from environment variables.
    ///
    /// - `AWS_REGION` or `AWS_DEFAULT_REGION` for the region
    /// - `AWS_ENDPOINT_URL_SES` for an optional endpoint override
    /// - `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`, read at send time
    pub fn from_env() -> Result<Self, ConfigError> {
        let region = std::env::var("AWS_REGION")
            .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
            .map_err(|_| ConfigError::Environment {
                message: "AWS_REGION or AWS_DEFAULT_REGION must be set".to_string(),
            })?;

        let mut builder = Self::builder()
            .region(region)
            .credentials_provider(EnvironmentCredentialProvider::new());

        if let Some(endpoint) = std::env::var(AWS_ENDPOINT_URL_SES)
            .ok()
            .filter(|e| !e.is_empty())
        {
            builder = builder.endpoint(endpoint);
        }

        builder.build()
    }

    /// Get the SES endpoint URL for this configuration.
    ///
    /// Returns the custom endpoint if configured, otherwise
    /// `https://email.{region}.amazonaws.com`. Configure
    /// `endpoint("https://ses.{region}.amazonaws.com")` to sign and send to
    /// the `ses.{region}` host instead.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_ses_outbound::config::SesConfig;
    ///
    /// let config = SesConfig::builder()
    ///     .region("us-west-2")
    ///     .credentials("access_key", "secret_key")
    ///     .build()?;
    ///
    /// assert_eq!(config.ses_endpoint(), "https://email.us-west-2.amazonaws.com");
    /// # Ok::<(), integrations_ses_outbound::config::ConfigError>(())
    /// ```
    pub fn ses_endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| format!("https://email.{}.amazonaws.com", self.region))
    }

    /// Parse the endpoint into a URL.
    ///
    /// Endpoints carrying a query string or fragment are rejected, since
    /// only the path is signed.
    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let endpoint = self.ses_endpoint();
        let url = Url::parse(&endpoint).map_err(|e| ConfigError::Invalid {
            message: format!("invalid endpoint URL {}: {}", endpoint, e),
        })?;
        if url.host_str().is_none() {
            return Err(ConfigError::Invalid {
                message: format!("endpoint URL {} has no host", endpoint),
            });
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::Invalid {
                message: format!("endpoint URL {} must not have a query or fragment", endpoint),
            });
        }
        Ok(url)
    }

    /// The value signed and sent as the `Host` header.
    ///
    /// The endpoint's host, with `:port` appended when the port is not the
    /// scheme default.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_ses_outbound::config::SesConfig;
    ///
    /// let config = SesConfig::builder()
    ///     .region("us-east-1")
    ///     .endpoint("http://127.0.0.1:4566")
    ///     .credentials("access_key", "secret_key")
    ///     .build()?;
    ///
    /// assert_eq!(config.signing_host()?, "127.0.0.1:4566");
    /// # Ok::<(), integrations_ses_outbound::config::ConfigError>(())
    /// ```
    pub fn signing_host(&self) -> Result<String, ConfigError> {
        let url = self.endpoint_url()?;
        let host = url.host_str().unwrap_or_default();
        Ok(match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }
}

impl fmt::Debug for SesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SesConfig")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// Builder for creating SES client configurations.
#[derive(Default)]
pub struct SesConfigBuilder {
    region: Option<String>,
    endpoint: Option<String>,
    credentials_provider: Option<Arc<dyn CredentialProvider + Send + Sync>>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SesConfigBuilder {
    /// Set the AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a custom endpoint URL.
    ///
    /// The signed `Host` header follows the endpoint, so any SES-compatible
    /// endpoint can be targeted.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set a custom credential provider.
    pub fn credentials_provider(
        mut self,
        provider: impl CredentialProvider + Send + Sync + 'static,
    ) -> Self {
        self.credentials_provider = Some(Arc::new(provider));
        self
    }

    /// Set static credentials.
    pub fn credentials(self, access_key: &str, secret_key: &str) -> Self {
        self.credentials_provider(StaticCredentialProvider::from_keys(access_key, secret_key))
    }

    /// Set the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Set a custom user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingField` if the region or credentials are not set
    /// - `ConfigError::Invalid` if the region is blank or the endpoint is not a URL
    pub fn build(self) -> Result<SesConfig, ConfigError> {
        let region = self.region.ok_or_else(|| ConfigError::MissingField {
            field: "region".to_string(),
        })?;

        if region.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "region must not be empty".to_string(),
            });
        }

        let credentials_provider =
            self.credentials_provider
                .ok_or_else(|| ConfigError::MissingField {
                    field: "credentials_provider".to_string(),
                })?;

        let config = SesConfig {
            region,
            endpoint: self.endpoint,
            credentials_provider,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            user_agent: self.user_agent,
        };

        config.endpoint_url()?;

        Ok(config)
    }
}
