//! SES client implementation.
//!
//! [`SesClient`] turns an [`EmailRequest`] into one signed
//! `POST /v2/email/outbound-emails` and returns the raw [`SesResponse`].
//! It never retries and never interprets the status code.
//!
//! # Example
//!
//! ```rust,no_run
//! use integrations_ses_outbound::{EmailRequest, MessageBuilder, SesClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SesClient::builder()
//!     .region("us-east-1")
//!     .credentials("AKID", "SECRET")
//!     .build()?;
//!
//! let message = MessageBuilder::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Hello")
//!     .text("Email body")
//!     .build()?;
//!
//! let response = client.send_email(EmailRequest::Message(message)).await?;
//! println!("{} {}", response.status(), response.text());
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use http::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, HOST, USER_AGENT};
use http::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, trace};

use crate::config::{SesConfig, SesConfigBuilder};
use crate::credentials::CredentialProvider;
use crate::error::{SesError, SesResult};
use crate::http::{ReqwestTransport, SesRequest, SesResponse, Transport};
use crate::message::MimeMessage;
use crate::signing::{
    sign_request, SignatureOutput, SigningError, SigningParams, JSON_CONTENT_TYPE, SES_SERVICE,
};
use crate::types::SendEmailPayload;

/// Path of the SES v2 `SendEmail` operation.
pub const SEND_EMAIL_PATH: &str = "/v2/email/outbound-emails";

/// What to send.
#[derive(Debug, Clone)]
pub enum EmailRequest {
    /// A raw MIME message. The payload is built from its headers.
    Message(MimeMessage),
    /// A complete `SendEmail` JSON body supplied by the caller.
    Payload(Value),
}

impl EmailRequest {
    /// Serialize the request body.
    ///
    /// Both variants go through a `serde_json::Value`, so a message and the
    /// equivalent hand-built payload give identical bytes.
    pub fn to_body(&self) -> SesResult<Vec<u8>> {
        let value = match self {
            EmailRequest::Message(message) => SendEmailPayload::from_message(message).to_value()?,
            EmailRequest::Payload(value) => value.clone(),
        };
        Ok(serde_json::to_vec(&value)?)
    }
}

impl From<MimeMessage> for EmailRequest {
    fn from(message: MimeMessage) -> Self {
        EmailRequest::Message(message)
    }
}

impl From<Value> for EmailRequest {
    fn from(value: Value) -> Self {
        EmailRequest::Payload(value)
    }
}

/// A signed request that has not been sent yet.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// The request as it would go on the wire.
    pub request: SesRequest,
    /// Signing intermediates.
    pub signature: SignatureOutput,
}

/// Client for the SES v2 `SendEmail` operation.
///
/// Cheap to clone; clones share the configuration and transport.
#[derive(Clone)]
pub struct SesClient {
    config: Arc<SesConfig>,
    transport: Arc<dyn Transport>,
}

impl SesClient {
    /// Create a client using the reqwest transport.
    pub fn new(config: SesConfig) -> SesResult<Self> {
        let transport = ReqwestTransport::new(
            config.timeout,
            config.connect_timeout,
            config.user_agent.as_deref(),
        )?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client with a custom transport.
    pub fn with_transport(config: SesConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// Create a client from environment variables.
    ///
    /// See [`SesConfig::from_env`].
    pub fn from_env() -> SesResult<Self> {
        Self::new(SesConfig::from_env()?)
    }

    /// Create a new client builder.
    pub fn builder() -> SesClientBuilder {
        SesClientBuilder::default()
    }

    /// Get the client configuration.
    pub fn config(&self) -> &SesConfig {
        &self.config
    }

    /// Build and sign a request without sending it, using the current time.
    pub async fn prepare(&self, request: &EmailRequest) -> SesResult<PreparedRequest> {
        self.prepare_at(request, &Utc::now()).await
    }

    /// Build and sign a request without sending it.
    pub async fn prepare_at(
        &self,
        request: &EmailRequest,
        timestamp: &DateTime<Utc>,
    ) -> SesResult<PreparedRequest> {
        let mut url = self.config.endpoint_url()?;
        let path = format!("{}{}", url.path().trim_end_matches('/'), SEND_EMAIL_PATH);
        url.set_path(&path);

        let host = self.config.signing_host()?;
        let credentials = self.config.credentials_provider.credentials().await?;
        let params = SigningParams::from_credentials(&self.config.region, SES_SERVICE, &credentials);

        let body = request.to_body()?;
        let signature = sign_request("POST", url.path(), &[], &host, &body, &params, timestamp)?;

        let mut headers = HeaderMap::new();
        headers.insert(HOST, header_value("host", &host)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(HeaderName::from_static("x-amz-date"), header_value("x-amz-date", &signature.amz_date)?);
        headers.insert(AUTHORIZATION, header_value("authorization", &signature.authorization)?);
        if let Some(ua) = &self.config.user_agent {
            headers.insert(USER_AGENT, header_value("user-agent", ua)?);
        }

        debug!(
            region = %self.config.region,
            url = %url,
            amz_date = %signature.amz_date,
            payload_hash = %signature.payload_hash,
            request_hash = %signature.request_hash,
            "signed SendEmail request"
        );
        trace!(canonical_request = %signature.canonical_request, "canonical request");

        Ok(PreparedRequest {
            request: SesRequest::new(Method::POST, url, headers, body),
            signature,
        })
    }

    /// Send an email, signing with the current time.
    pub async fn send_email(&self, request: EmailRequest) -> SesResult<SesResponse> {
        self.send_email_at(request, Utc::now()).await
    }

    /// Send an email, signing with the given timestamp.
    ///
    /// Exactly one HTTP request is made. Any status code is returned as a
    /// response; only failures to build, sign, or transmit are errors.
    #[instrument(skip_all, fields(region = %self.config.region))]
    pub async fn send_email_at(
        &self,
        request: EmailRequest,
        timestamp: DateTime<Utc>,
    ) -> SesResult<SesResponse> {
        let prepared = self.prepare_at(&request, &timestamp).await?;
        let response = self.transport.send(prepared.request).await?;

        debug!(
            status = response.status().as_u16(),
            request_id = response.request_id().unwrap_or("-"),
            "SendEmail response"
        );

        Ok(response)
    }

    /// Send a raw MIME message.
    pub async fn send_message(&self, message: MimeMessage) -> SesResult<SesResponse> {
        self.send_email(EmailRequest::Message(message)).await
    }

    /// Send a caller-supplied `SendEmail` JSON body.
    pub async fn send_payload(&self, payload: Value) -> SesResult<SesResponse> {
        self.send_email(EmailRequest::Payload(payload)).await
    }
}

impl std::fmt::Debug for SesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SesClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, SigningError> {
    HeaderValue::from_str(value).map_err(|_| SigningError::InvalidHeaderValue {
        header: name.to_string(),
    })
}

/// Builder for [`SesClient`].
#[derive(Default)]
pub struct SesClientBuilder {
    config: SesConfigBuilder,
    transport: Option<Arc<dyn Transport>>,
}

impl SesClientBuilder {
    /// Set the AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config = self.config.region(region);
        self
    }

    /// Set a custom endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config = self.config.endpoint(endpoint);
        self
    }

    /// Set static credentials.
    pub fn credentials(mut self, access_key: &str, secret_key: &str) -> Self {
        self.config = self.config.credentials(access_key, secret_key);
        self
    }

    /// Set a custom credential provider.
    pub fn credentials_provider(
        mut self,
        provider: impl CredentialProvider + Send + Sync + 'static,
    ) -> Self {
        self.config = self.config.credentials_provider(provider);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.config = self.config.timeout(duration);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.config = self.config.connect_timeout(duration);
        self
    }

    /// Set a custom user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config = self.config.user_agent(ua);
        self
    }

    /// Use a custom transport instead of reqwest.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> SesResult<SesClient> {
        let config = self.config.build().map_err(SesError::from)?;
        match self.transport {
            Some(transport) => Ok(SesClient::with_transport(config, transport)),
            None => SesClient::new(config),
        }
    }
}
