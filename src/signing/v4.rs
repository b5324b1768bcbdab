//! AWS Signature Version 4 implementation for the SES outbound call.
//!
//! The signing process:
//! 1. Build the canonical request and hash it (`requestHash`)
//! 2. Build the string to sign from the timestamp, scope and `requestHash`
//! 3. Derive the signing key through the date/region/service HMAC chain
//! 4. Sign and assemble the `Authorization` header
//!
//! Reference: https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html

use super::canonical::build_canonical_request;
use super::error::SigningError;
use crate::credentials::AwsCredentials;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// AWS Signature V4 algorithm identifier.
pub const AWS_ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Service name used in the credential scope.
pub const SES_SERVICE: &str = "ses";

/// Terminator of the credential scope and last label of the key chain.
pub const AWS4_REQUEST: &str = "aws4_request";

/// Content type of every signed SES request body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// The fixed signed-header list, in canonical order.
pub const SIGNED_HEADERS: &str = "content-type;host;x-amz-date";

/// Parameters for AWS Signature V4 signing.
///
/// # Examples
///
/// ```
/// use integrations_ses_outbound::signing::SigningParams;
///
/// let params = SigningParams::new("us-east-1", "ses")
///     .with_access_key("AKIDEXAMPLE")
///     .with_secret_key("secret");
/// assert_eq!(params.region, "us-east-1");
/// ```
#[derive(Clone)]
pub struct SigningParams {
    /// AWS region (e.g., "us-east-1").
    pub region: String,
    /// AWS service name (e.g., "ses").
    pub service: String,
    /// AWS access key ID.
    pub access_key_id: String,
    /// AWS secret access key.
    pub secret_access_key: Zeroizing<String>,
}

impl SigningParams {
    /// Create new signing parameters with empty credentials.
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
            access_key_id: String::new(),
            secret_access_key: Zeroizing::new(String::new()),
        }
    }

    /// Create signing parameters from resolved credentials.
    pub fn from_credentials(
        region: impl Into<String>,
        service: impl Into<String>,
        credentials: &AwsCredentials,
    ) -> Self {
        Self::new(region, service)
            .with_access_key(credentials.access_key_id())
            .with_secret_key(credentials.secret_access_key())
    }

    /// Set the access key ID.
    pub fn with_access_key(mut self, access_key_id: impl Into<String>) -> Self {
        self.access_key_id = access_key_id.into();
        self
    }

    /// Set the secret access key.
    pub fn with_secret_key(mut self, secret_access_key: impl Into<String>) -> Self {
        self.secret_access_key = Zeroizing::new(secret_access_key.into());
        self
    }
}

impl fmt::Debug for SigningParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningParams")
            .field("region", &self.region)
            .field("service", &self.service)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .finish()
    }
}

/// Everything computed while signing one request.
///
/// The intermediates are kept so callers and tests can check each of the
/// four steps against a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureOutput {
    /// `YYYYMMDDTHHMMSSZ`, sent as `X-Amz-Date`.
    pub amz_date: String,
    /// `YYYYMMDD`.
    pub date_stamp: String,
    /// Hex SHA-256 of the request body.
    pub payload_hash: String,
    /// Step 1 output.
    pub canonical_request: String,
    /// Hex SHA-256 of the canonical request.
    pub request_hash: String,
    /// `{date}/{region}/{service}/aws4_request`.
    pub credential_scope: String,
    /// Step 2 output.
    pub string_to_sign: String,
    /// Hex HMAC of the string to sign under the derived key.
    pub signature: String,
    /// Value of the `Authorization` header.
    pub authorization: String,
}

/// Calculate SHA-256 of data and return it as lowercase hex.
///
/// # Examples
///
/// ```
/// use integrations_ses_outbound::signing::sha256_hex;
///
/// assert_eq!(
///     sha256_hex(b"{}"),
///     "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
/// );
/// ```
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Derive the SigV4 signing key.
///
/// ```text
/// kSecret  = "AWS4" + secret
/// kDate    = HMAC(kSecret, date)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
///
/// Every intermediate key is wiped when dropped.
///
/// # Examples
///
/// ```
/// use integrations_ses_outbound::signing::derive_signing_key;
///
/// // Published example from the AWS general reference.
/// let key = derive_signing_key(
///     "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
///     "20120215",
///     "us-east-1",
///     "iam",
/// );
/// assert_eq!(
///     hex::encode(&*key),
///     "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
/// );
/// ```
pub fn derive_signing_key(
    secret_key: &str,
    date_stamp: &str,
    region: &str,
    service: &str,
) -> Zeroizing<Vec<u8>> {
    let k_secret = Zeroizing::new(format!("AWS4{}", secret_key));
    let k_date = Zeroizing::new(hmac_sha256(k_secret.as_bytes(), date_stamp.as_bytes()));
    let k_region = Zeroizing::new(hmac_sha256(&k_date, region.as_bytes()));
    let k_service = Zeroizing::new(hmac_sha256(&k_region, service.as_bytes()));
    Zeroizing::new(hmac_sha256(&k_service, AWS4_REQUEST.as_bytes()))
}

/// Format a timestamp as `YYYYMMDD'T'HHMMSS'Z'`.
///
/// # Examples
///
/// ```
/// use integrations_ses_outbound::signing::format_datetime;
/// use chrono::{TimeZone, Utc};
///
/// let dt = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(format_datetime(&dt), "20150101T000000Z");
/// ```
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Format a date stamp as `YYYYMMDD`.
pub fn format_date_stamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%d").to_string()
}

/// Build the credential scope string `{date}/{region}/{service}/aws4_request`.
///
/// # Examples
///
/// ```
/// use integrations_ses_outbound::signing::build_credential_scope;
///
/// let scope = build_credential_scope("20150101", "us-east-1", "ses");
/// assert_eq!(scope, "20150101/us-east-1/ses/aws4_request");
/// ```
pub fn build_credential_scope(date_stamp: &str, region: &str, service: &str) -> String {
    format!("{}/{}/{}/{}", date_stamp, region, service, AWS4_REQUEST)
}

/// Create the string to sign.
///
/// ```text
/// AWS4-HMAC-SHA256
/// {timestamp}
/// {credential_scope}
/// {canonical_request_hash}
/// ```
pub fn build_string_to_sign(
    timestamp: &DateTime<Utc>,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        AWS_ALGORITHM,
        format_datetime(timestamp),
        credential_scope,
        canonical_request_hash
    )
}

/// Compute the final hex signature over a string to sign.
pub fn calculate_signature(signing_key: &[u8], string_to_sign: &str) -> String {
    hex::encode(hmac_sha256(signing_key, string_to_sign.as_bytes()))
}

/// Assemble the `Authorization` header value.
pub fn build_authorization_header(
    access_key_id: &str,
    credential_scope: &str,
    signed_headers: &str,
    signature: &str,
) -> String {
    format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        AWS_ALGORITHM, access_key_id, credential_scope, signed_headers, signature
    )
}

/// Sign an SES JSON request using AWS Signature V4.
///
/// The signed headers are always `content-type` (`application/json`),
/// `host` and `x-amz-date`, in that order. The caller must send those
/// three headers with exactly the values signed here, plus the
/// returned `authorization`.
///
/// # Arguments
///
/// * `method` - HTTP method
/// * `path` - Request path (e.g., `/v2/email/outbound-emails`)
/// * `query_params` - Query parameters, empty for SES `SendEmail`
/// * `host` - Value of the `Host` header
/// * `payload` - Request body bytes
/// * `params` - Credentials, region and service
/// * `timestamp` - Request time in UTC
///
/// # Errors
///
/// Returns `SigningError::MissingCredential` when the access key id or
/// secret is empty.
///
/// # Examples
///
/// ```
/// use integrations_ses_outbound::signing::{sign_request, SigningParams};
/// use chrono::{TimeZone, Utc};
///
/// let params = SigningParams::new("us-east-1", "ses")
///     .with_access_key("AKIDEXAMPLE")
///     .with_secret_key("secret");
/// let ts = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
///
/// let signed = sign_request(
///     "POST",
///     "/v2/email/outbound-emails",
///     &[],
///     "email.us-east-1.amazonaws.com",
///     b"{}",
///     &params,
///     &ts,
/// )?;
///
/// assert!(signed.authorization.starts_with(
///     "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150101/us-east-1/ses/aws4_request, \
///      SignedHeaders=content-type;host;x-amz-date, Signature="
/// ));
/// # Ok::<(), integrations_ses_outbound::signing::SigningError>(())
/// ```
pub fn sign_request(
    method: &str,
    path: &str,
    query_params: &[(String, String)],
    host: &str,
    payload: &[u8],
    params: &SigningParams,
    timestamp: &DateTime<Utc>,
) -> Result<SignatureOutput, SigningError> {
    if params.access_key_id.is_empty() {
        return Err(SigningError::MissingCredential {
            field: "access_key_id".to_string(),
        });
    }
    if params.secret_access_key.is_empty() {
        return Err(SigningError::MissingCredential {
            field: "secret_access_key".to_string(),
        });
    }
    if host.is_empty() {
        return Err(SigningError::InvalidHeaderValue {
            header: "host".to_string(),
        });
    }

    let date_stamp = format_date_stamp(timestamp);
    let amz_date = format_datetime(timestamp);
    let payload_hash = sha256_hex(payload);

    let headers = [
        ("content-type", JSON_CONTENT_TYPE),
        ("host", host),
        ("x-amz-date", amz_date.as_str()),
    ];
    let (canonical_request, signed_headers) =
        build_canonical_request(method, path, query_params, &headers, &payload_hash);

    debug_assert_eq!(signed_headers, SIGNED_HEADERS);

    let request_hash = sha256_hex(canonical_request.as_bytes());
    let credential_scope = build_credential_scope(&date_stamp, &params.region, &params.service);
    let string_to_sign = build_string_to_sign(timestamp, &credential_scope, &request_hash);

    let signing_key = derive_signing_key(
        &params.secret_access_key,
        &date_stamp,
        &params.region,
        &params.service,
    );
    let signature = calculate_signature(&signing_key, &string_to_sign);

    let authorization = build_authorization_header(
        &params.access_key_id,
        &credential_scope,
        &signed_headers,
        &signature,
    );

    tracing::trace!(
        amz_date = %amz_date,
        payload_hash = %payload_hash,
        request_hash = %request_hash,
        scope = %credential_scope,
        "signed request"
    );

    Ok(SignatureOutput {
        amz_date,
        date_stamp,
        payload_hash,
        canonical_request,
        request_hash,
        credential_scope,
        string_to_sign,
        signature,
        authorization,
    })
}
