//! AWS Signature Version 4 signing for the SES outbound call.
//!
//! SES authenticates every API request with AWS Signature Version 4. The
//! process is four fixed steps:
//!
//! 1. Canonical request - method, path, query, the signed headers, and the
//!    body hash in a byte-exact layout
//! 2. String to sign - algorithm, timestamp, credential scope, and the
//!    canonical request hash
//! 3. Signing key - derived from the secret through an HMAC-SHA256 chain
//!    over date, region, service and `aws4_request`
//! 4. Authorization header - credential, signed header list, signature
//!
//! # Components
//!
//! - **canonical** - URI encoding, canonical query strings and header blocks
//! - **v4** - key derivation, string to sign, and [`sign_request`]
//! - **error** - [`SigningError`]
//!
//! # Quick Start
//!
//! ```
//! use integrations_ses_outbound::signing::{sign_request, SigningParams};
//! use chrono::{TimeZone, Utc};
//!
//! let params = SigningParams::new("us-east-1", "ses")
//!     .with_access_key("AKIDEXAMPLE")
//!     .with_secret_key("secret");
//! let ts = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
//!
//! let signed = sign_request(
//!     "POST",
//!     "/v2/email/outbound-emails",
//!     &[],
//!     "email.us-east-1.amazonaws.com",
//!     b"{}",
//!     &params,
//!     &ts,
//! ).unwrap();
//!
//! assert_eq!(
//!     signed.payload_hash,
//!     "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
//! );
//! ```
//!
//! # Security Considerations
//!
//! - The secret key and every derived key are wiped from memory on drop
//! - Nothing in this module logs credentials or signatures
//! - AWS rejects requests whose `X-Amz-Date` is more than 15 minutes off

mod canonical;
mod error;
mod v4;

pub use canonical::{build_canonical_request, canonical_headers, canonical_query_string, uri_encode};
pub use error::SigningError;
pub use v4::{
    build_authorization_header, build_credential_scope, build_string_to_sign,
    calculate_signature, derive_signing_key, format_date_stamp, format_datetime, sha256_hex,
    sign_request, SignatureOutput, SigningParams, AWS4_REQUEST, AWS_ALGORITHM,
    JSON_CONTENT_TYPE, SES_SERVICE, SIGNED_HEADERS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(SES_SERVICE, "ses");
        assert_eq!(AWS_ALGORITHM, "AWS4-HMAC-SHA256");
        assert_eq!(AWS4_REQUEST, "aws4_request");
        assert_eq!(JSON_CONTENT_TYPE, mime::APPLICATION_JSON.essence_str());
        assert_eq!(SIGNED_HEADERS, "content-type;host;x-amz-date");
    }

    #[test]
    fn test_signing_params_construction() {
        let params = SigningParams::new("us-east-1", "ses")
            .with_access_key("AKID")
            .with_secret_key("SECRET");

        assert_eq!(params.region, "us-east-1");
        assert_eq!(params.service, "ses");
        assert_eq!(params.access_key_id, "AKID");
        assert_eq!(params.secret_access_key.as_str(), "SECRET");
    }

    #[test]
    fn test_signing_params_from_credentials() {
        let creds = crate::credentials::AwsCredentials::new("AKID", "SECRET");
        let params = SigningParams::from_credentials("eu-west-1", SES_SERVICE, &creds);
        assert_eq!(params.access_key_id, "AKID");
        assert_eq!(params.secret_access_key.as_str(), "SECRET");
        assert_eq!(params.region, "eu-west-1");
    }

    #[test]
    fn test_credential_scope() {
        assert_eq!(
            build_credential_scope("20150101", "us-east-1", "ses"),
            "20150101/us-east-1/ses/aws4_request"
        );
    }
}
