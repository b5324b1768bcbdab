//! The `SendEmail` request body.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::address::address_list;
use crate::message::MimeMessage;

/// JSON body of `POST /v2/email/outbound-emails` for a raw message.
///
/// Every key is always present. A missing `From` header serializes as
/// `null` and a missing recipient header as `[]`.
///
/// # Example
///
/// ```
/// use integrations_ses_outbound::message::MimeMessage;
/// use integrations_ses_outbound::types::SendEmailPayload;
///
/// let message = MimeMessage::from_bytes(
///     "From: a@example.com\r\nTo: Bob <b@example.com>\r\n\r\nhi\r\n",
/// );
/// let payload = SendEmailPayload::from_message(&message);
///
/// assert_eq!(payload.from_email_address.as_deref(), Some("a@example.com"));
/// assert_eq!(payload.destination.to_addresses, vec!["Bob <b@example.com>"]);
/// assert!(payload.destination.cc_addresses.is_empty());
/// assert_eq!(payload.content.raw.decode().unwrap(), message.as_bytes());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendEmailPayload {
    /// The `From` header, verbatim.
    pub from_email_address: Option<String>,
    /// Envelope recipients.
    pub destination: Destination,
    /// Reply-To addresses.
    pub reply_to_addresses: Vec<String>,
    /// Message content.
    pub content: EmailContent,
}

/// Recipients of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Destination {
    /// To addresses.
    pub to_addresses: Vec<String>,
    /// Cc addresses.
    pub cc_addresses: Vec<String>,
    /// Bcc addresses.
    pub bcc_addresses: Vec<String>,
}

/// Message content wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmailContent {
    /// Raw MIME content.
    pub raw: RawContent,
}

/// A raw MIME message, base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawContent {
    /// Standard base64 (with padding) of the full message bytes.
    pub data: String,
}

impl RawContent {
    /// Encode message bytes.
    pub fn encode(bytes: &[u8]) -> Self {
        Self {
            data: BASE64.encode(bytes),
        }
    }

    /// Decode back to the message bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.data)
    }
}

fn addresses(message: &MimeMessage, header: &str) -> Vec<String> {
    message
        .header_all(header)
        .into_iter()
        .flat_map(address_list)
        .collect()
}

impl SendEmailPayload {
    /// Build the payload for a raw message.
    pub fn from_message(message: &MimeMessage) -> Self {
        Self {
            from_email_address: message.header("From").map(str::to_string),
            destination: Destination {
                to_addresses: addresses(message, "To"),
                cc_addresses: addresses(message, "Cc"),
                bcc_addresses: addresses(message, "Bcc"),
            },
            reply_to_addresses: addresses(message, "Reply-To"),
            content: EmailContent {
                raw: RawContent::encode(message.as_bytes()),
            },
        }
    }

    /// Convert to a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
