//! Composes simple RFC 5322 messages.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use mime::Mime;
use thiserror::Error;
use uuid::Uuid;

use super::MimeMessage;
use crate::types::EmailAddress;

/// Errors from [`MessageBuilder::build`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuilderError {
    /// No `From` address was set.
    #[error("Message has no From address")]
    MissingFrom,

    /// No To, Cc, or Bcc address was set.
    #[error("Message has no recipients")]
    NoRecipients,

    /// An address did not parse as exactly one mailbox.
    #[error("Invalid address: {address}")]
    InvalidAddress {
        /// The rejected input.
        address: String,
    },

    /// A header name or value would break the header section.
    #[error("Invalid header: {name}")]
    InvalidHeader {
        /// The rejected header name.
        name: String,
    },
}

/// Builder for a raw MIME message.
///
/// Produces `text/plain`, `text/html`, or `multipart/alternative` when both
/// bodies are set. Bodies are base64 encoded. Bcc is kept in the headers so
/// the SES payload can read it; SES removes it before delivery.
///
/// # Example
///
/// ```
/// use integrations_ses_outbound::message::MessageBuilder;
///
/// let message = MessageBuilder::new()
///     .from("Sender <sender@example.com>")
///     .to("Alice <alice@example.com>")
///     .bcc("audit@example.com")
///     .subject("Quarterly report")
///     .text("See attached figures.")
///     .build()?;
///
/// assert_eq!(message.header("To"), Some("Alice <alice@example.com>"));
/// assert_eq!(message.header("Bcc"), Some("audit@example.com"));
/// # Ok::<(), integrations_ses_outbound::message::BuilderError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    from: Option<String>,
    to: Vec<String>,
    cc: Vec<String>,
    bcc: Vec<String>,
    reply_to: Vec<String>,
    subject: Option<String>,
    text: Option<String>,
    html: Option<String>,
    headers: Vec<(String, String)>,
    date: Option<DateTime<Utc>>,
    message_id: Option<String>,
}

impl MessageBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the From address.
    pub fn from(mut self, address: impl Into<String>) -> Self {
        self.from = Some(address.into());
        self
    }

    /// Add a To address.
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Add a Cc address.
    pub fn cc(mut self, address: impl Into<String>) -> Self {
        self.cc.push(address.into());
        self
    }

    /// Add a Bcc address.
    pub fn bcc(mut self, address: impl Into<String>) -> Self {
        self.bcc.push(address.into());
        self
    }

    /// Add a Reply-To address.
    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.reply_to.push(address.into());
        self
    }

    /// Set the subject. Non-ASCII subjects are RFC 2047 encoded.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the plain text body.
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.text = Some(body.into());
        self
    }

    /// Set the HTML body.
    pub fn html(mut self, body: impl Into<String>) -> Self {
        self.html = Some(body.into());
        self
    }

    /// Add a custom header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the Date header. Defaults to now.
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the Message-ID (without angle brackets). Defaults to a random id.
    pub fn message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    /// Build the message.
    pub fn build(self) -> Result<MimeMessage, BuilderError> {
        let from_raw = self.from.as_deref().ok_or(BuilderError::MissingFrom)?;
        let from = parse_one(from_raw)?;

        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(BuilderError::NoRecipients);
        }

        let to = parse_all(&self.to)?;
        let cc = parse_all(&self.cc)?;
        let bcc = parse_all(&self.bcc)?;
        let reply_to = parse_all(&self.reply_to)?;

        let date = self.date.unwrap_or_else(Utc::now);
        let message_id = match self.message_id {
            Some(id) => id,
            None => generate_message_id(&from, &date),
        };

        let mut output = Vec::new();

        write_header(&mut output, "Date", &date.format("%a, %d %b %Y %H:%M:%S %z").to_string())?;
        write_header(&mut output, "From", &from.format())?;
        write_address_header(&mut output, "To", &to)?;
        write_address_header(&mut output, "Cc", &cc)?;
        write_address_header(&mut output, "Bcc", &bcc)?;
        write_address_header(&mut output, "Reply-To", &reply_to)?;

        if let Some(subject) = &self.subject {
            write_header(&mut output, "Subject", &encode_header(subject))?;
        }

        write_header(&mut output, "Message-ID", &format!("<{}>", message_id))?;

        for (name, value) in &self.headers {
            write_header(&mut output, name, &encode_header(value))?;
        }

        write_header(&mut output, "MIME-Version", "1.0")?;

        match (&self.text, &self.html) {
            (Some(text), Some(html)) => {
                let boundary = format!("----=_Part_{}", Uuid::new_v4().simple());
                write_header(
                    &mut output,
                    "Content-Type",
                    &format!("multipart/alternative; boundary=\"{}\"", boundary),
                )?;
                output.extend_from_slice(b"\r\n");

                for (content_type, body) in [(&mime::TEXT_PLAIN_UTF_8, text), (&mime::TEXT_HTML_UTF_8, html)] {
                    output.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
                    write_part(&mut output, content_type, body)?;
                }

                output.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
            }
            (None, Some(html)) => write_part(&mut output, &mime::TEXT_HTML_UTF_8, html)?,
            (text, None) => write_part(
                &mut output,
                &mime::TEXT_PLAIN_UTF_8,
                text.as_deref().unwrap_or(""),
            )?,
        }

        Ok(MimeMessage::from_bytes(output))
    }
}

fn parse_one(address: &str) -> Result<EmailAddress, BuilderError> {
    EmailAddress::parse(address).ok_or_else(|| BuilderError::InvalidAddress {
        address: address.to_string(),
    })
}

fn parse_all(addresses: &[String]) -> Result<Vec<EmailAddress>, BuilderError> {
    addresses.iter().map(|a| parse_one(a)).collect()
}

fn generate_message_id(from: &EmailAddress, date: &DateTime<Utc>) -> String {
    let domain = from
        .email
        .rsplit_once('@')
        .map(|(_, d)| d)
        .filter(|d| !d.is_empty())
        .unwrap_or("localhost");
    format!("{}.{}@{}", Uuid::new_v4(), date.timestamp(), domain)
}

fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        return value.to_string();
    }
    format!("=?UTF-8?B?{}?=", BASE64.encode(value.as_bytes()))
}

fn write_header(output: &mut Vec<u8>, name: &str, value: &str) -> Result<(), BuilderError> {
    let bad_name = name.is_empty() || name.chars().any(|c| c.is_control() || c == ':' || c == ' ');
    let bad_value = value.contains(|c: char| c == '\r' || c == '\n');
    if bad_name || bad_value {
        return Err(BuilderError::InvalidHeader {
            name: name.to_string(),
        });
    }

    output.extend_from_slice(name.as_bytes());
    output.extend_from_slice(b": ");
    output.extend_from_slice(value.as_bytes());
    output.extend_from_slice(b"\r\n");
    Ok(())
}

/// Writes an address list, one address per folded line.
fn write_address_header(
    output: &mut Vec<u8>,
    name: &str,
    addresses: &[EmailAddress],
) -> Result<(), BuilderError> {
    if addresses.is_empty() {
        return Ok(());
    }

    let formatted: Vec<String> = addresses.iter().map(EmailAddress::format).collect();
    for address in &formatted {
        if address.contains(|c: char| c == '\r' || c == '\n') {
            return Err(BuilderError::InvalidHeader {
                name: name.to_string(),
            });
        }
    }

    output.extend_from_slice(format!("{}: {}\r\n", name, formatted.join(",\r\n ")).as_bytes());
    Ok(())
}

fn write_part(output: &mut Vec<u8>, content_type: &Mime, body: &str) -> Result<(), BuilderError> {
    write_header(output, "Content-Type", content_type.as_ref())?;
    write_header(output, "Content-Transfer-Encoding", "base64")?;
    output.extend_from_slice(b"\r\n");

    let encoded = BASE64.encode(body.as_bytes());
    for chunk in encoded.as_bytes().chunks(76) {
        output.extend_from_slice(chunk);
        output.extend_from_slice(b"\r\n");
    }

    Ok(())
}
