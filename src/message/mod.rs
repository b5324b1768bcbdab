//! Raw MIME messages.
//!
//! [`MimeMessage`] wraps a complete message (headers and body) exactly as it
//! will be sent, with a read-only index of its header section.
//! [`MessageBuilder`] composes a simple message from parts.

use std::fmt;

mod builder;

pub use builder::{BuilderError, MessageBuilder};

/// A complete raw MIME message.
///
/// The bytes are kept verbatim; headers are indexed for lookup only.
///
/// # Example
///
/// ```
/// use integrations_ses_outbound::message::MimeMessage;
///
/// let message = MimeMessage::from_bytes(
///     "From: a@example.com\r\nSubject: Hello\r\n  world\r\n\r\nBody\r\n",
/// );
///
/// assert_eq!(message.header("subject"), Some("Hello  world"));
/// assert!(message.as_bytes().ends_with(b"Body\r\n"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct MimeMessage {
    raw: Vec<u8>,
    headers: Vec<(String, String)>,
}

impl MimeMessage {
    /// Wrap raw message bytes.
    ///
    /// The header section ends at the first empty line. Folded lines are
    /// unfolded and lines without a colon are ignored.
    pub fn from_bytes(raw: impl Into<Vec<u8>>) -> Self {
        let raw = raw.into();
        let headers = parse_headers(&raw);
        Self { raw, headers }
    }

    /// First value of a header (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All values of a header, in order.
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// All headers as (name, value) pairs, in order.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// The exact message bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Consume the message, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.raw
    }

    /// Length of the message in bytes.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the message is empty.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl fmt::Debug for MimeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MimeMessage")
            .field("headers", &self.headers)
            .field("len", &self.raw.len())
            .finish()
    }
}

impl From<Vec<u8>> for MimeMessage {
    fn from(raw: Vec<u8>) -> Self {
        Self::from_bytes(raw)
    }
}

impl From<&str> for MimeMessage {
    fn from(raw: &str) -> Self {
        Self::from_bytes(raw)
    }
}

impl From<String> for MimeMessage {
    fn from(raw: String) -> Self {
        Self::from_bytes(raw)
    }
}

fn parse_headers(raw: &[u8]) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();

    for line in raw.split(|&b| b == b'\n') {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            break;
        }

        let line = String::from_utf8_lossy(line);

        if line.starts_with(|c: char| c == ' ' || c == '\t') {
            if let Some((_, value)) = headers.last_mut() {
                value.push_str(&line);
            }
            continue;
        }

        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            headers.push((name.to_string(), value.to_string()));
        }
    }

    for (_, value) in headers.iter_mut() {
        *value = value.trim().to_string();
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup() {
        let message = MimeMessage::from_bytes(
            "From: a@example.com\r\nTO: b@example.com\r\nTo: c@example.com\r\n\r\nTo: not-a-header\r\n",
        );

        assert_eq!(message.header("from"), Some("a@example.com"));
        assert_eq!(message.header("to"), Some("b@example.com"));
        assert_eq!(message.header_all("To"), vec!["b@example.com", "c@example.com"]);
        assert_eq!(message.header("Cc"), None);
        assert!(message.header_all("Cc").is_empty());
    }

    #[test]
    fn test_lf_line_endings() {
        let message = MimeMessage::from_bytes("From: a@example.com\nSubject: hi\n\nbody\n");
        assert_eq!(message.header("Subject"), Some("hi"));
        assert_eq!(message.headers().count(), 2);
    }

    #[test]
    fn test_folded_header_is_unfolded() {
        let message = MimeMessage::from_bytes(
            "To: Alice <alice@example.com>,\r\n\tBob <bob@example.com>\r\n\r\n",
        );
        assert_eq!(
            message.header("To"),
            Some("Alice <alice@example.com>,\tBob <bob@example.com>")
        );
    }

    #[test]
    fn test_lines_without_colon_are_ignored() {
        let message = MimeMessage::from_bytes("garbage line\r\nFrom: a@example.com\r\n\r\n");
        assert_eq!(message.headers().count(), 1);
        assert_eq!(message.header("From"), Some("a@example.com"));
    }

    #[test]
    fn test_bytes_are_kept_verbatim() {
        let raw = b"From: a@example.com\r\n\r\n\xff\xfe binary\r\n".to_vec();
        let message = MimeMessage::from(raw.clone());
        assert_eq!(message.as_bytes(), raw.as_slice());
        assert_eq!(message.len(), raw.len());
        assert_eq!(message.into_bytes(), raw);
    }

    #[test]
    fn test_headers_only_message() {
        let message = MimeMessage::from("From: a@example.com");
        assert_eq!(message.header("From"), Some("a@example.com"));
        assert!(!message.is_empty());
    }
}
