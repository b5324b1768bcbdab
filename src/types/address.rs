//! Email address parsing and formatting.
//!
//! Header values are parsed as RFC 5322 address lists: quoted display names,
//! angle addresses, comments used as display names when no phrase is given,
//! and groups (`Team: a@x.com, b@x.com;`). Entries that do not parse are
//! dropped instead of failing the whole list.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::fmt;

/// Characters that force a display name to be quoted.
const SPECIALS: &[char] = &['(', ')', '<', '>', '@', ',', ':', ';', '.', '"', '[', ']', '\\'];

/// Email address with optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress {
    /// Display name (e.g., "John Doe").
    pub display_name: Option<String>,
    /// Email address (e.g., "john@example.com").
    pub email: String,
}

impl EmailAddress {
    /// Creates an address without a display name.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            display_name: None,
            email: email.into(),
        }
    }

    /// Creates an address with a display name.
    pub fn with_name(name: impl Into<String>, email: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: if name.is_empty() { None } else { Some(name) },
            email: email.into(),
        }
    }

    /// Parses a single address (e.g., `"Doe, John" <john@example.com>`).
    ///
    /// Returns `None` if the input is empty, malformed, or holds more than
    /// one address.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_ses_outbound::types::EmailAddress;
    ///
    /// let addr = EmailAddress::parse("carol@example.com (Carol C)").unwrap();
    /// assert_eq!(addr.display_name.as_deref(), Some("Carol C"));
    /// assert_eq!(addr.email, "carol@example.com");
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let mut list = parse_address_list(s);
        if list.len() == 1 {
            list.pop()
        } else {
            None
        }
    }

    /// Formats the address for a header or the SES address arrays.
    ///
    /// Display names containing specials are quoted with `\` and `"`
    /// escaped. Non-ASCII display names become an RFC 2047 encoded word.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_ses_outbound::types::EmailAddress;
    ///
    /// let addr = EmailAddress::with_name("Jane Q. Public", "jane@example.com");
    /// assert_eq!(addr.format(), "\"Jane Q. Public\" <jane@example.com>");
    /// ```
    pub fn format(&self) -> String {
        let name = match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => return self.email.clone(),
        };

        if !name.is_ascii() {
            return format!("=?utf-8?b?{}?= <{}>", BASE64.encode(name.as_bytes()), self.email);
        }

        if name.contains(SPECIALS) {
            let mut quoted = String::with_capacity(name.len() + 2);
            for c in name.chars() {
                if c == '\\' || c == '"' {
                    quoted.push('\\');
                }
                quoted.push(c);
            }
            format!("\"{}\" <{}>", quoted, self.email)
        } else {
            format!("{} <{}>", name, self.email)
        }
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Parses an address list header value and formats every entry.
///
/// Empty and unparseable entries are dropped, so a header holding only
/// invalid entries gives an empty list.
///
/// # Example
///
/// ```
/// use integrations_ses_outbound::types::address_list;
///
/// assert_eq!(
///     address_list("Alice <alice@example.com>, bob@example.com"),
///     vec!["Alice <alice@example.com>", "bob@example.com"],
/// );
/// assert!(address_list(" , ,").is_empty());
/// ```
pub fn address_list(header_value: &str) -> Vec<String> {
    parse_address_list(header_value)
        .iter()
        .map(EmailAddress::format)
        .collect()
}

/// Parses an address list header value into addresses.
pub fn parse_address_list(header_value: &str) -> Vec<EmailAddress> {
    split_entries(header_value)
        .iter()
        .filter_map(|entry| parse_entry(entry))
        .collect()
}

/// Splits a list on top-level commas.
///
/// Quoted strings and comments protect commas. A colon outside an angle
/// address opens a group: the group name is discarded and `;` closes it.
fn split_entries(input: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut comment_depth = 0usize;
    let mut in_angle = false;
    let mut escaped = false;

    for c in input.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }

        if in_quote || comment_depth > 0 {
            match c {
                '\\' => escaped = true,
                '"' if in_quote => in_quote = false,
                '(' if comment_depth > 0 => comment_depth += 1,
                ')' if comment_depth > 0 => comment_depth -= 1,
                _ => {}
            }
            current.push(c);
            continue;
        }

        match c {
            '"' => {
                in_quote = true;
                current.push(c);
            }
            '(' => {
                comment_depth = 1;
                current.push(c);
            }
            '<' => {
                in_angle = true;
                current.push(c);
            }
            '>' => {
                in_angle = false;
                current.push(c);
            }
            ':' if !in_angle => current.clear(),
            ',' | ';' => {
                entries.push(std::mem::take(&mut current));
                in_angle = false;
            }
            _ => current.push(c),
        }
    }

    entries.push(current);
    entries
}

#[derive(Debug, PartialEq)]
enum Token {
    Word(String),
    Quoted(String),
    Comment(String),
    Angle(String),
    Space,
}

/// Tokenizes one entry. Returns `None` on an unterminated quote, comment,
/// or angle address.
fn tokenize(entry: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = entry.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
                if !matches!(tokens.last(), None | Some(Token::Space)) {
                    tokens.push(Token::Space);
                }
            }
            '"' => {
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next()? {
                        '\\' => text.push(chars.next()?),
                        '"' => break,
                        other => text.push(other),
                    }
                }
                tokens.push(Token::Quoted(text));
            }
            '(' => {
                chars.next();
                let mut text = String::new();
                let mut depth = 1usize;
                loop {
                    match chars.next()? {
                        '\\' => text.push(chars.next()?),
                        '(' => {
                            depth += 1;
                            text.push('(');
                        }
                        ')' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                            text.push(')');
                        }
                        other => text.push(other),
                    }
                }
                tokens.push(Token::Comment(text));
            }
            '<' => {
                chars.next();
                let mut text = String::new();
                let mut in_quote = false;
                loop {
                    match chars.next()? {
                        '"' => {
                            in_quote = !in_quote;
                            text.push('"');
                        }
                        '\\' if in_quote => {
                            text.push('\\');
                            text.push(chars.next()?);
                        }
                        '>' if !in_quote => break,
                        other => text.push(other),
                    }
                }
                tokens.push(Token::Angle(text));
            }
            '>' => {
                chars.next();
            }
            _ => {
                let mut text = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '"' | '(' | '<' | '>') {
                        break;
                    }
                    text.push(c);
                    chars.next();
                }
                tokens.push(Token::Word(text));
            }
        }
    }

    Some(tokens)
}

/// Strips a source route (`@a,@b:user@host`) and whitespace from an angle
/// address.
fn angle_address(inner: &str) -> String {
    let addr = match inner.rfind(':') {
        Some(idx) if inner.trim_start().starts_with('@') => &inner[idx + 1..],
        _ => inner,
    };
    addr.split_whitespace().collect()
}

fn push_to_run(runs: &mut Vec<String>, new_run: &mut bool, text: &str) {
    match runs.last_mut() {
        Some(run) if !*new_run => run.push_str(text),
        _ => runs.push(text.to_string()),
    }
    *new_run = false;
}

fn parse_entry(entry: &str) -> Option<EmailAddress> {
    let tokens = tokenize(entry)?;

    let mut phrase = Vec::new();
    let mut comments = Vec::new();
    // Whitespace-separated runs of words, each a candidate addr-spec.
    let mut runs: Vec<String> = Vec::new();
    let mut new_run = true;
    let mut angle = None;

    for token in tokens {
        match token {
            Token::Angle(inner) if angle.is_none() => angle = Some(angle_address(&inner)),
            Token::Angle(_) => {}
            Token::Comment(text) => comments.push(text.trim().to_string()),
            Token::Space => new_run = true,
            Token::Word(word) if angle.is_none() => {
                push_to_run(&mut runs, &mut new_run, &word);
                phrase.push(word);
            }
            Token::Quoted(text) if angle.is_none() => {
                push_to_run(&mut runs, &mut new_run, &format!("\"{}\"", text));
                phrase.push(text);
            }
            Token::Word(_) | Token::Quoted(_) => {}
        }
    }

    // Bare text after an addr-spec is ignored; bare text alone is not an
    // address.
    let addr_spec = match runs.len() {
        0 => String::new(),
        1 => runs.remove(0),
        _ if runs[0].contains('@') => runs.remove(0),
        _ => return None,
    };

    let comment_name = comments
        .into_iter()
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let (name, email) = match angle {
        Some(email) => {
            let phrase = phrase.join(" ");
            let name = if phrase.is_empty() { comment_name } else { phrase };
            (name, email)
        }
        None => (comment_name, addr_spec),
    };

    if email.is_empty() {
        return None;
    }

    Some(EmailAddress::with_name(name, email))
}
