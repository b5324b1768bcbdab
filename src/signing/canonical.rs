//! Canonical request building for AWS Signature V4.
//!
//! A canonical request is the byte-exact text both signer and verifier hash.
//! The SES outbound call signs a fixed header set, but the builders here take
//! the header list as input so the published SigV4 test vectors can be
//! reproduced with the same code.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unencoded in canonical URI paths: RFC 3986 unreserved plus `/`.
const URI_PATH_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Characters left unencoded in canonical query components.
const QUERY_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// URI-encode a string according to AWS signature requirements.
///
/// All characters except `A-Z`, `a-z`, `0-9`, `-`, `_`, `.` and `~` are
/// percent-encoded. The forward slash is encoded only when `encode_slash`
/// is true (query components), never in paths.
///
/// # Examples
///
/// ```
/// use integrations_ses_outbound::signing::uri_encode;
///
/// assert_eq!(uri_encode("/v2/email/outbound-emails", false), "/v2/email/outbound-emails");
/// assert_eq!(uri_encode("hello world", false), "hello%20world");
/// assert_eq!(uri_encode("a/b", true), "a%2Fb");
/// ```
pub fn uri_encode(input: &str, encode_slash: bool) -> String {
    if encode_slash {
        utf8_percent_encode(input, QUERY_SET).to_string()
    } else {
        utf8_percent_encode(input, URI_PATH_SET).to_string()
    }
}

/// Build a canonical query string from query parameters.
///
/// Names and values are URI-encoded, sorted by name then value, and joined
/// with `&`. No parameters yields the empty string, which is what the SES
/// outbound call signs.
///
/// # Examples
///
/// ```
/// use integrations_ses_outbound::signing::canonical_query_string;
///
/// assert_eq!(canonical_query_string(&[]), "");
///
/// let params = vec![
///     ("z".to_string(), "last".to_string()),
///     ("a".to_string(), "first".to_string()),
/// ];
/// assert_eq!(canonical_query_string(&params), "a=first&z=last");
/// ```
pub fn canonical_query_string(query_params: &[(String, String)]) -> String {
    if query_params.is_empty() {
        return String::new();
    }

    let mut encoded_params: Vec<(String, String)> = query_params
        .iter()
        .map(|(key, value)| (uri_encode(key, true), uri_encode(value, true)))
        .collect();

    encoded_params.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    encoded_params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical header block and the signed-headers list.
///
/// Names are lowercased, values trimmed with inner whitespace runs collapsed
/// to one space, and entries sorted by name. Repeated names are joined with
/// `,`. Every line of the block, including the last, ends in `\n`.
///
/// # Examples
///
/// ```
/// use integrations_ses_outbound::signing::canonical_headers;
///
/// let (block, signed) = canonical_headers(&[
///     ("X-Amz-Date", "20150101T000000Z"),
///     ("Content-Type", "application/json"),
///     ("Host", "email.us-east-1.amazonaws.com"),
/// ]);
///
/// assert_eq!(
///     block,
///     "content-type:application/json\nhost:email.us-east-1.amazonaws.com\nx-amz-date:20150101T000000Z\n"
/// );
/// assert_eq!(signed, "content-type;host;x-amz-date");
/// ```
pub fn canonical_headers(headers: &[(&str, &str)]) -> (String, String) {
    use std::collections::BTreeMap;

    let mut header_map: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (name, value) in headers {
        let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
        header_map
            .entry(name.to_lowercase())
            .or_default()
            .push(normalized);
    }

    let block = header_map
        .iter()
        .map(|(name, values)| format!("{}:{}\n", name, values.join(",")))
        .collect::<String>();

    let signed = header_map
        .keys()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(";");

    (block, signed)
}

/// Build a canonical request.
///
/// Layout, with `\n` separators:
///
/// ```text
/// METHOD
/// CanonicalURI
/// CanonicalQueryString
/// CanonicalHeaders      (each line ends in \n, so a blank line follows)
/// SignedHeaders
/// HashedPayload
/// ```
///
/// # Returns
///
/// A tuple of `(canonical_request, signed_headers)`.
pub fn build_canonical_request(
    method: &str,
    path: &str,
    query_params: &[(String, String)],
    headers: &[(&str, &str)],
    payload_hash: &str,
) -> (String, String) {
    let canonical_uri = if path.is_empty() {
        "/".to_string()
    } else {
        uri_encode(path, false)
    };
    let canonical_query = canonical_query_string(query_params);
    let (header_block, signed_headers) = canonical_headers(headers);

    let canonical_request = format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        method.to_uppercase(),
        canonical_uri,
        canonical_query,
        header_block,
        signed_headers,
        payload_hash
    );

    (canonical_request, signed_headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_encode_path() {
        assert_eq!(uri_encode("/path/to/file", false), "/path/to/file");
        assert_eq!(uri_encode("/path with spaces", false), "/path%20with%20spaces");
        assert_eq!(uri_encode("/a~b_c-d.e", false), "/a~b_c-d.e");
    }

    #[test]
    fn test_uri_encode_query() {
        assert_eq!(uri_encode("value/with/slash", true), "value%2Fwith%2Fslash");
        assert_eq!(uri_encode("key=value", true), "key%3Dvalue");
        assert_eq!(uri_encode("ü", true), "%C3%BC");
    }

    #[test]
    fn test_canonical_query_string_sorts_by_value_on_ties() {
        let params = vec![
            ("k".to_string(), "b".to_string()),
            ("k".to_string(), "a".to_string()),
        ];
        assert_eq!(canonical_query_string(&params), "k=a&k=b");
    }

    #[test]
    fn test_canonical_headers_collapse_whitespace() {
        let (block, signed) = canonical_headers(&[("My-Header", "  a   b  c ")]);
        assert_eq!(block, "my-header:a b c\n");
        assert_eq!(signed, "my-header");
    }

    #[test]
    fn test_canonical_headers_join_repeated_names() {
        let (block, _) = canonical_headers(&[("x-amz-meta", "one"), ("X-Amz-Meta", "two")]);
        assert_eq!(block, "x-amz-meta:one,two\n");
    }

    #[test]
    fn test_canonical_request_has_blank_line_after_headers() {
        let (canonical, signed) = build_canonical_request(
            "post",
            "/v2/email/outbound-emails",
            &[],
            &[
                ("content-type", "application/json"),
                ("host", "email.us-east-1.amazonaws.com"),
                ("x-amz-date", "20150101T000000Z"),
            ],
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a",
        );

        let expected = "POST\n\
/v2/email/outbound-emails\n\
\n\
content-type:application/json\n\
host:email.us-east-1.amazonaws.com\n\
x-amz-date:20150101T000000Z\n\
\n\
content-type;host;x-amz-date\n\
44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a";

        assert_eq!(canonical, expected);
        assert_eq!(signed, "content-type;host;x-amz-date");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let (canonical, _) = build_canonical_request("GET", "", &[], &[("host", "h")], "x");
        assert!(canonical.starts_with("GET\n/\n\n"));
    }
}
