//! Integration tests for AWS Signature V4 against published and fixed vectors.

use chrono::{TimeZone, Utc};
use integrations_ses_outbound::message::MessageBuilder;
use integrations_ses_outbound::signing::*;
use integrations_ses_outbound::types::RawContent;
use integrations_ses_outbound::EmailRequest;
use serde_json::json;

const EXAMPLE_SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

fn ses_params() -> SigningParams {
    SigningParams::new("us-east-1", "ses")
        .with_access_key("AKIDEXAMPLE")
        .with_secret_key("secret")
}

fn sign_body(host: &str, body: &[u8]) -> SignatureOutput {
    let ts = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
    sign_request(
        "POST",
        "/v2/email/outbound-emails",
        &[],
        host,
        body,
        &ses_params(),
        &ts,
    )
    .unwrap()
}

#[test]
fn test_key_derivation_reference() {
    let key = derive_signing_key(EXAMPLE_SECRET, "20120215", "us-east-1", "iam");
    assert_eq!(
        hex::encode(&*key),
        "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
    );
}

#[test]
fn test_get_vanilla_suite_vector() {
    let ts = Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap();
    let headers = [
        ("host", "example.amazonaws.com"),
        ("x-amz-date", "20150830T123600Z"),
    ];

    let (canonical_request, signed_headers) =
        build_canonical_request("GET", "/", &[], &headers, &sha256_hex(b""));
    assert_eq!(signed_headers, "host;x-amz-date");

    let request_hash = sha256_hex(canonical_request.as_bytes());
    assert_eq!(
        request_hash,
        "bb579772317eb040ac9ed261061d46c1f17a8133879d6129b6e1c25292927e63"
    );

    let scope = build_credential_scope(&format_date_stamp(&ts), "us-east-1", "service");
    let string_to_sign = build_string_to_sign(&ts, &scope, &request_hash);
    let key = derive_signing_key(EXAMPLE_SECRET, "20150830", "us-east-1", "service");

    assert_eq!(
        calculate_signature(&key, &string_to_sign),
        "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
    );
}

#[test]
fn test_ses_vector_email_host() {
    let signed = sign_body("email.us-east-1.amazonaws.com", b"{}");

    assert_eq!(
        signed.payload_hash,
        "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
    );
    assert_eq!(
        signed.request_hash,
        "73279784421823ebe720238bba9d3d7d9b10ad9b46be15aa130759eeb353e48b"
    );
    assert_eq!(
        signed.signature,
        "df44ce10f45b159321ff7b0107c69eb11d459169596b24c4641f02641afd1802"
    );
}

#[test]
fn test_ses_vector_ses_host() {
    let signed = sign_body("ses.us-east-1.amazonaws.com", b"{}");

    assert_eq!(
        signed.request_hash,
        "3b89b0e482c27c5f997a2894d925e00417fd499579a2bfb81932aca1737131d3"
    );
    assert_eq!(
        signed.signature,
        "9daf9e8c3550109eb75fa1d426806d14321d01fd19fbe2782a270baf259a4536"
    );
}

#[test]
fn test_derived_key_for_ses_scope() {
    let key = derive_signing_key("secret", "20150101", "us-east-1", "ses");
    assert_eq!(
        hex::encode(&*key),
        "7f4f095f1f3e2e0e138dfc3b6244fc87046739daa436a2b5ef7713c9771e7da4"
    );
}

#[test]
fn test_single_byte_change_changes_everything() {
    let original = sign_body("email.us-east-1.amazonaws.com", b"{}");
    let changed = sign_body("email.us-east-1.amazonaws.com", b"{]");

    assert_eq!(
        changed.payload_hash,
        "2125223e9996e4c2e393de959aa95e788cfd809a2a85eea6a7bc89aab856a352"
    );
    assert_eq!(
        changed.request_hash,
        "8751714c5c149f26099dd077be66cee9fdc30abdc5674743e9e46e2f4b31f0ca"
    );
    assert_eq!(
        changed.signature,
        "0e6d734482a82cd0ab00d7f787baca0119016c661df72ced2d9b3212331c0428"
    );

    assert_ne!(original.payload_hash, changed.payload_hash);
    assert_ne!(original.request_hash, changed.request_hash);
    assert_ne!(original.signature, changed.signature);
}

#[test]
fn test_signing_is_deterministic() {
    let a = sign_body("email.us-east-1.amazonaws.com", b"{\"a\":1}");
    let b = sign_body("email.us-east-1.amazonaws.com", b"{\"a\":1}");
    assert_eq!(a.authorization, b.authorization);
    assert_eq!(a.canonical_request, b.canonical_request);
}

#[test]
fn test_message_and_equivalent_payload_sign_identically() {
    let message = MessageBuilder::new()
        .from("Sender <sender@example.com>")
        .to("Alice <alice@example.com>")
        .bcc("audit@example.com")
        .subject("Report")
        .text("Numbers attached")
        .build()
        .unwrap();

    let payload = json!({
        "Content": { "Raw": { "Data": RawContent::encode(message.as_bytes()).data } },
        "ReplyToAddresses": [],
        "FromEmailAddress": "Sender <sender@example.com>",
        "Destination": {
            "BccAddresses": ["audit@example.com"],
            "CcAddresses": [],
            "ToAddresses": ["Alice <alice@example.com>"]
        }
    });

    let message_body = EmailRequest::Message(message).to_body().unwrap();
    let payload_body = EmailRequest::Payload(payload).to_body().unwrap();
    assert_eq!(message_body, payload_body);

    let a = sign_body("email.us-east-1.amazonaws.com", &message_body);
    let b = sign_body("email.us-east-1.amazonaws.com", &payload_body);
    assert_eq!(a.request_hash, b.request_hash);
}

#[test]
fn test_raw_data_round_trips_message_bytes() {
    let message = MessageBuilder::new()
        .from("sender@example.com")
        .to("recipient@example.com")
        .subject("Grüße")
        .text("Ünïcödé body")
        .html("<p>Ünïcödé body</p>")
        .build()
        .unwrap();

    let body = EmailRequest::Message(message.clone()).to_body().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let raw = RawContent {
        data: value["Content"]["Raw"]["Data"].as_str().unwrap().to_string(),
    };

    assert_eq!(raw.decode().unwrap(), message.as_bytes());
}
