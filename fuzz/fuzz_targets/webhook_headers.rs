//! Fuzz target for inbound webhook header handling.
//!
//! Arbitrary header values and bodies must never panic the gate, and a
//! request is only accepted when its signature really matches.

#![no_main]

use arbitrary::Arbitrary;
use http::{HeaderMap, HeaderValue};
use libfuzzer_sys::fuzz_target;
use proofage_signing::WebhookSignatureVerifier;
use proofage_signing::headers::{AUTH_CLIENT, SIGNATURE, TIMESTAMP};
use proofage_webhooks::WebhookGate;

const API_KEY: &str = "pk_fuzz";
const SECRET: &str = "fuzz-secret";

#[derive(Debug, Arbitrary)]
struct FuzzWebhook {
    signature: Option<Vec<u8>>,
    timestamp: Option<Vec<u8>>,
    auth_client: Option<Vec<u8>>,
    body: Vec<u8>,
    now: i64,
    /// Sign the body correctly instead of using `signature`.
    sign: bool,
}

fn insert(headers: &mut HeaderMap, name: &'static str, value: Option<&[u8]>) {
    if let Some(value) = value.and_then(|v| HeaderValue::from_bytes(v).ok()) {
        headers.insert(name, value);
    }
}

fuzz_target!(|data: FuzzWebhook| {
    let gate = WebhookGate::new(API_KEY, SECRET);
    let verifier = WebhookSignatureVerifier::new(SECRET);

    let mut headers = HeaderMap::new();
    let signature = match (data.sign, &data.timestamp) {
        (true, Some(ts)) => std::str::from_utf8(ts)
            .ok()
            .and_then(|ts| ts.trim().parse::<i64>().ok())
            .map(|ts| verifier.generate_signature(&data.body, ts).into_bytes()),
        _ => data.signature.clone(),
    };
    insert(&mut headers, SIGNATURE, signature.as_deref());
    insert(&mut headers, TIMESTAMP, data.timestamp.as_deref());
    insert(&mut headers, AUTH_CLIENT, data.auth_client.as_deref());

    if let Ok(envelope) = gate.check_at(&headers, &data.body, data.now) {
        assert_eq!(envelope.auth_client, API_KEY);
        assert!(envelope.timestamp.abs_diff(data.now) <= gate.tolerance());
        assert!(verifier.verify(&data.body, envelope.timestamp, &envelope.signature));
        assert_eq!(&envelope.raw_body[..], &data.body[..]);
    }
});
