//! Property tests for canonicalization, signing and verification.

use proofage_config::SigningConfig;
use proofage_signing::{FileAttachment, RequestSigner, WebhookSignatureVerifier};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn signer(secret: &str) -> RequestSigner {
    let config = SigningConfig::new("pk_prop", secret, "https://api.proofage.xyz").unwrap();
    RequestSigner::new(&config).unwrap()
}

fn object_from(entries: &[(String, String)]) -> Value {
    let mut map = Map::new();
    for (key, value) in entries {
        map.insert(key.clone(), Value::String(value.clone()));
    }
    Value::Object(map)
}

/// Same entries, keys inserted in reverse and nested one level down as well.
fn nested_from(entries: &[(String, String)], reverse: bool) -> Value {
    let mut ordered = entries.to_vec();
    if reverse {
        ordered.reverse();
    }
    let mut map = Map::new();
    for (key, value) in &ordered {
        map.insert(key.clone(), Value::String(value.clone()));
    }
    map.insert("zz_nested".to_string(), object_from(&ordered));
    Value::Object(map)
}

fn entries() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map("[a-z_]{1,8}", ".{0,16}", 1..8)
        .prop_map(|map| map.into_iter().collect())
}

proptest! {
    #[test]
    fn signing_is_deterministic(
        method in prop::sample::select(vec!["GET", "POST", "PUT", "DELETE"]),
        endpoint in "[a-z/]{1,24}",
        fields in entries(),
    ) {
        let body = object_from(&fields);
        let signer = signer("secret");

        let first = signer.sign(method, &endpoint, Some(&body), &[]).unwrap();
        let second = signer.sign(method, &endpoint, Some(&body), &[]).unwrap();
        prop_assert_eq!(first.len(), 64);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn multipart_fields_are_order_independent(fields in entries()) {
        let mut reversed = fields.clone();
        reversed.reverse();

        let file = FileAttachment::from_bytes("file", "a.bin", vec![1u8, 2, 3]);
        let signer = signer("secret");

        let forward = signer
            .sign("POST", "media", Some(&object_from(&fields)), std::slice::from_ref(&file))
            .unwrap();
        let backward = signer
            .sign("POST", "media", Some(&object_from(&reversed)), std::slice::from_ref(&file))
            .unwrap();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn nested_key_order_does_not_change_signature(fields in entries()) {
        prop_assume!(fields.len() > 1);

        let forward = nested_from(&fields, false);
        let backward = nested_from(&fields, true);
        prop_assert_ne!(
            serde_json::to_string(&forward).unwrap(),
            serde_json::to_string(&backward).unwrap()
        );

        let signer = signer("secret");
        let file = FileAttachment::from_bytes("file", "a.bin", vec![9u8; 4]);

        prop_assert_eq!(
            signer.sign("POST", "verifications", Some(&forward), &[]).unwrap(),
            signer.sign("POST", "verifications", Some(&backward), &[]).unwrap()
        );
        prop_assert_eq!(
            signer.sign("POST", "media", Some(&forward), std::slice::from_ref(&file)).unwrap(),
            signer.sign("POST", "media", Some(&backward), std::slice::from_ref(&file)).unwrap()
        );
    }

    #[test]
    fn webhook_round_trip(body in prop::collection::vec(any::<u8>(), 0..256), timestamp in any::<i64>()) {
        let verifier = WebhookSignatureVerifier::new("round-trip-secret");
        let signature = verifier.generate_signature(&body, timestamp);
        prop_assert!(verifier.verify(&body, timestamp, &signature));
    }

    #[test]
    fn webhook_tampering_is_detected(
        body in prop::collection::vec(any::<u8>(), 1..256),
        index in any::<prop::sample::Index>(),
        flip in 1u8..=255,
        timestamp in 0i64..4_000_000_000,
    ) {
        let verifier = WebhookSignatureVerifier::new("tamper-secret");
        let signature = verifier.generate_signature(&body, timestamp);

        let mut tampered = body.clone();
        let i = index.index(tampered.len());
        tampered[i] ^= flip;

        prop_assert!(!verifier.verify(&tampered, timestamp, &signature));
        prop_assert!(!verifier.verify(&body, timestamp + 1, &signature));
        prop_assert!(!WebhookSignatureVerifier::new("tamper-secret2").verify(&body, timestamp, &signature));
    }

    #[test]
    fn timestamp_boundaries(now in -1_000_000_000i64..4_000_000_000, tolerance in 0u64..100_000) {
        let verifier = WebhookSignatureVerifier::new("secret").with_tolerance(tolerance);
        let t = tolerance as i64;

        prop_assert!(verifier.is_timestamp_valid_at(now - t, now));
        prop_assert!(verifier.is_timestamp_valid_at(now + t, now));
        prop_assert!(!verifier.is_timestamp_valid_at(now - t - 1, now));
        prop_assert!(!verifier.is_timestamp_valid_at(now + t + 1, now));
    }
}
