//! Fuzz target for multipart form-field canonicalization.
//!
//! Arbitrary JSON documents are flattened into form fields. Flattening must
//! be deterministic and the encoded form must not contain reserved characters.

#![no_main]

use libfuzzer_sys::fuzz_target;
use proofage_signing::canonical::{encode_fields, form_fields};

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    let Ok(fields) = form_fields(Some(&value)) else {
        return;
    };

    assert_eq!(form_fields(Some(&value)).ok().as_ref(), Some(&fields));

    let encoded = encode_fields(&fields);
    assert!(!encoded.contains(' '));
    assert!(!encoded.contains('['));
    assert_eq!(encoded.matches('&').count() + 1, fields.len().max(1));
});
