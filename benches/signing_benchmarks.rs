//! Signing and verification benchmarks for proofage-signing

use criterion::{Criterion, criterion_group, criterion_main};
use proofage_config::SigningConfig;
use proofage_signing::canonical::form_fields;
use proofage_signing::{FileAttachment, RequestSigner, WebhookSignatureVerifier};
use serde_json::json;
use std::hint::black_box;

fn signer() -> RequestSigner {
    let config = SigningConfig::new("pk_bench", "bench-secret", "https://api.proofage.xyz")
        .expect("valid config");
    RequestSigner::new(&config).expect("valid signer")
}

fn request_signing_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_signing");
    let signer = signer();

    let body = json!({
        "callback_url": "https://example.com/webhook",
        "metadata": {"user_id": 42, "tags": ["a", "b", "c"]},
    });

    group.bench_function("empty_body", |b| {
        b.iter(|| black_box(signer.sign("GET", "workspace", None, &[])))
    });

    group.bench_function("json_body", |b| {
        b.iter(|| black_box(signer.sign("POST", "verifications", Some(&body), &[])))
    });

    let files = [
        FileAttachment::from_bytes("file", "selfie.jpg", vec![7u8; 64 * 1024]),
        FileAttachment::from_bytes("back", "id_back.jpg", vec![9u8; 64 * 1024]),
    ];
    let fields = json!({"type": "selfie", "meta": {"side": "front"}});

    group.bench_function("multipart_128k", |b| {
        b.iter(|| {
            black_box(signer.sign("POST", "verifications/abc/media", Some(&fields), &files))
        })
    });

    group.finish();
}

fn form_canonicalization_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("form_canonicalization");

    let nested = json!({
        "profile": {"name": "Ada", "age": 36, "verified": true},
        "documents": [{"kind": "passport"}, {"kind": "selfie"}],
        "note": "a/b c+d",
    });

    group.bench_function("nested_fields", |b| {
        b.iter(|| black_box(form_fields(Some(&nested))))
    });

    group.finish();
}

fn webhook_verification_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("webhook_verification");
    let verifier = WebhookSignatureVerifier::new("bench-secret");
    let payload = br#"{"event":"verification.completed","id":"ver_123"}"#;
    let signature = verifier.generate_signature(payload, 1_700_000_000);

    group.bench_function("verify_valid", |b| {
        b.iter(|| black_box(verifier.verify(payload, 1_700_000_000, &signature)))
    });

    group.bench_function("verify_invalid", |b| {
        b.iter(|| black_box(verifier.verify(payload, 1_700_000_000, "deadbeef")))
    });

    group.finish();
}

criterion_group!(
    benches,
    request_signing_benchmark,
    form_canonicalization_benchmark,
    webhook_verification_benchmark
);
criterion_main!(benches);
