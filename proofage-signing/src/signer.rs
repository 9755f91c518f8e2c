//! Outbound request signing.

use crate::attachment::{FileAttachment, HashedFile};
use crate::canonical::{CanonicalRequest, canonical_path, form_fields, json_payload};
use crate::headers;
use crate::mac::hmac_sha256_hex;
use crate::{Result, SigningError};
use bytes::Bytes;
use proofage_config::{SecretKey, SigningConfig};
use serde_json::Value;
use tracing::debug;

/// Signs outbound API calls with `HMAC-SHA256(secret_key, canonical request)`.
///
/// Stateless: identical inputs always produce the identical signature, so a
/// retried request can simply be signed again.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    api_key: String,
    secret_key: SecretKey,
    version: String,
}

/// Body of a signed request, holding the exact bytes that were signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedBody {
    Empty,
    Json(Bytes),
    Multipart {
        fields: Vec<(String, String)>,
        files: Vec<HashedFile>,
    },
}

/// A request ready for transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Uppercased HTTP method.
    pub method: String,
    /// `/<version>/<endpoint>`.
    pub path: String,
    /// 64-character lowercase hex digest.
    pub signature: String,
    pub body: PreparedBody,
}

impl RequestSigner {
    /// Build a signer, failing if either credential is missing.
    pub fn new(config: &SigningConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(SigningError::Configuration("API key is required".to_string()));
        }
        if config.secret_key.is_empty() {
            return Err(SigningError::Configuration(
                "Secret key is required".to_string(),
            ));
        }

        Ok(Self {
            api_key: config.api_key.clone(),
            secret_key: config.secret_key.clone(),
            version: config.version.clone(),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Signature for a request. Inputs are not modified.
    pub fn sign(
        &self,
        method: &str,
        endpoint: &str,
        data: Option<&Value>,
        files: &[FileAttachment],
    ) -> Result<String> {
        self.prepare(method, endpoint, data, files)
            .map(|signed| signed.signature)
    }

    /// Canonicalize, sign and capture the body to transmit.
    ///
    /// With attachments the request is multipart and every file is read in
    /// full; call this off latency-sensitive threads in that case.
    pub fn prepare(
        &self,
        method: &str,
        endpoint: &str,
        data: Option<&Value>,
        files: &[FileAttachment],
    ) -> Result<SignedRequest> {
        let method = method.to_ascii_uppercase();
        let path = canonical_path(&self.version, endpoint);

        let (canonical, body) = if files.is_empty() {
            match json_payload(data)? {
                Some(json) => (
                    CanonicalRequest::json(&method, &path, Some(&json)),
                    PreparedBody::Json(Bytes::from(json)),
                ),
                None => (
                    CanonicalRequest::json(&method, &path, None),
                    PreparedBody::Empty,
                ),
            }
        } else {
            let fields = form_fields(data)?;
            let files = files
                .iter()
                .map(FileAttachment::load)
                .collect::<Result<Vec<_>>>()?;
            (
                CanonicalRequest::multipart(&method, &path, &fields, &files),
                PreparedBody::Multipart { fields, files },
            )
        };

        let signature = self.sign_canonical(&canonical);

        debug!(
            method = %method,
            path = %path,
            multipart = matches!(body, PreparedBody::Multipart { .. }),
            "Signed outbound request"
        );

        Ok(SignedRequest {
            method,
            path,
            signature,
            body,
        })
    }

    /// HMAC-SHA256 of an already canonicalized request.
    pub fn sign_canonical(&self, canonical: &CanonicalRequest) -> String {
        hmac_sha256_hex(self.secret_key.expose(), &[canonical.as_bytes()])
    }

    /// Authentication headers for a signed request.
    pub fn headers(&self, signed: &SignedRequest) -> [(&'static str, String); 2] {
        [
            (headers::API_KEY, self.api_key.clone()),
            (headers::SIGNATURE, signed.signature.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signer() -> RequestSigner {
        let config =
            SigningConfig::new("pk_test", "test-secret-key", "https://api.proofage.xyz").unwrap();
        RequestSigner::new(&config).unwrap()
    }

    #[test]
    fn test_json_signature_known_value() {
        let body = json!({"callback_url": "https://example.com/webhook"});
        let signature = signer()
            .sign("POST", "verifications", Some(&body), &[])
            .unwrap();

        assert_eq!(
            signature,
            "36b3b4817df54d6ddd794d614a30ce1e0d31ca27201151853d15a422610fd417"
        );
    }

    #[test]
    fn test_empty_body_signature_known_value() {
        let signature = signer().sign("get", "/workspace", None, &[]).unwrap();
        assert_eq!(
            signature,
            "96694aa9b5751e11f81f4c0e2ba7483ecd7b410051fb202a6206484506edc7ca"
        );
    }

    #[test]
    fn test_multipart_signature_known_value() {
        let data = json!({"type": "selfie", "meta": {"side": "front"}});
        let files = [
            FileAttachment::from_bytes("back", "b.jpg", &b"world"[..]),
            FileAttachment::from_bytes("file", "a.jpg", &b"hello"[..]),
        ];

        let signed = signer()
            .prepare("POST", "verifications/abc/media", Some(&data), &files)
            .unwrap();

        assert_eq!(
            signed.signature,
            "115f71fffc74bf48bd1bde46442d3135b06df8b73d6c4ffe2cbf2d292f6889bc"
        );
        match signed.body {
            PreparedBody::Multipart { fields, files } => {
                assert_eq!(fields[0].0, "meta[side]");
                assert_eq!(files.len(), 2);
                assert_eq!(files[1].content, Bytes::from_static(b"hello"));
            }
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[test]
    fn test_attachment_order_does_not_matter() {
        let a = FileAttachment::from_bytes("a", "a.jpg", &b"one"[..]);
        let b = FileAttachment::from_bytes("b", "b.jpg", &b"two"[..]);

        let first = signer().sign("POST", "upload", None, &[a.clone(), b.clone()]).unwrap();
        let second = signer().sign("POST", "upload", None, &[b, a]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_prepared_json_body_matches_signed_bytes() {
        let body = json!({"b": 1, "a": "x/y"});
        let signed = signer().prepare("post", "verifications", Some(&body), &[]).unwrap();

        assert_eq!(signed.method, "POST");
        assert_eq!(signed.path, "/v1/verifications");
        assert_eq!(
            signed.body,
            PreparedBody::Json(Bytes::from_static(br#"{"a":"x/y","b":1}"#))
        );
    }

    #[test]
    fn test_headers() {
        let signer = signer();
        let signed = signer.prepare("GET", "workspace", None, &[]).unwrap();
        let headers = signer.headers(&signed);

        assert_eq!(headers[0], ("X-API-Key", "pk_test".to_string()));
        assert_eq!(headers[1].0, "X-HMAC-Signature");
        assert_eq!(headers[1].1.len(), 64);
    }

    #[test]
    fn test_missing_credentials_fail_at_construction() {
        let mut config =
            SigningConfig::new("pk_test", "sk", "https://api.proofage.xyz").unwrap();
        config.secret_key = SecretKey::new("");

        assert!(matches!(
            RequestSigner::new(&config),
            Err(SigningError::Configuration(_))
        ));

        config.secret_key = SecretKey::new("sk");
        config.api_key = String::new();
        assert!(matches!(
            RequestSigner::new(&config),
            Err(SigningError::Configuration(_))
        ));
    }

    #[test]
    fn test_unreadable_attachment_propagates() {
        let files = [FileAttachment::from_path("file", "/no/such/file.png")];
        let result = signer().sign("POST", "upload", None, &files);
        assert!(matches!(result, Err(SigningError::FileRead { .. })));
    }
}
