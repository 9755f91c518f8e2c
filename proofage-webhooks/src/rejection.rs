//! Webhook rejection codes.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{Response, StatusCode};
use serde_json::{Value, json};
use thiserror::Error;

/// Why an inbound webhook was refused.
///
/// Messages are fixed strings; no rejection ever carries secret material
/// or the expected signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum WebhookRejection {
    #[error("X-HMAC-Signature header is required")]
    MissingSignature,

    #[error("X-Timestamp header is required")]
    MissingTimestamp,

    #[error("X-Auth-Client header is required")]
    MissingAuthClient,

    /// The receiving side has no API key or secret for this prefix.
    #[error("Middleware configuration is incomplete")]
    ConfigurationError,

    #[error("X-Auth-Client header is invalid")]
    InvalidAuthClient,

    /// Timestamp unparseable or outside the tolerance window, in either direction.
    #[error("Timestamp is too old")]
    TimestampTooOld,

    #[error("HMAC signature is invalid")]
    InvalidSignature,
}

impl WebhookRejection {
    /// Every rejection, in the order the gate checks for them.
    pub const ALL: [WebhookRejection; 7] = [
        Self::MissingSignature,
        Self::MissingTimestamp,
        Self::MissingAuthClient,
        Self::ConfigurationError,
        Self::InvalidAuthClient,
        Self::TimestampTooOld,
        Self::InvalidSignature,
    ];

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingSignature => "MISSING_SIGNATURE",
            Self::MissingTimestamp => "MISSING_TIMESTAMP",
            Self::MissingAuthClient => "MISSING_AUTH_CLIENT",
            Self::ConfigurationError => "CONFIGURATION_ERROR",
            Self::InvalidAuthClient => "INVALID_AUTH_CLIENT",
            Self::TimestampTooOld => "TIMESTAMP_TOO_OLD",
            Self::InvalidSignature => "INVALID_SIGNATURE",
        }
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// 418 for a misconfigured receiver, 401 for everything the sender got wrong.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ConfigurationError => StatusCode::IM_A_TEAPOT,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigurationError)
    }

    /// `{"error":{"code":...,"message":...}}`
    pub fn body(&self) -> Value {
        json!({
            "error": {
                "code": self.code(),
                "message": self.message(),
            }
        })
    }

    /// JSON response returned to the webhook sender.
    pub fn to_response(&self) -> Response<Bytes> {
        let mut response = Response::new(Bytes::from(self.body().to_string()));
        *response.status_mut() = self.status();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let mut codes: Vec<_> = WebhookRejection::ALL.iter().map(|r| r.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), WebhookRejection::ALL.len());
    }

    #[test]
    fn test_statuses() {
        for rejection in WebhookRejection::ALL {
            let expected = if rejection.is_configuration() {
                StatusCode::IM_A_TEAPOT
            } else {
                StatusCode::UNAUTHORIZED
            };
            assert_eq!(rejection.status(), expected, "{}", rejection.code());
        }
    }

    #[test]
    fn test_response_body() {
        let response = WebhookRejection::InvalidSignature.to_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"]["code"], "INVALID_SIGNATURE");
        assert_eq!(body["error"]["message"], "HMAC signature is invalid");
    }
}
