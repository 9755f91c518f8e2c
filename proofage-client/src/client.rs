//! Signed ProofAge API client.

use crate::resources::{Verification, Verifications, Workspace};
use crate::{ClientOptions, ProofAgeError, Response, Result, RetryConfig};
use http::Method;
use http::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use proofage_config::{ResolvedConfig, SigningConfig, Validate};
use proofage_signing::{FileAttachment, HashedFile, PreparedBody, RequestSigner, SignedRequest};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP client for the ProofAge API.
///
/// Every request is signed with the workspace secret and carries the
/// `X-API-Key` and `X-HMAC-Signature` headers. Cloning is cheap.
#[derive(Clone)]
pub struct ProofAgeClient {
    inner: reqwest::Client,
    signer: RequestSigner,
    base_url: Arc<str>,
    options: Arc<ClientOptions>,
}

impl ProofAgeClient {
    /// Create a client from signing credentials and transport options.
    pub fn new(config: SigningConfig, options: ClientOptions) -> Result<Self> {
        config.validate()?;
        let signer = RequestSigner::new(&config)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let inner = reqwest::Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .pool_max_idle_per_host(options.pool_max_idle_per_host)
            .user_agent(&options.user_agent)
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            inner,
            signer,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            options: Arc::new(options),
        })
    }

    /// Create a client from a resolved configuration record.
    pub fn from_resolved(config: &ResolvedConfig) -> Result<Self> {
        Self::new(config.signing_config()?, ClientOptions::from_resolved(config))
    }

    /// Get the client options.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// API version used in every request path.
    pub fn version(&self) -> &str {
        self.signer.version()
    }

    /// Full URL for an endpoint: `<base_url>/<version>/<endpoint>`.
    pub fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            self.signer.version(),
            endpoint.trim_start_matches('/')
        )
    }

    /// Workspace resource.
    pub fn workspace(&self) -> Workspace<'_> {
        Workspace::new(self)
    }

    /// Verification collection resource.
    pub fn verifications(&self) -> Verifications<'_> {
        Verifications::new(self)
    }

    /// A single verification by id.
    pub fn verification(&self, id: impl Into<String>) -> Verification<'_> {
        Verification::new(self, id.into())
    }

    /// Send a signed request and return the parsed JSON body.
    ///
    /// Non-success responses are mapped to [`ProofAgeError`]; an empty
    /// success body yields `null`.
    pub async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        data: Option<&Value>,
        files: &[FileAttachment],
    ) -> Result<Value> {
        self.send(method, endpoint, data, files).await?.json_value()
    }

    /// Send a signed request with retries and return the successful response.
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        data: Option<&Value>,
        files: &[FileAttachment],
    ) -> Result<Response> {
        let url = self.build_url(endpoint);
        let retry = &self.options.retry;
        let mut attempt = 0;

        loop {
            attempt += 1;

            // Signed per attempt so the headers always describe the bytes on the wire.
            let signed = self.prepare(&method, endpoint, data, files).await?;
            let request = self.build_request(&url, &signed)?;

            debug!(attempt, method = %method, url = %url, "Sending ProofAge request");

            let error = match self.execute_once(request).await {
                Ok(response) if response.is_success() => {
                    debug!(status = %response.status(), "ProofAge request succeeded");
                    return Ok(response);
                }
                Ok(response) => ProofAgeError::from_response(&response),
                Err(e) => e,
            };

            if !retry.should_retry(attempt, &error) {
                return Err(final_error(retry, attempt, error));
            }

            let delay = retry.delay();
            warn!(
                attempt,
                status = error.status_code(),
                delay_ms = delay.as_millis() as u64,
                "Retrying ProofAge request"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Execute request once without retry.
    async fn execute_once(&self, request: reqwest::Request) -> Result<Response> {
        let response = self.inner.execute(request).await?;
        Response::from_reqwest(response).await
    }

    async fn prepare(
        &self,
        method: &Method,
        endpoint: &str,
        data: Option<&Value>,
        files: &[FileAttachment],
    ) -> Result<SignedRequest> {
        if files.is_empty() {
            return Ok(self.signer.prepare(method.as_str(), endpoint, data, files)?);
        }

        // Attachments are read and hashed off the async runtime.
        let signer = self.signer.clone();
        let method = method.to_string();
        let endpoint = endpoint.to_string();
        let data = data.cloned();
        let files = files.to_vec();

        let signed = tokio::task::spawn_blocking(move || {
            signer.prepare(&method, &endpoint, data.as_ref(), &files)
        })
        .await
        .map_err(|e| ProofAgeError::Internal(e.to_string()))??;

        Ok(signed)
    }

    fn build_request(&self, url: &str, signed: &SignedRequest) -> Result<reqwest::Request> {
        let method = Method::from_bytes(signed.method.as_bytes())
            .map_err(|e| ProofAgeError::Configuration(e.to_string()))?;
        let mut builder = self.inner.request(method, url);

        for (name, value) in self.signer.headers(signed) {
            builder = builder.header(name, value);
        }

        builder = match &signed.body {
            PreparedBody::Empty => builder,
            PreparedBody::Json(bytes) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(bytes.clone()),
            PreparedBody::Multipart { fields, files } => {
                builder.multipart(multipart_form(fields, files))
            }
        };

        Ok(builder.build()?)
    }
}

impl std::fmt::Debug for ProofAgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofAgeClient")
            .field("base_url", &self.base_url)
            .field("version", &self.signer.version())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn multipart_form(fields: &[(String, String)], files: &[HashedFile]) -> Form {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name.clone(), value.clone());
    }
    for file in files {
        let mut part = Part::bytes(file.content.to_vec());
        if let Some(file_name) = &file.file_name {
            part = part.file_name(file_name.clone());
        }
        form = form.part(file.field.clone(), part);
    }
    form
}

/// A retryable transport failure that used up the attempt budget becomes
/// `RetryExhausted`; anything else is returned as is.
fn final_error(retry: &RetryConfig, attempt: u32, error: ProofAgeError) -> ProofAgeError {
    let exhausted = attempt > 1 && attempt >= retry.attempts() && retry.retries_error(&error);

    match error {
        ProofAgeError::Transport(e) if exhausted => ProofAgeError::RetryExhausted {
            attempts: attempt,
            message: e.to_string(),
        },
        other => other,
    }
}
