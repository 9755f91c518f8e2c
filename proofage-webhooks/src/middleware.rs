// Middleware adapter for the webhook gate

use crate::WebhookGate;
use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use proofage_config::{ConfigError, ConfigResolver};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::trace;

/// Buffered inbound request.
pub type WebhookRequest = Request<Bytes>;

/// Response returned to the webhook sender.
pub type WebhookResponse = Response<Bytes>;

/// Type alias for the next handler in the middleware chain
pub type Next = Box<
    dyn FnOnce(WebhookRequest) -> Pin<Box<dyn Future<Output = WebhookResponse> + Send>> + Send,
>;

/// Wrap an async handler as a [`Next`] continuation.
pub fn next_fn<F, Fut>(handler: F) -> Next
where
    F: FnOnce(WebhookRequest) -> Fut + Send + 'static,
    Fut: Future<Output = WebhookResponse> + Send + 'static,
{
    Box::new(move |req| Box::pin(handler(req)))
}

/// Middleware trait for processing requests before they reach the handler
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Process the request and optionally pass to next middleware
    async fn handle(&self, req: WebhookRequest, next: Next) -> WebhookResponse;
}

/// Refuses webhooks that fail [`WebhookGate::check`].
///
/// Accepted requests reach `next` with the
/// [`WebhookEnvelope`](crate::WebhookEnvelope) in their extensions.
#[derive(Debug, Clone)]
pub struct VerifyWebhookSignature {
    gate: Arc<WebhookGate>,
}

impl VerifyWebhookSignature {
    pub fn new(gate: WebhookGate) -> Self {
        Self {
            gate: Arc::new(gate),
        }
    }

    /// Middleware for the workspace configured at `prefix`.
    pub fn for_prefix(resolver: &ConfigResolver, prefix: &str) -> Result<Self, ConfigError> {
        WebhookGate::for_prefix(resolver, prefix).map(Self::new)
    }

    pub fn gate(&self) -> &WebhookGate {
        &self.gate
    }
}

#[async_trait]
impl Middleware for VerifyWebhookSignature {
    async fn handle(&self, mut req: WebhookRequest, next: Next) -> WebhookResponse {
        match self.gate.check(req.headers(), req.body()) {
            Ok(envelope) => {
                trace!(prefix = %self.gate.prefix(), "Forwarding verified webhook");
                req.extensions_mut().insert(envelope);
                next(req).await
            }
            Err(rejection) => rejection.to_response(),
        }
    }
}
