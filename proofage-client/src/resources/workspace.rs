use crate::{ProofAgeClient, Result};
use http::Method;
use serde_json::Value;

/// The workspace the API key belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Workspace<'a> {
    client: &'a ProofAgeClient,
}

impl<'a> Workspace<'a> {
    pub(crate) fn new(client: &'a ProofAgeClient) -> Self {
        Self { client }
    }

    /// `GET /workspace`
    pub async fn get(&self) -> Result<Value> {
        self.client
            .make_request(Method::GET, "workspace", None, &[])
            .await
    }

    /// `GET /consent`: the consent text end users must accept.
    pub async fn consent(&self) -> Result<Value> {
        self.client
            .make_request(Method::GET, "consent", None, &[])
            .await
    }
}
