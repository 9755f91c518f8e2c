use crate::{ProofAgeClient, Result};
use http::Method;
use proofage_signing::FileAttachment;
use serde_json::Value;

/// The verification collection.
#[derive(Debug, Clone, Copy)]
pub struct Verifications<'a> {
    client: &'a ProofAgeClient,
}

impl<'a> Verifications<'a> {
    pub(crate) fn new(client: &'a ProofAgeClient) -> Self {
        Self { client }
    }

    /// `POST /verifications`
    pub async fn create(&self, data: &Value) -> Result<Value> {
        self.client
            .make_request(Method::POST, "verifications", Some(data), &[])
            .await
    }

    /// `GET /verifications/{id}`
    pub async fn find(&self, id: &str) -> Result<Value> {
        Verification::new(self.client, id.to_string()).get().await
    }
}

/// One verification, addressed by id.
#[derive(Debug, Clone)]
pub struct Verification<'a> {
    client: &'a ProofAgeClient,
    id: String,
}

impl<'a> Verification<'a> {
    pub(crate) fn new(client: &'a ProofAgeClient, id: String) -> Self {
        Self { client, id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn endpoint(&self, action: Option<&str>) -> String {
        match action {
            Some(action) => format!("verifications/{}/{}", self.id, action),
            None => format!("verifications/{}", self.id),
        }
    }

    /// `GET /verifications/{id}`
    pub async fn get(&self) -> Result<Value> {
        self.client
            .make_request(Method::GET, &self.endpoint(None), None, &[])
            .await
    }

    /// `POST /verifications/{id}/consent`
    pub async fn accept_consent(&self, data: &Value) -> Result<Value> {
        self.client
            .make_request(Method::POST, &self.endpoint(Some("consent")), Some(data), &[])
            .await
    }

    /// `POST /verifications/{id}/media` as multipart, with `fields` sent as
    /// form fields alongside the file.
    pub async fn upload_media(&self, fields: &Value, file: FileAttachment) -> Result<Value> {
        self.client
            .make_request(
                Method::POST,
                &self.endpoint(Some("media")),
                Some(fields),
                std::slice::from_ref(&file),
            )
            .await
    }

    /// `POST /verifications/{id}/submit`
    pub async fn submit(&self) -> Result<Value> {
        self.client
            .make_request(Method::POST, &self.endpoint(Some("submit")), None, &[])
            .await
    }
}
