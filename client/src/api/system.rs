use crate::{http::Client, query::QueryParams, ApiResponse, Result};

const FAILURE: &str = "System request failed";

/// Service health and metadata.
#[derive(Debug, Clone, Copy)]
pub struct System<'a> {
    client: &'a Client,
}

impl<'a> System<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn health(&self) -> Result<ApiResponse> {
        self.client
            .get("/health", QueryParams::new())
            .await
            .inspect_err(|e| super::log_failure(self.client, FAILURE, "health", e))
    }

    /// `GET /`, the service banner.
    pub async fn root(&self) -> Result<ApiResponse> {
        self.client
            .get("/", QueryParams::new())
            .await
            .inspect_err(|e| super::log_failure(self.client, FAILURE, "root", e))
    }
}
