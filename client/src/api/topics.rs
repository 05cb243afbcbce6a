use serde::{Deserialize, Serialize};

use crate::{http::Client, query::QueryParams, ApiResponse, Result};

pub const DEFAULT_TRENDING_LIMIT: u32 = 10;

const FAILURE: &str = "Topic search failed";

/// Parameters for a topic search. Every source is included unless turned off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSearch {
    pub query: String,
    pub include_trends: bool,
    pub include_reddit: bool,
    pub include_youtube: bool,
}

impl Default for TopicSearch {
    fn default() -> Self {
        Self {
            query: String::new(),
            include_trends: true,
            include_reddit: true,
            include_youtube: true,
        }
    }
}

impl TopicSearch {
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .push("query", &self.query)
            .push("include_trends", self.include_trends)
            .push("include_reddit", self.include_reddit)
            .push("include_youtube", self.include_youtube)
    }
}

/// `/api/topics/*`
#[derive(Debug, Clone, Copy)]
pub struct Topics<'a> {
    client: &'a Client,
}

impl<'a> Topics<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn search(&self, params: &TopicSearch) -> Result<ApiResponse> {
        self.client
            .get("/api/topics/search", params.to_query())
            .await
            .inspect_err(|e| super::log_failure(self.client, FAILURE, "search", e))
    }

    /// Same search, with the parameters sent as a JSON body.
    pub async fn search_post(&self, params: &TopicSearch) -> Result<ApiResponse> {
        self.client
            .post("/api/topics/search", QueryParams::new(), params)
            .await
            .inspect_err(|e| super::log_failure(self.client, FAILURE, "search_post", e))
    }

    /// Currently trending topics; `limit` defaults to 10.
    pub async fn trending(&self, limit: Option<u32>) -> Result<ApiResponse> {
        let query = QueryParams::new().push("limit", limit.unwrap_or(DEFAULT_TRENDING_LIMIT));
        self.client
            .get("/api/topics/trending", query)
            .await
            .inspect_err(|e| super::log_failure(self.client, FAILURE, "trending", e))
    }
}
