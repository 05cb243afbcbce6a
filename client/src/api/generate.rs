use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{http::Client, query::QueryParams, ApiResponse, Result};

pub const DEFAULT_CAMPAIGN_PLATFORMS: [&str; 2] = ["facebook", "google"];
pub const DEFAULT_BUDGET_RANGE: &str = "medium";

const FAILURE: &str = "Content generation failed";

/// Input for offer generation. Fields the API accepts beyond the named ones
/// go in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferRequest {
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OfferRequest {
    pub fn new<S: Into<String>>(topic: S) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }
}

/// Input for ad copy generation, usually built around a generated offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdsRequest {
    pub offer: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Query side of a full campaign request. The product itself travels in the
/// body, see [`Generate::complete`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRequest {
    pub topic: String,
    pub platforms: Vec<String>,
    pub budget_range: String,
}

impl Default for CampaignRequest {
    fn default() -> Self {
        Self {
            topic: String::new(),
            platforms: DEFAULT_CAMPAIGN_PLATFORMS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            budget_range: DEFAULT_BUDGET_RANGE.to_string(),
        }
    }
}

impl CampaignRequest {
    pub fn new<S: Into<String>>(topic: S) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .push("topic", &self.topic)
            .push_all("platforms", &self.platforms)
            .push("budget_range", &self.budget_range)
    }
}

/// `/api/generate/*`
#[derive(Debug, Clone, Copy)]
pub struct Generate<'a> {
    client: &'a Client,
}

impl<'a> Generate<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn offer(&self, request: &OfferRequest) -> Result<ApiResponse> {
        self.client
            .post("/api/generate/offer", QueryParams::new(), request)
            .await
            .inspect_err(|e| super::log_failure(self.client, FAILURE, "offer", e))
    }

    pub async fn ads(&self, request: &AdsRequest) -> Result<ApiResponse> {
        self.client
            .post("/api/generate/ads", QueryParams::new(), request)
            .await
            .inspect_err(|e| super::log_failure(self.client, FAILURE, "ads", e))
    }

    /// Offer, ads and campaign plan in one call.
    ///
    /// `campaign` is sent as query parameters while `product` is sent as the
    /// JSON body of the same POST; the API expects this mixed shape.
    pub async fn complete<P>(&self, campaign: &CampaignRequest, product: &P) -> Result<ApiResponse>
    where
        P: Serialize + ?Sized,
    {
        self.client
            .post("/api/generate/complete", campaign.to_query(), product)
            .await
            .inspect_err(|e| super::log_failure(self.client, FAILURE, "complete", e))
    }

    pub async fn offer_templates(&self) -> Result<ApiResponse> {
        self.client
            .get("/api/generate/offer/templates", QueryParams::new())
            .await
            .inspect_err(|e| super::log_failure(self.client, FAILURE, "offer_templates", e))
    }

    pub async fn ad_platforms(&self) -> Result<ApiResponse> {
        self.client
            .get("/api/generate/ads/platforms", QueryParams::new())
            .await
            .inspect_err(|e| super::log_failure(self.client, FAILURE, "ad_platforms", e))
    }
}
