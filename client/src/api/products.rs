use serde::{Deserialize, Serialize};

use crate::{http::Client, query::QueryParams, ApiResponse, Result};

pub const DEFAULT_PRODUCT_TYPES: [&str; 3] = ["ebook", "course", "template"];
pub const DEFAULT_MIN_DIFFICULTY: u8 = 1;
pub const DEFAULT_MAX_DIFFICULTY: u8 = 10;
pub const DEFAULT_REVENUE_POTENTIAL: &str = "any";

const FAILURE: &str = "Product search failed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSearch {
    pub query: String,
    pub product_types: Vec<String>,
    pub min_difficulty: u8,
    pub max_difficulty: u8,
    pub revenue_potential: String,
}

impl Default for ProductSearch {
    fn default() -> Self {
        Self {
            query: String::new(),
            product_types: DEFAULT_PRODUCT_TYPES.iter().map(|t| t.to_string()).collect(),
            min_difficulty: DEFAULT_MIN_DIFFICULTY,
            max_difficulty: DEFAULT_MAX_DIFFICULTY,
            revenue_potential: DEFAULT_REVENUE_POTENTIAL.to_string(),
        }
    }
}

impl ProductSearch {
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .push("query", &self.query)
            .push_all("product_types", &self.product_types)
            .push("min_difficulty", self.min_difficulty)
            .push("max_difficulty", self.max_difficulty)
            .push("revenue_potential", &self.revenue_potential)
    }
}

/// `/api/products/*`
#[derive(Debug, Clone, Copy)]
pub struct Products<'a> {
    client: &'a Client,
}

impl<'a> Products<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn search(&self, params: &ProductSearch) -> Result<ApiResponse> {
        self.client
            .get("/api/products/search", params.to_query())
            .await
            .inspect_err(|e| super::log_failure(self.client, FAILURE, "search", e))
    }

    pub async fn search_post(&self, params: &ProductSearch) -> Result<ApiResponse> {
        self.client
            .post("/api/products/search", QueryParams::new(), params)
            .await
            .inspect_err(|e| super::log_failure(self.client, FAILURE, "search_post", e))
    }

    pub async fn categories(&self) -> Result<ApiResponse> {
        self.client
            .get("/api/products/categories", QueryParams::new())
            .await
            .inspect_err(|e| super::log_failure(self.client, FAILURE, "categories", e))
    }

    /// Trending products; the server picks the limit when none is given.
    pub async fn trending(&self, limit: Option<u32>) -> Result<ApiResponse> {
        self.client
            .get(
                "/api/products/trending",
                QueryParams::new().push_opt("limit", limit),
            )
            .await
            .inspect_err(|e| super::log_failure(self.client, FAILURE, "trending", e))
    }
}
