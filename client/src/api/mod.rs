//! Endpoint groups.
//!
//! Each group borrows the [`Client`](crate::Client) and maps one method to
//! one remote operation. On failure the group logs its own line and returns
//! the error exactly as the client produced it.

mod generate;
mod products;
mod system;
mod topics;

pub use generate::{AdsRequest, CampaignRequest, Generate, OfferRequest};
pub use products::{ProductSearch, Products};
pub use system::System;
pub use topics::{TopicSearch, Topics};

use crate::{http::Client, ClientError};

/// Log a failed call on behalf of an endpoint group.
fn log_failure(client: &Client, message: &str, operation: &str, err: &ClientError) {
    client.diagnostics().error(
        message,
        &[
            ("operation", operation.to_string()),
            ("error", err.to_string()),
        ],
    );
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::logger::testing::RecordingLogger;
    use crate::{Client, ClientConfig};
    use std::sync::Arc;
    use wiremock::MockServer;

    pub fn client_for(server: &MockServer) -> (Client, Arc<RecordingLogger>) {
        let recorder = Arc::new(RecordingLogger::default());
        let config = ClientConfig::new(&server.uri()).unwrap();
        (Client::with_logger(config, recorder.clone()).unwrap(), recorder)
    }

    /// Query pairs of a received request, minus the cache-busting stamp.
    pub fn caller_query(request: &wiremock::Request) -> Vec<(String, String)> {
        request
            .url
            .query_pairs()
            .filter(|(k, _)| k != crate::query::CACHE_BUST_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    pub fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}
