use crate::{
    api::{Generate, Products, System, Topics},
    config::ClientConfig,
    logger::{Diagnostics, LogFacade, Logger},
    middleware::build_pipeline,
    query::QueryParams,
    ApiResponse, ClientError, Result,
};
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use reqwest_middleware::ClientWithMiddleware;
use serde::{de::DeserializeOwned, Serialize};

/// Handle to the TrendLab API.
///
/// Build one at startup and clone it wherever it is needed; clones share the
/// same connection pool and configuration.
#[derive(Clone, Debug)]
pub struct Client {
    base_url: String,
    http: ClientWithMiddleware,
    config: Arc<ClientConfig>,
    diagnostics: Diagnostics,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_logger(config, Arc::new(LogFacade))
    }

    /// Configured from `TRENDLAB_API_URL` / `TRENDLAB_ENV`.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn with_logger(config: ClientConfig, logger: Arc<dyn Logger>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        let diagnostics = Diagnostics::new(logger, config.verbose);
        Ok(Self {
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            http: build_pipeline(inner, &diagnostics),
            config: Arc::new(config),
            diagnostics,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // Endpoint groups
    pub fn topics(&self) -> Topics<'_> {
        Topics::new(self)
    }

    pub fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    pub fn generate(&self) -> Generate<'_> {
        Generate::new(self)
    }

    pub fn system(&self) -> System<'_> {
        System::new(self)
    }

    pub(crate) fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub(crate) async fn get(&self, path: &str, query: QueryParams) -> Result<ApiResponse> {
        self.request::<ApiResponse, ()>(Method::GET, path, query, None)
            .await
    }

    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        query: QueryParams,
        body: &B,
    ) -> Result<ApiResponse> {
        self.request::<ApiResponse, B>(Method::POST, path, query, Some(body))
            .await
    }

    /// Send one request through the interceptor pipeline and decode the body.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: QueryParams,
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method, &url);

        if !query.is_empty() {
            builder = builder.query(query.pairs());
        }
        if let Some(body) = body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        self.handle_response::<T>(response, path).await
    }

    async fn handle_response<T>(&self, response: reqwest::Response, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let raw = response.text().await?;
        let body = serde_json::from_str::<serde_json::Value>(&raw).ok();
        Err(ClientError::Status {
            status,
            path: path.to_string(),
            body,
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::client_for;
    use crate::logger::Level;
    use crate::query::CACHE_BUST_PARAM;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_base_url_is_trimmed() {
        let client = Client::new(ClientConfig::new("http://localhost:8000/v1/").unwrap()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/v1");
        assert_eq!(client.config().timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_json_header_and_cache_bust_on_every_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&mock_server)
            .await;

        let (client, _) = client_for(&mock_server);
        let body: ApiResponse = client
            .request::<ApiResponse, ()>(Method::GET, "/health", QueryParams::new(), None)
            .await
            .unwrap();
        assert_eq!(body, json!({"status": "ok"}));

        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests[0]
            .url
            .query_pairs()
            .any(|(k, v)| k == CACHE_BUST_PARAM && v.parse::<u128>().is_ok()));
    }

    #[tokio::test]
    async fn test_base_path_prefix_is_kept() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&mock_server)
            .await;

        let config = ClientConfig::new(&format!("{}/v2/", mock_server.uri())).unwrap();
        let client = Client::new(config).unwrap();
        client.get("/health", QueryParams::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_error_status_carries_original_payload() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
            .mount(&mock_server)
            .await;

        let (client, recorder) = client_for(&mock_server);
        let err = client
            .post("/api/generate/ads", QueryParams::new(), &json!({"offer": {}}))
            .await
            .unwrap_err();

        match &err {
            ClientError::Status {
                status,
                path,
                body,
                raw,
            } => {
                assert_eq!(*status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(path, "/api/generate/ads");
                assert_eq!(body.as_ref(), Some(&json!({"detail": "boom"})));
                assert_eq!(raw, r#"{"detail":"boom"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.message(), "boom");
        assert_eq!(
            recorder.find("Server error").unwrap().field("body"),
            Some(r#"{"detail":"boom"}"#)
        );
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&mock_server)
            .await;

        let (client, recorder) = client_for(&mock_server);
        let err = client.get("/missing", QueryParams::new()).await.unwrap_err();
        assert!(matches!(
            &err,
            ClientError::Status { body: None, raw, .. } if raw == "Not Found"
        ));
        assert_eq!(err.message(), "Request failed with status code 404");
        assert_eq!(
            recorder.find("API response error").unwrap().level,
            Level::Error
        );
    }

    #[tokio::test]
    async fn test_timeout_rejects_with_timeout_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&mock_server)
            .await;

        let config = ClientConfig::new(&mock_server.uri())
            .unwrap()
            .with_timeout(Duration::from_millis(50));
        let client = Client::new(config).unwrap();
        let err = client.get("/health", QueryParams::new()).await.unwrap_err();
        assert!(err.is_timeout());
        assert!(err.is_network_error());
    }

    #[tokio::test]
    async fn test_stalled_error_body_keeps_transport_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let head = "HTTP/1.1 404 Not Found\r\n\
                        Content-Type: application/json\r\n\
                        Content-Length: 100\r\n\r\n{\"detail\"";
            socket.write_all(head.as_bytes()).await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
        });

        let config = ClientConfig::new(&format!("http://{}", addr))
            .unwrap()
            .with_timeout(Duration::from_millis(200));
        let client = Client::new(config).unwrap();
        let err = client
            .get("/api/products/categories", QueryParams::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Reqwest(_)));
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_undecodable_success_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let (client, _) = client_for(&mock_server);
        let err = client.get("/", QueryParams::new()).await.unwrap_err();
        assert!(matches!(err, ClientError::Reqwest(ref e) if e.is_decode()));
        assert!(!err.is_network_error());
    }
}
