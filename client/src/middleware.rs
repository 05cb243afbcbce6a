//! Request and response interceptors.
//!
//! Every request passes through [`CacheBuster`] and then
//! [`ResponseInspector`]. Neither one alters the outcome of an exchange: an
//! error leaves the pipeline exactly as the transport produced it.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::bail;
use http::Extensions;
use reqwest::{Request, Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware, Next};

use crate::logger::Diagnostics;
use crate::query::{set_query_param, CACHE_BUST_PARAM};

/// Wraps `inner` with the client's interceptors.
pub(crate) fn build_pipeline(
    inner: reqwest::Client,
    diagnostics: &Diagnostics,
) -> ClientWithMiddleware {
    ClientBuilder::new(inner)
        .with(CacheBuster::new(diagnostics.clone()))
        .with(ResponseInspector::new(diagnostics.clone()))
        .build()
}

fn now_millis() -> anyhow::Result<u128> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis())
}

/// Stamps every request with `_t=<unix millis>`.
#[derive(Debug)]
pub struct CacheBuster {
    diagnostics: Diagnostics,
}

impl CacheBuster {
    pub(crate) fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    fn stamp(req: &mut Request) -> anyhow::Result<()> {
        if req.url().cannot_be_a_base() {
            bail!("cannot add query parameters to {}", req.url());
        }
        let millis = now_millis()?;
        set_query_param(req.url_mut(), CACHE_BUST_PARAM, &millis.to_string());
        Ok(())
    }
}

#[async_trait::async_trait]
impl Middleware for CacheBuster {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        if let Err(err) = Self::stamp(&mut req) {
            self.diagnostics.error(
                "API request error",
                &[
                    ("method", req.method().to_string()),
                    ("error", err.to_string()),
                ],
            );
            return Err(reqwest_middleware::Error::Middleware(err));
        }

        self.diagnostics.debug(
            "API request",
            &[
                ("method", req.method().to_string()),
                ("path", req.url().path().to_string()),
            ],
        );
        next.run(req, extensions).await
    }
}

/// Logs the outcome of every exchange. 401s get an extra warning and 5xx
/// bodies are logged in full.
#[derive(Debug)]
pub struct ResponseInspector {
    diagnostics: Diagnostics,
}

impl ResponseInspector {
    pub(crate) fn new(diagnostics: Diagnostics) -> Self {
        Self { diagnostics }
    }

    async fn inspect_failure(
        &self,
        resp: Response,
        path: &str,
    ) -> reqwest_middleware::Result<Response> {
        let status = resp.status();
        self.diagnostics.error(
            "API response error",
            &[
                ("status", status.as_u16().to_string()),
                ("path", path.to_string()),
            ],
        );

        if status == StatusCode::UNAUTHORIZED {
            self.diagnostics
                .warn("Unauthorized access", &[("path", path.to_string())]);
        }

        if status.as_u16() >= 500 {
            let (resp, body) = buffer_body(resp).await?;
            self.diagnostics.error(
                "Server error",
                &[
                    ("status", status.as_u16().to_string()),
                    ("path", path.to_string()),
                    ("body", body),
                ],
            );
            return Ok(resp);
        }

        Ok(resp)
    }
}

/// Reads the body so it can be logged, then hands back an equivalent response.
async fn buffer_body(resp: Response) -> reqwest_middleware::Result<(Response, String)> {
    let status = resp.status();
    let version = resp.version();
    let headers = resp.headers().clone();
    let bytes = resp.bytes().await?;
    let body = String::from_utf8_lossy(&bytes).into_owned();

    let mut builder = http::Response::builder().status(status).version(version);
    if let Some(target) = builder.headers_mut() {
        *target = headers;
    }
    let rebuilt = builder
        .body(bytes)
        .map_err(|e| reqwest_middleware::Error::Middleware(e.into()))?;

    Ok((Response::from(rebuilt), body))
}

#[async_trait::async_trait]
impl Middleware for ResponseInspector {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let path = req.url().path().to_string();

        match next.run(req, extensions).await {
            Ok(resp) if resp.status().is_success() => {
                self.diagnostics.debug(
                    "API response",
                    &[
                        ("status", resp.status().as_u16().to_string()),
                        ("path", path),
                    ],
                );
                Ok(resp)
            }
            Ok(resp) => self.inspect_failure(resp, &path).await,
            Err(err) => {
                self.diagnostics.error(
                    "API request failed",
                    &[("path", path), ("error", err.to_string())],
                );
                Err(err)
            }
        }
    }
}
