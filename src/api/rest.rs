use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use tracing::debug;

use crate::api::context::RequestContext;
use crate::api::error::ApiError;

pub const DEFAULT_HOST: &str = "https://api.github.com/";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "weeklog-cli";

/// Performs GET requests against the REST API and returns successful bodies.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` (relative to the API root) with `query` appended.
    ///
    /// Returns the raw body of a 2xx response. The request is abandoned as
    /// soon as `ctx` is cancelled or its deadline passes.
    async fn get(
        &self,
        ctx: &RequestContext,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<String, ApiError>;
}

/// Settings used to build a [`RestClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// API root, e.g. `https://api.github.com/` or a GHES `/api/v3/` root.
    pub host: String,
    pub auth_token: Option<String>,
    /// Client-wide request timeout. Per-call limits belong on the context.
    pub timeout: Option<Duration>,
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        ClientOptions {
            host: DEFAULT_HOST.to_string(),
            auth_token: None,
            timeout: None,
            headers: Vec::new(),
        }
    }
}

/// `reqwest`-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    pub fn new(opts: &ClientOptions) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&opts.host)?;
        let headers = default_headers(opts)?;

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);
        if let Some(timeout) = opts.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ApiError::Build)?;

        Ok(RestClient { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Encode(format!("invalid path `{path}`: {e}")))
    }
}

#[async_trait]
impl Transport for RestClient {
    async fn get(
        &self,
        ctx: &RequestContext,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<String, ApiError> {
        let url = self.endpoint(path)?;
        debug!(method = "GET", %url, params = query.len(), "sending request");

        ctx.run(async {
            let response = self.http.get(url).query(query).send().await?;
            let status = response.status();
            let body = response.text().await?;
            debug!(%status, bytes = body.len(), "received response");

            if !status.is_success() {
                return Err(ApiError::Status {
                    status,
                    message: error_message(&body, status),
                });
            }
            Ok(body)
        })
        .await
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

fn parse_base_url(host: &str) -> Result<Url, ApiError> {
    let host = host.trim();
    let with_slash = if host.ends_with('/') {
        host.to_string()
    } else {
        format!("{host}/")
    };
    let url = Url::parse(&with_slash).map_err(|_| ApiError::InvalidHost(host.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ApiError::InvalidHost(host.to_string())),
    }
}

fn default_headers(opts: &ClientOptions) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(
        HeaderName::from_static("x-github-api-version"),
        HeaderValue::from_static(API_VERSION),
    );

    if let Some(token) = opts.auth_token.as_deref().filter(|t| !t.trim().is_empty()) {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ApiError::InvalidHeader(header::AUTHORIZATION.to_string()))?;
        value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, value);
    }

    for (name, value) in &opts.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ApiError::InvalidHeader(name.as_str().to_string()))?;
        headers.insert(name, value);
    }
    Ok(headers)
}
