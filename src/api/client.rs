use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::context::RequestContext;
use crate::api::error::ApiError;
use crate::api::options::{IssueListOptions, ListTimelineEventsOptions, QueryParams};
use crate::api::rest::{ClientOptions, RestClient, Transport};
use crate::api::schema::{Issue, Timeline};
use crate::storage::token_from_env;

const ISSUES_METHOD: &str = "issues";

/// Client for the issues REST endpoints.
///
/// See <https://docs.github.com/en/rest/issues/issues?apiVersion=2022-11-28>
#[derive(Debug, Clone)]
pub struct IssueClient<T = RestClient> {
    transport: T,
    method: &'static str,
}

impl IssueClient<RestClient> {
    pub fn new(opts: ClientOptions) -> Result<Self, ApiError> {
        Ok(Self::with_transport(RestClient::new(&opts)?))
    }

    /// Client authenticated from `GH_TOKEN` or `GITHUB_TOKEN`, if either is set.
    pub fn from_env() -> Result<Self, ApiError> {
        let auth_token = token_from_env(|key: &str| std::env::var(key));
        Self::new(ClientOptions {
            auth_token,
            ..Default::default()
        })
    }
}

impl<T: Transport> IssueClient<T> {
    pub fn with_transport(transport: T) -> Self {
        IssueClient {
            transport,
            method: ISSUES_METHOD,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Lists issues assigned to the authenticated user, narrowed by `opts`.
    ///
    /// Issues come back in server order. An empty listing is `Ok(vec![])`.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        opts: Option<&IssueListOptions>,
    ) -> Result<Vec<Issue>, ApiError> {
        let query = opts.map(QueryParams::query_pairs).unwrap_or_default();
        self.get_list(ctx, self.method, &query).await
    }

    /// Lists the timeline events of one issue.
    ///
    /// Only the first page of events is returned: `opts` is accepted for
    /// forward compatibility but not sent.
    // TODO: encode `opts` and walk the `Link` header to support pagination.
    pub async fn list_timeline_events(
        &self,
        ctx: &RequestContext,
        owner: &str,
        repo: &str,
        issue_number: u64,
        opts: Option<&ListTimelineEventsOptions>,
    ) -> Result<Vec<Timeline>, ApiError> {
        if opts.is_some_and(|o| !o.is_empty()) {
            warn!(owner, repo, issue_number, "timeline pagination is not supported, options ignored");
        }
        let path = timeline_path(owner, repo, issue_number);
        self.get_list(ctx, &path, &[]).await
    }

    async fn get_list<R: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Vec<R>, ApiError> {
        let body = self.transport.get(ctx, path, query).await?;
        let items: Vec<R> = serde_json::from_str(&body)?;
        debug!(path, count = items.len(), "decoded list response");
        Ok(items)
    }
}

fn timeline_path(owner: &str, repo: &str, issue_number: u64) -> String {
    format!("repos/{owner}/{repo}/issues/{issue_number}/timeline")
}
