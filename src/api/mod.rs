//! Typed client for the GitHub issues and issue-timeline REST endpoints.

pub mod client;
pub mod context;
pub mod error;
pub mod options;
pub mod rest;
pub mod schema;

pub use client::IssueClient;
pub use context::RequestContext;
pub use error::ApiError;
pub use options::{
    IssueFilter, IssueListOptions, IssueSort, IssueStateFilter, ListOptions,
    ListTimelineEventsOptions, QueryParams, SortDirection,
};
pub use rest::{ClientOptions, RestClient, Transport};
pub use schema::{Issue, IssueState, Label, Repository, Timeline, User};
