use chrono::{DateTime, SecondsFormat, Utc};

/// Types that encode themselves as URL query pairs.
///
/// Unset fields produce no pair, leaving their defaults to the server.
pub trait QueryParams {
    fn query_pairs(&self) -> Vec<(&'static str, String)>;

    fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

/// Pagination parameters shared by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl QueryParams for ListOptions {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page.filter(|p| *p != 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page.filter(|p| *p != 0) {
            pairs.push(("per_page", per_page.to_string()));
        }
        pairs
    }
}

/// Options for listing timeline events.
pub type ListTimelineEventsOptions = ListOptions;

/// Which issues to list. The server default is `Assigned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueFilter {
    Assigned,
    Created,
    Mentioned,
    Subscribed,
    All,
}

impl IssueFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueFilter::Assigned => "assigned",
            IssueFilter::Created => "created",
            IssueFilter::Mentioned => "mentioned",
            IssueFilter::Subscribed => "subscribed",
            IssueFilter::All => "all",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "assigned" => Some(IssueFilter::Assigned),
            "created" => Some(IssueFilter::Created),
            "mentioned" => Some(IssueFilter::Mentioned),
            "subscribed" => Some(IssueFilter::Subscribed),
            "all" => Some(IssueFilter::All),
            _ => None,
        }
    }
}

/// Issue state to filter on. The server default is `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueStateFilter {
    Open,
    Closed,
    All,
}

impl IssueStateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStateFilter::Open => "open",
            IssueStateFilter::Closed => "closed",
            IssueStateFilter::All => "all",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(IssueStateFilter::Open),
            "closed" => Some(IssueStateFilter::Closed),
            "all" => Some(IssueStateFilter::All),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSort {
    Created,
    Updated,
    Comments,
}

impl IssueSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSort::Created => "created",
            IssueSort::Updated => "updated",
            IssueSort::Comments => "comments",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(IssueSort::Created),
            "updated" => Some(IssueSort::Updated),
            "comments" => Some(IssueSort::Comments),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// Optional parameters for `IssueClient::list`.
///
/// See <https://docs.github.com/en/rest/issues/issues#list-issues-assigned-to-the-authenticated-user>
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueListOptions {
    pub filter: Option<IssueFilter>,
    pub state: Option<IssueStateFilter>,
    /// Sent as one comma-separated `labels` value.
    pub labels: Vec<String>,
    pub sort: Option<IssueSort>,
    pub direction: Option<SortDirection>,
    /// Only issues updated at or after this time.
    pub since: Option<DateTime<Utc>>,
    pub list: ListOptions,
}

impl QueryParams for IssueListOptions {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(filter) = self.filter {
            pairs.push(("filter", filter.as_str().to_string()));
        }
        if let Some(state) = self.state {
            pairs.push(("state", state.as_str().to_string()));
        }
        let labels: Vec<&str> = self
            .labels
            .iter()
            .map(String::as_str)
            .filter(|l| !l.trim().is_empty())
            .collect();
        if !labels.is_empty() {
            pairs.push(("labels", labels.join(",")));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        if let Some(direction) = self.direction {
            pairs.push(("direction", direction.as_str().to_string()));
        }
        if let Some(since) = self.since {
            pairs.push(("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        pairs.extend(self.list.query_pairs());
        pairs
    }
}
