use chrono::{DateTime, NaiveDate, Utc};

use crate::api::{
    IssueFilter, IssueListOptions, IssueSort, IssueStateFilter, ListOptions, SortDirection,
};

/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Issues(IssueListOptions),
    Week,
    Timeline {
        owner: String,
        repo: String,
        number: u64,
    },
    TokenSet {
        token: String,
    },
    TokenClear,
    Help,
    Unknown(String),
}

pub const USAGE: &str = "\
Usage:
  weeklog issues [--filter F] [--state S] [--label L]... [--sort K] [--direction D]
                 [--since DATE] [--page N] [--per-page N]
  weeklog week
  weeklog timeline <owner>/<repo> <number>
  weeklog token set <TOKEN>
  weeklog token clear
  weeklog help";

/// Parse command line arguments and return a Command
///
/// # Arguments
/// * `args` - Command line arguments (including program name)
///
/// # Returns
/// * `Command` - The parsed command
pub fn parse_args(args: &[String]) -> Command {
    if args.len() < 2 {
        return Command::Help;
    }
    let rest = &args[2..];
    match args[1].as_str() {
        "issues" => parse_issue_options(rest).map_or_else(Command::Unknown, Command::Issues),
        "week" if rest.is_empty() => Command::Week,
        "timeline" => parse_timeline(rest),
        "token" => parse_token(rest),
        "help" | "--help" | "-h" => Command::Help,
        cmd => Command::Unknown(cmd.to_string()),
    }
}

fn parse_timeline(rest: &[String]) -> Command {
    let [repo_arg, number_arg] = rest else {
        return Command::Unknown(
            "Usage: weeklog timeline <owner>/<repo> <number>".to_string(),
        );
    };
    let Some((owner, repo)) = split_repo(repo_arg) else {
        return Command::Unknown(
            "Invalid repository format. Please use <owner>/<repo>.".to_string(),
        );
    };
    match number_arg.parse::<u64>() {
        Ok(number) if number > 0 => Command::Timeline {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
        },
        _ => Command::Unknown(format!("Invalid issue number: {number_arg}")),
    }
}

fn parse_token(rest: &[String]) -> Command {
    match rest {
        [sub, token] if sub == "set" && !token.trim().is_empty() => Command::TokenSet {
            token: token.trim().to_string(),
        },
        [sub] if sub == "set" => {
            Command::Unknown("Missing token argument. Usage: weeklog token set <TOKEN>".to_string())
        }
        [sub] if sub == "clear" => Command::TokenClear,
        [] => Command::Unknown("token".to_string()),
        [sub, ..] => Command::Unknown(format!("token {sub}")),
    }
}

fn split_repo(arg: &str) -> Option<(&str, &str)> {
    let (owner, repo) = arg.split_once('/')?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return None;
    }
    Some((owner, repo))
}

fn parse_issue_options(rest: &[String]) -> Result<IssueListOptions, String> {
    let mut opts = IssueListOptions::default();
    let mut iter = rest.iter();

    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| format!("Missing value for {flag}"))?;
        let invalid = || format!("Invalid value for {flag}: {value}");

        match flag.as_str() {
            "--filter" => opts.filter = Some(IssueFilter::parse(value).ok_or_else(invalid)?),
            "--state" => opts.state = Some(IssueStateFilter::parse(value).ok_or_else(invalid)?),
            "--label" => opts.labels.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
            ),
            "--sort" => opts.sort = Some(IssueSort::parse(value).ok_or_else(invalid)?),
            "--direction" => {
                opts.direction = Some(SortDirection::parse(value).ok_or_else(invalid)?)
            }
            "--since" => opts.since = Some(parse_since(value).ok_or_else(invalid)?),
            "--page" => opts.list.page = Some(parse_positive(value).ok_or_else(invalid)?),
            "--per-page" => {
                opts.list.per_page = Some(parse_positive(value).ok_or_else(invalid)?)
            }
            _ => return Err(format!("Unknown option {flag}")),
        }
    }
    Ok(opts)
}

fn parse_positive(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|n| *n > 0)
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_since(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Options used by `weeklog week`: everything touched since `now - 7 days`.
pub fn week_options(now: DateTime<Utc>) -> IssueListOptions {
    IssueListOptions {
        filter: Some(IssueFilter::All),
        state: Some(IssueStateFilter::All),
        sort: Some(IssueSort::Updated),
        direction: Some(SortDirection::Desc),
        since: Some(now - chrono::Duration::days(7)),
        list: ListOptions {
            page: None,
            per_page: Some(100),
        },
        ..Default::default()
    }
}
