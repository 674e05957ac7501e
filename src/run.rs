use anyhow::Context;
use chrono::Utc;

use crate::api::{ApiError, ClientOptions, IssueClient, RequestContext};
use crate::cli;
use crate::config;
use crate::output;
use crate::storage::{self, TokenStorage};

/// Runs one CLI invocation.
///
/// `client_options` overrides the options normally resolved from
/// `.weeklog/config.json` and the token sources.
pub async fn run(
    args: Vec<String>,
    mut stdout_additional: Option<&mut dyn std::io::Write>,
    ctx: &RequestContext,
    client_options: Option<ClientOptions>,
) -> anyhow::Result<()> {
    match cli::parser::parse_args(&args) {
        cli::parser::Command::Issues(opts) => {
            let client = build_client(client_options)?;
            let issues = client
                .list(ctx, Some(&opts))
                .await
                .map_err(|e| api_error(e, "Failed to list issues"))?;
            if issues.is_empty() {
                output::println("No issues found.", &mut stdout_additional)?;
            }
            for issue in &issues {
                output::println(&output::format_issue(issue), &mut stdout_additional)?;
            }
        }
        cli::parser::Command::Week => {
            let client = build_client(client_options)?;
            let opts = cli::parser::week_options(Utc::now());
            let issues = client
                .list(ctx, Some(&opts))
                .await
                .map_err(|e| api_error(e, "Failed to list issues"))?;
            if let Some(since) = opts.since {
                output::println(
                    &format!("Issues updated since {}:", since.format("%Y-%m-%d")),
                    &mut stdout_additional,
                )?;
            }
            if issues.is_empty() {
                output::println("No issues found.", &mut stdout_additional)?;
            }
            for issue in &issues {
                output::println(&output::format_issue(issue), &mut stdout_additional)?;
            }
        }
        cli::parser::Command::Timeline {
            owner,
            repo,
            number,
        } => {
            let client = build_client(client_options)?;
            let events = client
                .list_timeline_events(ctx, &owner, &repo, number, None)
                .await
                .map_err(|e| api_error(e, "Failed to list timeline events"))?;
            if events.is_empty() {
                output::println("No timeline events.", &mut stdout_additional)?;
            }
            for event in &events {
                output::println(&output::format_timeline_event(event), &mut stdout_additional)?;
            }
        }
        cli::parser::Command::TokenSet { token } => {
            let storage = storage::FileTokenStorage::new()?;
            storage.save(&token).context("Failed to save token")?;
            output::println("✓ Token saved", &mut stdout_additional)?;
        }
        cli::parser::Command::TokenClear => {
            let storage = storage::FileTokenStorage::new()?;
            storage.delete().context("Failed to delete token")?;
            output::println("✓ Token removed", &mut stdout_additional)?;
        }
        cli::parser::Command::Help => {
            output::println(cli::parser::USAGE, &mut stdout_additional)?;
        }
        cli::parser::Command::Unknown(message) => {
            return Err(anyhow::anyhow!(
                "{message}\n\n{}",
                cli::parser::USAGE
            ));
        }
    }
    Ok(())
}

fn build_client(client_options: Option<ClientOptions>) -> anyhow::Result<IssueClient> {
    let opts = match client_options {
        Some(opts) => opts,
        None => resolve_client_options()?,
    };
    IssueClient::new(opts).context("Failed to create HTTP client")
}

fn resolve_client_options() -> anyhow::Result<ClientOptions> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let home = std::env::var_os("HOME").map(std::path::PathBuf::from);
    let project_config = config::load_config(home.as_deref(), &cwd)?;
    let token_storage = storage::FileTokenStorage::new()?;
    let token = storage::resolve_token(|key: &str| std::env::var(key), &token_storage)?;
    if token.is_none() {
        tracing::warn!("no token found, requests are unauthenticated");
    }
    config::client_options(&project_config, token)
}

fn api_error(err: ApiError, action: &'static str) -> anyhow::Error {
    if err.status() == Some(reqwest::StatusCode::UNAUTHORIZED) {
        return anyhow::anyhow!(
            "Token invalid or expired. Set GH_TOKEN or run `weeklog token set <TOKEN>`."
        );
    }
    if matches!(err, ApiError::Cancelled) {
        return anyhow::anyhow!("Interrupted");
    }
    anyhow::Error::new(err).context(action)
}
