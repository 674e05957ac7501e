use std::io::{self, Write};

use crate::api::{Issue, Timeline};

pub fn println(message: &str, writer: &mut Option<&mut dyn Write>) -> io::Result<()> {
    if let Err(e) = writeln!(io::stdout(), "{message}") {
        tracing::warn!(error = %e, "failed to write to stdout");
    }

    if let Some(w) = writer {
        writeln!(w, "{message}")?;
    }

    Ok(())
}

/// `owner/repo#12 [open] Title (updated 2024-05-01)`
pub fn format_issue(issue: &Issue) -> String {
    let reference = match &issue.repository {
        Some(repo) => format!("{}#{}", repo.full_name, issue.number),
        None => format!("#{}", issue.number),
    };
    let kind = if issue.is_pull_request() { " (PR)" } else { "" };
    format!(
        "{reference} [{}]{kind} {} (updated {})",
        issue.state.as_str(),
        issue.title,
        issue.updated_at.format("%Y-%m-%d")
    )
}

/// `2024-05-01 10:00 labeled by octocat: bug`
pub fn format_timeline_event(event: &Timeline) -> String {
    let when = event
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let mut line = format!("{when} {}", event.event);
    if let Some(actor) = &event.actor {
        line.push_str(&format!(" by {}", actor.login));
    }

    let detail = event
        .label
        .as_ref()
        .map(|l| l.name.clone())
        .or_else(|| event.state.clone())
        .or_else(|| event.body.as_deref().map(first_line))
        .or_else(|| event.commit_id.as_deref().map(|c| c.chars().take(7).collect()));
    if let Some(detail) = detail.filter(|d| !d.is_empty()) {
        line.push_str(": ");
        line.push_str(&detail);
    }
    line
}

fn first_line(text: &str) -> String {
    const MAX: usize = 72;
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() > MAX {
        let cut: String = line.chars().take(MAX - 3).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}
