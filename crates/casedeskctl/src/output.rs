//! Terminal output formatting for casedeskctl.
//!
//! One envelope for every command (JSON or human-readable), plus the case
//! renderers for `show` and `list`.

use owo_colors::OwoColorize;
use serde::Serialize;

use casedesk_common::{Case, CaseState, Priority};

/// Standard output envelope for all casedeskctl commands
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutput {
    /// Whether the command succeeded
    pub ok: bool,
    /// Command that was executed
    pub command: String,
    /// Machine-readable error code on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Human-readable result or error message
    pub message: String,
}

impl CommandOutput {
    pub fn success(command: &str, message: String) -> Self {
        Self {
            ok: true,
            command: command.to_string(),
            error_code: None,
            message,
        }
    }

    pub fn failure(command: &str, code: &str, message: String) -> Self {
        Self {
            ok: false,
            command: command.to_string(),
            error_code: Some(code.to_string()),
            message,
        }
    }

    pub fn print(&self, json: bool) {
        if json {
            if let Ok(doc) = serde_json::to_string_pretty(self) {
                println!("{}", doc);
            }
            return;
        }

        if self.ok {
            println!("{} {}", "ok".green().bold(), self.message);
        } else {
            println!("{} {}", "error".red().bold(), self.message);
        }
    }
}

fn state_label(state: CaseState) -> String {
    match state {
        CaseState::New => state.as_str().cyan().to_string(),
        CaseState::InProgress => state.as_str().yellow().to_string(),
        CaseState::AwaitingCustomerInfo => state.as_str().magenta().to_string(),
        CaseState::Resolved => state.as_str().green().to_string(),
    }
}

fn priority_label(priority: Priority) -> String {
    match priority {
        Priority::Low => priority.as_str().dimmed().to_string(),
        Priority::Medium => priority.as_str().to_string(),
        Priority::High => priority.as_str().yellow().to_string(),
        Priority::VeryHigh => priority.as_str().red().bold().to_string(),
    }
}

/// One-line case summary for listings
pub fn print_case_line(case: &Case) {
    println!(
        "{}  [{}] [{}]  {}",
        case.id.bold(),
        state_label(case.state),
        priority_label(case.priority),
        case.title
    );
}

/// Full case view: fields, comment thread, audit trail
pub fn print_case(case: &Case) {
    print_case_line(case);

    if let Some(description) = &case.description {
        println!("  {}", description.dimmed());
    }
    println!(
        "  component: {}  assignee: {}  customer: {}",
        case.component_id.as_deref().unwrap_or("-"),
        case.assignee_id.as_deref().unwrap_or("-"),
        case.customer_company.as_deref().unwrap_or("-"),
    );
    println!(
        "  created: {}  updated: {}",
        case.created_at.format("%Y-%m-%d %H:%M:%S"),
        case.updated_at.format("%Y-%m-%d %H:%M:%S"),
    );

    if !case.comments.is_empty() {
        println!("\n  {}", "comments".bold());
        for comment in &case.comments {
            let visibility = if comment.is_internal {
                "internal".yellow().to_string()
            } else {
                "external".green().to_string()
            };
            println!(
                "  [{}] {} ({}): {}",
                visibility,
                comment.author_name,
                comment.created_at.format("%Y-%m-%d %H:%M"),
                comment.content
            );
        }
    }

    if !case.history.is_empty() {
        println!("\n  {}", "history".bold());
        for entry in &case.history {
            let actor = entry.performed_by_name.as_deref().unwrap_or("-");
            let diff = match (&entry.old_value, &entry.new_value) {
                (Some(old), Some(new)) => format!(" {} -> {}", old, new),
                (None, Some(new)) => format!(" -> {}", new),
                (Some(old), None) => format!(" {} ->", old),
                (None, None) => String::new(),
            };
            println!(
                "  {} {} by {}{}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
                entry.action,
                actor,
                diff
            );
        }
    }
}
