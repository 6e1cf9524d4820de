//! Output renderers and notification printing for CLI commands.

use anyhow::anyhow;
use mailroom_api_models::{Recipient, Template};
use mailroom_dashboard::core::notify::{Notification, Severity};
use mailroom_dashboard::features::records::{RowView, ViewState};
use mailroom_dashboard::features::templates::content_preview;
use serde::Serialize;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const PREVIEW_WIDTH: usize = 40;

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

fn print_page_footer(view: ViewState, total: usize) {
    let filter = view.filter.map_or("all", |status| status.label());
    println!(
        "page {} (size {}), {total} record(s), filter: {filter}",
        view.page, view.page_size
    );
}

fn actions_label(edit: bool, delete: bool, send: bool) -> String {
    let mut labels = Vec::new();
    if edit {
        labels.push("edit");
    }
    if delete {
        labels.push("rm");
    }
    if send {
        labels.push("send");
    }
    if labels.is_empty() {
        "-".to_string()
    } else {
        labels.join(",")
    }
}

pub(crate) fn render_recipient_list(
    rows: &[RowView<'_, Recipient>],
    view: ViewState,
    total: usize,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({
            "page": view.page,
            "itemsPerPage": view.page_size,
            "total": total,
            "items": rows.iter().map(|row| row.record).collect::<Vec<_>>(),
        })),
        OutputFormat::Table => {
            println!("{:<10} {:<14} {:<10} {:<24} EMAIL", "ID", "STATUS", "ACTIONS", "NAME");
            for row in rows {
                let recipient = row.record;
                println!(
                    "{:<10} {:<14} {:<10} {:<24} {}",
                    recipient.id,
                    format!("{} ({})", row.badge.label, row.badge.color.as_str()),
                    actions_label(row.actions.edit, row.actions.delete, row.actions.send),
                    truncate(&recipient.name, 24),
                    recipient.email
                );
            }
            print_page_footer(view, total);
            Ok(())
        }
    }
}

pub(crate) fn render_recipient(recipient: &Recipient, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(recipient),
        OutputFormat::Table => {
            println!("id: {}", recipient.id);
            println!("name: {}", recipient.name);
            println!("email: {}", recipient.email);
            println!("status: {}", recipient.status.as_str());
            if let Some(content) = &recipient.content {
                println!("content:");
                println!("{content}");
            }
            Ok(())
        }
    }
}

pub(crate) fn render_template_list(
    rows: &[RowView<'_, Template>],
    view: ViewState,
    total: usize,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({
            "page": view.page,
            "itemsPerPage": view.page_size,
            "total": total,
            "items": rows.iter().map(|row| row.record).collect::<Vec<_>>(),
        })),
        OutputFormat::Table => {
            println!(
                "{:<10} {:<10} {:<14} {:<20} {:<24} PREVIEW",
                "ID", "STATUS", "ACTIONS", "NAME", "SUBJECT"
            );
            for row in rows {
                let template = row.record;
                let preview = content_preview(&template.content).map_err(CliError::failure)?;
                println!(
                    "{:<10} {:<10} {:<14} {:<20} {:<24} {}",
                    template.id,
                    row.badge.label,
                    actions_label(row.actions.edit, row.actions.delete, row.actions.send),
                    truncate(&template.name, 20),
                    truncate(&template.subject, 24),
                    truncate(&preview, PREVIEW_WIDTH)
                );
            }
            print_page_footer(view, total);
            Ok(())
        }
    }
}

pub(crate) fn render_template(template: &Template, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(template),
        OutputFormat::Table => {
            println!("id: {}", template.id);
            println!("name: {}", template.name);
            println!("subject: {}", template.subject);
            println!("deleted: {}", template.deletion.is_deleted());
            println!("content:");
            println!("{}", template.content);
            Ok(())
        }
    }
}

/// Print notifications: successes to stdout, warnings and errors to stderr.
pub(crate) fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        match notification.severity {
            Severity::Success | Severity::Info => println!("{}", notification.message),
            Severity::Warning => eprintln!("warning: {}", notification.message),
            Severity::Error => eprintln!("error: {}", notification.message),
        }
    }
}

/// Shorten `text` to at most `width` characters, marking the cut with `...`.
#[must_use]
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}
