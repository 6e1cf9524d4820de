//! Command handlers grouped by screen, plus shared plumbing.

pub(crate) mod recipients;
pub(crate) mod session;
pub(crate) mod templates;

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, anyhow};
use mailroom_api_models::RecordId;
use mailroom_dashboard::core::forms::FieldErrors;
use mailroom_dashboard::core::notify::{Notifications, Severity};
use mailroom_dashboard::features::records::RecordKind;
use mailroom_dashboard::{CommandOutcome, ListController};

use crate::client::{CliError, CliResult};
use crate::output::print_notifications;

/// Print what a command raised and map its outcome to a CLI result.
///
/// The last warning or error of a refused or failed command becomes the
/// returned error instead of being printed, so it is reported once.
pub(crate) fn finish(outcome: CommandOutcome, notifications: &mut Notifications) -> CliResult<()> {
    let mut raised = notifications.drain();
    let reason = if outcome.is_success() {
        None
    } else {
        raised
            .iter()
            .rposition(|note| matches!(note.severity, Severity::Warning | Severity::Error))
            .map(|index| raised.remove(index).message)
    };
    print_notifications(&raised);
    match outcome {
        CommandOutcome::Success | CommandOutcome::Warning => Ok(()),
        CommandOutcome::Blocked => Err(CliError::validation(
            reason.unwrap_or_else(|| "command was refused".to_string()),
        )),
        CommandOutcome::Failed => Err(CliError::failure(anyhow!(
            reason.unwrap_or_else(|| "command failed".to_string())
        ))),
    }
}

/// Map a blocked editor submit to its field errors.
pub(crate) fn field_errors(errors: Option<&FieldErrors>) -> Option<CliError> {
    errors
        .filter(|errors| !errors.is_empty())
        .map(|errors| CliError::validation(errors.to_string()))
}

/// Submit the open editor and close it whatever the outcome.
pub(crate) async fn submit_editor<K: RecordKind>(controller: &mut ListController<K>) -> CliResult<()> {
    let outcome = controller.submit().await;
    let invalid = if outcome == CommandOutcome::Blocked {
        field_errors(controller.editor().map(|editor| editor.errors()))
    } else {
        None
    };
    controller.cancel_edit();
    if let Some(err) = invalid {
        return Err(err);
    }
    finish(outcome, controller.notifications_mut())
}

/// Soft-delete a record after the operator confirms.
pub(crate) async fn remove_record<K: RecordKind>(
    controller: &mut ListController<K>,
    id: &RecordId,
    skip_prompt: bool,
) -> CliResult<()> {
    let outcome = controller.request_delete(id).await;
    if outcome != CommandOutcome::Success {
        return finish(outcome, controller.notifications_mut());
    }
    let noun = controller.kind().messages().noun.to_lowercase();
    if !skip_prompt && !confirm(&format!("Delete {noun} {id}?"))? {
        controller.cancel_delete();
        println!("Cancelled");
        return Ok(());
    }
    let outcome = controller.confirm_delete().await;
    finish(outcome, controller.notifications_mut())
}

/// Whether an interactive answer confirms.
#[must_use]
pub(crate) fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Ask a yes/no question on the terminal; anything but `y`/`yes` declines.
pub(crate) fn confirm(prompt: &str) -> CliResult<bool> {
    print!("{prompt} [y/N] ");
    io::stdout()
        .flush()
        .map_err(|err| CliError::failure(anyhow!("failed to flush stdout: {err}")))?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|err| CliError::failure(anyhow!("failed to read confirmation: {err}")))?;
    Ok(is_affirmative(&answer))
}

/// Prompt for a single line of input.
pub(crate) fn prompt_line(prompt: &str) -> CliResult<String> {
    print!("{prompt}");
    io::stdout()
        .flush()
        .map_err(|err| CliError::failure(anyhow!("failed to flush stdout: {err}")))?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|err| CliError::failure(anyhow!("failed to read input: {err}")))?;
    Ok(line.trim().to_string())
}

/// Read a UTF-8 file named on the command line.
pub(crate) fn read_text(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .map_err(CliError::failure)
}
