//! `mailroom email` handlers.

use std::path::Path;

use anyhow::Context;
use mailroom_dashboard::config::PAGE_SIZE_OPTIONS;
use mailroom_dashboard::features::records::RecordKind;
use mailroom_dashboard::{CommandOutcome, RecipientForm, SpreadsheetUpload};

use crate::cli::{AppContext, EmailAddArgs, EmailEditArgs, IdArgs, ImportArgs, ListArgs, RemoveArgs};
use crate::client::{CliError, CliResult};
use crate::commands::{finish, read_text, remove_record, submit_editor};
use crate::output::{render_recipient, render_recipient_list};

pub(crate) async fn handle_ls(ctx: &mut AppContext, args: ListArgs) -> CliResult<()> {
    let format = ctx.output;
    let controller = ctx.dashboard.recipients()?;
    let filter = args
        .status
        .as_deref()
        .map(|raw| controller.kind().parse_filter(raw))
        .transpose()
        .map_err(|err| CliError::validation(err.to_string()))?;
    let page_size = args.page_size.unwrap_or(controller.view().page_size);
    ensure_page_size(page_size)?;

    let outcome = controller.load(args.page, page_size, filter).await;
    finish(outcome, controller.notifications_mut())?;
    render_recipient_list(
        &controller.rows(),
        controller.view(),
        controller.state().total(),
        format,
    )
}

pub(crate) async fn handle_show(ctx: &mut AppContext, args: IdArgs) -> CliResult<()> {
    let format = ctx.output;
    let controller = ctx.dashboard.recipients()?;
    match controller.fetch_record(&args.id).await {
        Some(recipient) => {
            finish(CommandOutcome::Success, controller.notifications_mut())?;
            render_recipient(&recipient, format)
        }
        None => finish(CommandOutcome::Failed, controller.notifications_mut()),
    }
}

pub(crate) async fn handle_add(ctx: &mut AppContext, args: EmailAddArgs) -> CliResult<()> {
    let body = args
        .body_file
        .as_deref()
        .map(read_text)
        .transpose()?
        .unwrap_or_default();
    let controller = ctx.dashboard.recipients()?;
    controller.open_create();
    if let Some(editor) = controller.editor_mut() {
        editor.form = RecipientForm {
            name: args.name,
            email: args.email,
            body,
        };
    }
    submit_editor(controller).await
}

pub(crate) async fn handle_edit(ctx: &mut AppContext, args: EmailEditArgs) -> CliResult<()> {
    let body = args.body_file.as_deref().map(read_text).transpose()?;
    let controller = ctx.dashboard.recipients()?;
    let outcome = controller.edit(&args.id).await;
    if outcome != CommandOutcome::Success {
        return finish(outcome, controller.notifications_mut());
    }
    if let Some(editor) = controller.editor_mut() {
        if let Some(name) = args.name {
            editor.form.name = name;
        }
        if let Some(email) = args.email {
            editor.form.email = email;
        }
        if let Some(body) = body {
            editor.form.body = body;
        }
    }
    submit_editor(controller).await
}

pub(crate) async fn handle_rm(ctx: &mut AppContext, args: RemoveArgs) -> CliResult<()> {
    let controller = ctx.dashboard.recipients()?;
    remove_record(controller, &args.id, args.yes).await
}

pub(crate) async fn handle_restore(ctx: &mut AppContext, args: IdArgs) -> CliResult<()> {
    let controller = ctx.dashboard.recipients()?;
    let outcome = controller.restore(&args.id).await;
    finish(outcome, controller.notifications_mut())
}

pub(crate) async fn handle_import(ctx: &mut AppContext, args: ImportArgs) -> CliResult<()> {
    let upload = load_upload(&args.file)?;
    let controller = ctx.dashboard.recipients()?;
    let outcome = controller.import(&upload).await;
    finish(outcome, controller.notifications_mut())
}

pub(crate) fn ensure_page_size(page_size: u32) -> CliResult<()> {
    if PAGE_SIZE_OPTIONS.contains(&page_size) {
        Ok(())
    } else {
        Err(CliError::validation(format!(
            "page size must be one of {PAGE_SIZE_OPTIONS:?}"
        )))
    }
}

fn load_upload(path: &Path) -> CliResult<SpreadsheetUpload> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CliError::validation(format!("{} is not a file", path.display())))?
        .to_string();
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .map_err(CliError::failure)?;
    Ok(SpreadsheetUpload { file_name, bytes })
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, anyhow};
    use httpmock::prelude::*;
    use mailroom_api_models::RecordId;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::cli::test_support::context;

    fn ids(id: u64) -> IdArgs {
        IdArgs {
            id: RecordId::from(id),
        }
    }

    #[tokio::test]
    async fn listing_without_a_session_is_refused() -> Result<()> {
        let server = MockServer::start();
        let dir = TempDir::new()?;
        let mut ctx = context(&server, &dir, false)?;
        let err = handle_ls(&mut ctx, ListArgs::default())
            .await
            .expect_err("no session");
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("/email"));
        Ok(())
    }

    #[tokio::test]
    async fn listing_sends_the_status_filter() -> Result<()> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/email/getAllEmail")
                .json_body(json!({"page": 2, "itemsPerPage": 25, "status": 1}));
            then.status(200).json_body(json!({
                "status": true,
                "data": [{"id": 7, "name": "Ann", "email": "ann@x.io", "status": 1}]
            }));
        });
        let dir = TempDir::new()?;
        let mut ctx = context(&server, &dir, true)?;
        handle_ls(
            &mut ctx,
            ListArgs {
                page: 2,
                page_size: Some(25),
                status: Some("active".into()),
            },
        )
        .await
        .map_err(|err| anyhow!(err.display_message()))?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn unknown_filters_and_sizes_are_validation_errors() -> Result<()> {
        let server = MockServer::start();
        let dir = TempDir::new()?;
        let mut ctx = context(&server, &dir, true)?;
        let err = handle_ls(
            &mut ctx,
            ListArgs {
                status: Some("bounced".into()),
                ..ListArgs::default()
            },
        )
        .await
        .expect_err("bad filter");
        assert_eq!(err.exit_code(), 2);

        let err = handle_ls(
            &mut ctx,
            ListArgs {
                page: 1,
                page_size: Some(7),
                status: None,
            },
        )
        .await
        .expect_err("bad size");
        assert_eq!(err.exit_code(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_recipient_never_reaches_the_server() -> Result<()> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/email/createEmail");
            then.status(200).json_body(json!({"status": true}));
        });
        let dir = TempDir::new()?;
        let mut ctx = context(&server, &dir, true)?;
        let err = handle_add(
            &mut ctx,
            EmailAddArgs {
                name: "Ann".into(),
                email: "ann.example.com".into(),
                body_file: None,
            },
        )
        .await
        .expect_err("invalid email");
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().starts_with("email:"));
        mock.assert_hits(0);
        Ok(())
    }

    #[tokio::test]
    async fn remove_with_yes_marks_deleted_and_reloads() -> Result<()> {
        let server = MockServer::start();
        let fetch = server.mock(|when, then| {
            when.method(GET).path("/api/email/get/4");
            then.status(200).json_body(json!({
                "status": true,
                "data": {"id": 4, "name": "Ann", "email": "ann@x.io", "status": 1}
            }));
        });
        let update = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/email/updateEmail/4")
                .json_body(json!({"status": 0}));
            then.status(200).json_body(json!({"status": true}));
        });
        let list = server.mock(|when, then| {
            when.method(POST).path("/api/email/getAllEmail");
            then.status(200).json_body(json!({"status": true, "data": []}));
        });
        let dir = TempDir::new()?;
        let mut ctx = context(&server, &dir, true)?;
        handle_rm(
            &mut ctx,
            RemoveArgs {
                id: RecordId::from(4),
                yes: true,
            },
        )
        .await
        .map_err(|err| anyhow!(err.display_message()))?;
        fetch.assert();
        update.assert();
        list.assert();
        Ok(())
    }

    #[tokio::test]
    async fn unsubscribed_recipients_cannot_be_restored_or_removed() -> Result<()> {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/email/get/8");
            then.status(200).json_body(json!({
                "status": true,
                "data": {"id": 8, "name": "Bo", "email": "bo@x.io", "status": 2}
            }));
        });
        let update = server.mock(|when, then| {
            when.method(PUT).path("/api/email/updateEmail/8");
            then.status(200).json_body(json!({"status": true}));
        });
        let dir = TempDir::new()?;
        let mut ctx = context(&server, &dir, true)?;
        let err = handle_restore(&mut ctx, ids(8)).await.expect_err("terminal");
        assert_eq!(err.exit_code(), 2);
        let err = handle_rm(
            &mut ctx,
            RemoveArgs {
                id: RecordId::from(8),
                yes: true,
            },
        )
        .await
        .expect_err("terminal");
        assert_eq!(err.exit_code(), 2);
        update.assert_hits(0);
        Ok(())
    }

    #[tokio::test]
    async fn server_errors_surface_the_fallback_text() -> Result<()> {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/email/get/9");
            then.status(500);
        });
        let dir = TempDir::new()?;
        let mut ctx = context(&server, &dir, true)?;
        let err = handle_show(&mut ctx, ids(9)).await.expect_err("500");
        assert_eq!(err.exit_code(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn import_rejects_non_spreadsheets_locally() -> Result<()> {
        let server = MockServer::start();
        let dir = TempDir::new()?;
        let file = dir.path().join("contacts.csv");
        std::fs::write(&file, b"name,email\n")?;
        let mut ctx = context(&server, &dir, true)?;
        let err = handle_import(&mut ctx, ImportArgs { file })
            .await
            .expect_err("csv");
        assert_eq!(err.exit_code(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn import_uploads_spreadsheets() -> Result<()> {
        let server = MockServer::start();
        let upload = server.mock(|when, then| {
            when.method(POST).path("/api/email/uploadExcel");
            then.status(200).json_body(json!({"status": true}));
        });
        server.mock(|when, then| {
            when.method(POST).path("/api/email/getAllEmail");
            then.status(200).json_body(json!({"status": true, "data": []}));
        });
        let dir = TempDir::new()?;
        let file = dir.path().join("contacts.xlsx");
        std::fs::write(&file, b"PK\x03\x04")?;
        let mut ctx = context(&server, &dir, true)?;
        handle_import(&mut ctx, ImportArgs { file })
            .await
            .map_err(|err| anyhow!(err.display_message()))?;
        upload.assert();
        Ok(())
    }
}
