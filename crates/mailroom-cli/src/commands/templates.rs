//! `mailroom template` handlers.

use mailroom_dashboard::features::records::RecordKind;
use mailroom_dashboard::{CommandOutcome, TemplateForm};

use crate::cli::{AppContext, IdArgs, ListArgs, RemoveArgs, TemplateAddArgs, TemplateEditArgs};
use crate::client::{CliError, CliResult};
use crate::commands::recipients::ensure_page_size;
use crate::commands::{finish, read_text, remove_record, submit_editor};
use crate::output::{render_template, render_template_list};

pub(crate) async fn handle_ls(ctx: &mut AppContext, args: ListArgs) -> CliResult<()> {
    let format = ctx.output;
    let controller = ctx.dashboard.templates()?;
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
    render_template_list(
        &controller.rows(),
        controller.view(),
        controller.state().total(),
        format,
    )
}

pub(crate) async fn handle_show(ctx: &mut AppContext, args: IdArgs) -> CliResult<()> {
    let format = ctx.output;
    let controller = ctx.dashboard.templates()?;
    match controller.fetch_record(&args.id).await {
        Some(template) => {
            finish(CommandOutcome::Success, controller.notifications_mut())?;
            render_template(&template, format)
        }
        None => finish(CommandOutcome::Failed, controller.notifications_mut()),
    }
}

pub(crate) async fn handle_add(ctx: &mut AppContext, args: TemplateAddArgs) -> CliResult<()> {
    let content = args
        .content_file
        .as_deref()
        .map(read_text)
        .transpose()?
        .unwrap_or_default();
    let controller = ctx.dashboard.templates()?;
    controller.open_create();
    if let Some(editor) = controller.editor_mut() {
        editor.form = TemplateForm {
            name: args.name,
            subject: args.subject,
            content,
        };
    }
    submit_editor(controller).await
}

pub(crate) async fn handle_edit(ctx: &mut AppContext, args: TemplateEditArgs) -> CliResult<()> {
    let content = args.content_file.as_deref().map(read_text).transpose()?;
    let controller = ctx.dashboard.templates()?;
    let outcome = controller.edit(&args.id).await;
    if outcome != CommandOutcome::Success {
        return finish(outcome, controller.notifications_mut());
    }
    if let Some(editor) = controller.editor_mut() {
        if let Some(name) = args.name {
            editor.form.name = name;
        }
        if let Some(subject) = args.subject {
            editor.form.subject = subject;
        }
        if let Some(content) = content {
            editor.form.content = content;
        }
    }
    submit_editor(controller).await
}

pub(crate) async fn handle_rm(ctx: &mut AppContext, args: RemoveArgs) -> CliResult<()> {
    let controller = ctx.dashboard.templates()?;
    remove_record(controller, &args.id, args.yes).await
}

pub(crate) async fn handle_restore(ctx: &mut AppContext, args: IdArgs) -> CliResult<()> {
    let controller = ctx.dashboard.templates()?;
    let outcome = controller.restore(&args.id).await;
    finish(outcome, controller.notifications_mut())
}

pub(crate) async fn handle_send(ctx: &mut AppContext, args: IdArgs) -> CliResult<()> {
    let controller = ctx.dashboard.templates()?;
    let outcome = controller.send(&args.id).await;
    finish(outcome, controller.notifications_mut())
}
