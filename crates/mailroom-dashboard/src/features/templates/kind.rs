//! Template configuration of the list controller.

use async_trait::async_trait;
use mailroom_api_models::{
    ApiOutcome, BulkSendRequest, DeletionFlag, RecordId, Template, TemplateCreateRequest,
    TemplateListRequest, TemplateUpdateRequest, UnknownStatusCode,
};

use crate::api::{ApiClient, ApiResult};
use crate::core::forms::FieldErrors;
use crate::features::records::{
    CommandOutcome, ListController, Messages, Paging, RecordKind, RecordStatus, Texts, ViewState,
};
use crate::features::templates::logic::validate_template;
use crate::features::templates::state::TemplateForm;
use crate::footer::augment_for_send;

/// Notification texts for the template screen.
pub static TEMPLATE_MESSAGES: Messages = Messages {
    noun: "Template",
    load: Texts {
        success: None,
        failed: "Failed to load templates.",
        error: "Error fetching templates.",
    },
    fetch: Texts {
        success: Some("Template loaded successfully!"),
        failed: "Failed to load template.",
        error: "Error fetching template details.",
    },
    create: Texts {
        success: Some("Template created successfully!"),
        failed: "Failed to create template.",
        error: "Error while saving template.",
    },
    update: Texts {
        success: Some("Template updated successfully!"),
        failed: "Failed to update template.",
        error: "Error while saving template.",
    },
    delete: Texts {
        success: Some("Template deleted successfully!"),
        failed: "Failed to delete template.",
        error: "Error deleting template.",
    },
    restore: Texts {
        success: Some("Template restored successfully!"),
        failed: "Failed to restore template.",
        error: "Error restoring template.",
    },
    inactive: "Only active templates can be changed.",
    invalid_filter: "Templates can only be filtered by active or deleted.",
    invalid_page_size: "Page size must be one of 5, 10, 25, 50, 100.",
};

const SEND_TEXTS: Texts = Texts {
    success: Some("Email sent successfully with unsubscribe footer!"),
    failed: "Failed to send email.",
    error: "Error sending email.",
};

const SEND_DELETED_MESSAGE: &str = "Deleted templates cannot be sent.";

/// Template list controller.
pub type TemplatesController = ListController<TemplateKind>;

/// Template record contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateKind {
    fetch_window: u32,
    send_unsubscribe_url: String,
}

impl TemplateKind {
    /// Kind fetching `fetch_window` templates per load; sends link to `send_unsubscribe_url`.
    #[must_use]
    pub fn new(fetch_window: u32, send_unsubscribe_url: impl Into<String>) -> Self {
        Self {
            fetch_window,
            send_unsubscribe_url: send_unsubscribe_url.into(),
        }
    }
}

#[async_trait]
impl RecordKind for TemplateKind {
    type Record = Template;
    type Form = TemplateForm;

    fn messages(&self) -> &'static Messages {
        &TEMPLATE_MESSAGES
    }

    fn paging(&self) -> Paging {
        Paging::Local {
            fetch_window: self.fetch_window,
        }
    }

    fn id(record: &Template) -> &RecordId {
        &record.id
    }

    fn status(record: &Template) -> RecordStatus {
        record.deletion.into()
    }

    fn mark(record: &mut Template, status: RecordStatus) {
        record.deletion = DeletionFlag::from_deleted(status == RecordStatus::Deleted);
    }

    fn accepts_filter(&self, status: RecordStatus) -> bool {
        matches!(status, RecordStatus::Active | RecordStatus::Deleted)
    }

    fn parse_filter(&self, input: &str) -> Result<RecordStatus, UnknownStatusCode> {
        match input.trim().to_ascii_lowercase().as_str() {
            "0" | "active" => Ok(RecordStatus::Active),
            "1" | "deleted" => Ok(RecordStatus::Deleted),
            _ => Err(UnknownStatusCode(input.to_string())),
        }
    }

    fn form_from(record: &Template) -> TemplateForm {
        TemplateForm {
            name: record.name.clone(),
            subject: record.subject.clone(),
            content: record.content.clone(),
        }
    }

    fn validate(form: &TemplateForm) -> Result<(), FieldErrors> {
        validate_template(form)
    }

    fn can_send(&self) -> bool {
        true
    }

    async fn fetch(&self, api: &ApiClient, _view: &ViewState) -> ApiResult<ApiOutcome<Vec<Template>>> {
        let request = TemplateListRequest {
            page: 1,
            items_per_page: self.fetch_window,
        };
        api.list_templates(&request).await
    }

    async fn fetch_one(&self, api: &ApiClient, id: &RecordId) -> ApiResult<ApiOutcome<Template>> {
        api.get_template(id).await
    }

    async fn save(
        &self,
        api: &ApiClient,
        form: &TemplateForm,
        target: Option<&RecordId>,
    ) -> ApiResult<ApiOutcome<()>> {
        match target {
            None => {
                let request = TemplateCreateRequest {
                    name: form.name.clone(),
                    subject: form.subject.clone(),
                    content: form.content.clone(),
                };
                api.create_template(&request).await
            }
            Some(id) => {
                let request = TemplateUpdateRequest {
                    deletion: DeletionFlag::Active,
                    name: Some(form.name.clone()),
                    subject: Some(form.subject.clone()),
                    content: Some(form.content.clone()),
                };
                api.update_template(id, &request).await
            }
        }
    }

    async fn set_status(
        &self,
        api: &ApiClient,
        id: &RecordId,
        status: RecordStatus,
    ) -> ApiResult<ApiOutcome<()>> {
        let flag = DeletionFlag::from_deleted(status == RecordStatus::Deleted);
        api.update_template(id, &TemplateUpdateRequest::flag_only(flag))
            .await
    }
}

impl ListController<TemplateKind> {
    /// Send a template's content to recipients with the unsubscribe footer applied.
    ///
    /// The full template is fetched first because list rows may carry
    /// truncated content. Deleted templates are refused.
    pub async fn send(&mut self, id: &RecordId) -> CommandOutcome {
        let result = self.kind.fetch_one(&self.api, id).await;
        let Some(template) = self.settle(result, &TEMPLATE_MESSAGES.fetch) else {
            return CommandOutcome::Failed;
        };
        if template.deletion.is_deleted() {
            self.notifications.warning(SEND_DELETED_MESSAGE);
            return CommandOutcome::Blocked;
        }
        let content = augment_for_send(&template.content, &self.kind.send_unsubscribe_url);
        let request = BulkSendRequest {
            subject: template.subject.clone(),
            content: content.into_owned(),
        };
        let result = self.api.send_bulk(&request).await;
        if self.settle(result, &SEND_TEXTS).is_none() {
            return CommandOutcome::Failed;
        }
        tracing::info!(id = %id, "template sent");
        if let Some(message) = SEND_TEXTS.success {
            self.notifications.success(message);
        }
        CommandOutcome::Success
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use mailroom_api_models::Endpoint;
    use serde_json::{Value, json};

    use super::*;
    use crate::core::forms::fields;
    use crate::core::notify::Severity;
    use crate::testing::ScriptedTransport;

    const SEND_URL: &str = "http://api.test/email/unsubscribe?email={{email}}";

    fn controller(transport: &Arc<ScriptedTransport>) -> TemplatesController {
        ListController::new(
            TemplateKind::new(10, SEND_URL),
            ApiClient::new(transport.clone()),
            5,
            Duration::from_secs(4),
        )
    }

    fn template(id: u64, deleted: u8, content: &str) -> Value {
        json!({"id": id, "name": format!("T{id}"), "subject": format!("S{id}"), "content": content, "isDeleted": deleted})
    }

    fn latest(controller: &TemplatesController) -> (Severity, String) {
        let note = controller.notifications().latest().expect("notification");
        (note.severity, note.message.clone())
    }

    #[tokio::test]
    async fn templates_are_fetched_once_and_paged_locally() {
        let transport = ScriptedTransport::new();
        let rows: Vec<Value> = (1..=7).map(|id| template(id, 0, "<p>x</p>")).collect();
        transport.respond(Endpoint::ListTemplates, json!({"status": true, "data": rows.clone()}));
        transport.respond(Endpoint::ListTemplates, json!({"status": true, "data": rows}));
        let mut controller = controller(&transport);
        let _ = controller.load(1, 5, None).await;
        assert_eq!(controller.visible().len(), 5);
        assert_eq!(controller.state().total(), 7);
        let _ = controller.set_page(2).await;
        let ids: Vec<&str> = controller.visible().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["6", "7"]);
        for call in transport.calls_to(Endpoint::ListTemplates) {
            assert_eq!(call.body, Some(json!({"page": 1, "itemsPerPage": 10})));
        }
        assert!(controller.rows().iter().all(|row| row.actions.send));
    }

    #[tokio::test]
    async fn unsubscribed_filter_is_rejected_for_templates() {
        let transport = ScriptedTransport::new();
        let mut controller = controller(&transport);
        let outcome = controller
            .set_filter(Some(RecordStatus::Unsubscribed))
            .await;
        assert_eq!(outcome, CommandOutcome::Blocked);
        assert!(transport.calls().is_empty());
        assert!(controller.kind().parse_filter("unsubscribed").is_err());
        assert_eq!(controller.kind().parse_filter("1"), Ok(RecordStatus::Deleted));
    }

    #[tokio::test]
    async fn deleted_templates_show_red_badge_without_actions() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Endpoint::ListTemplates,
            json!({"status": true, "data": [template(1, 1, ""), template(2, 0, "")]}),
        );
        let mut controller = controller(&transport);
        let _ = controller.load(1, 5, Some(RecordStatus::Deleted)).await;
        let rows = controller.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].badge.label, "Deleted");
        assert!(!rows[0].actions.send && !rows[0].actions.edit);
    }

    #[tokio::test]
    async fn template_without_subject_is_blocked_locally() {
        let transport = ScriptedTransport::new();
        let mut controller = controller(&transport);
        controller.open_create();
        if let Some(editor) = controller.editor_mut() {
            editor.form.name = "Welcome".into();
        }
        assert_eq!(controller.submit().await, CommandOutcome::Blocked);
        assert!(transport.calls().is_empty());
        let editor = controller.editor().expect("editor open");
        assert_eq!(editor.title("Template"), "Add Template");
        assert!(editor.errors().get(fields::SUBJECT).is_some());
    }

    #[tokio::test]
    async fn update_clears_deletion_flag() {
        let transport = ScriptedTransport::new();
        let mut controller = controller(&transport);
        let form = TemplateForm {
            name: "Welcome".into(),
            subject: "Hi".into(),
            content: "<p>Hello</p>".into(),
        };
        assert_eq!(
            controller.save(&form, Some(&RecordId::from(3))).await,
            CommandOutcome::Success
        );
        assert_eq!(
            transport.calls_to(Endpoint::UpdateTemplate)[0].body,
            Some(json!({"isDeleted": 0, "name": "Welcome", "subject": "Hi", "content": "<p>Hello</p>"}))
        );
        assert_eq!(
            latest(&controller),
            (Severity::Success, "Template updated successfully!".into())
        );
    }

    #[tokio::test]
    async fn delete_sets_flag_and_reports_server_message() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Endpoint::UpdateTemplate,
            json!({"status": false, "message": "Template in use"}),
        );
        transport.respond(
            Endpoint::GetTemplate,
            json!({"status": true, "data": template(2, 0, "<p>x</p>")}),
        );
        let mut controller = controller(&transport);
        let id = RecordId::from(2);
        assert_eq!(controller.request_delete(&id).await, CommandOutcome::Success);
        assert_eq!(controller.confirm_delete().await, CommandOutcome::Failed);
        assert_eq!(
            transport.calls_to(Endpoint::UpdateTemplate)[0].body,
            Some(json!({"isDeleted": 1}))
        );
        assert_eq!(latest(&controller), (Severity::Error, "Template in use".into()));
        assert!(controller.pending_delete().is_none());
    }

    #[tokio::test]
    async fn edit_announces_loaded_template() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Endpoint::GetTemplate,
            json!({"status": true, "data": template(4, 0, "<p>Body</p>")}),
        );
        let mut controller = controller(&transport);
        assert_eq!(controller.edit(&RecordId::from(4)).await, CommandOutcome::Success);
        assert_eq!(
            controller.editor().map(|editor| editor.form.content.as_str()),
            Some("<p>Body</p>")
        );
        assert_eq!(
            latest(&controller),
            (Severity::Success, "Template loaded successfully!".into())
        );
    }

    #[tokio::test]
    async fn send_appends_footer_once() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Endpoint::GetTemplate,
            json!({"status": true, "data": template(1, 0, "<p>News</p>")}),
        );
        transport.respond(
            Endpoint::GetTemplate,
            json!({"status": true, "data": template(2, 0, "<a>Unsubscribe</a>")}),
        );
        let mut controller = controller(&transport);

        assert_eq!(controller.send(&RecordId::from(1)).await, CommandOutcome::Success);
        assert_eq!(controller.send(&RecordId::from(2)).await, CommandOutcome::Success);

        let sends = transport.calls_to(Endpoint::SendBulk);
        let first = sends[0].body.as_ref().expect("body");
        assert_eq!(first["subject"], json!("S1"));
        let content = first["content"].as_str().expect("content");
        assert!(content.starts_with("<p>News</p>"));
        assert!(content.contains("http://api.test/email/unsubscribe?email={{email}}"));
        assert_eq!(
            sends[1].body,
            Some(json!({"subject": "S2", "content": "<a>Unsubscribe</a>"}))
        );
        assert!(transport.calls_to(Endpoint::UpdateTemplate).is_empty());
        assert_eq!(
            latest(&controller),
            (
                Severity::Success,
                "Email sent successfully with unsubscribe footer!".into()
            )
        );
    }

    #[tokio::test]
    async fn deleted_template_is_not_sent() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Endpoint::GetTemplate,
            json!({"status": true, "data": template(3, 1, "<p>Old</p>")}),
        );
        let mut controller = controller(&transport);
        assert_eq!(controller.send(&RecordId::from(3)).await, CommandOutcome::Blocked);
        assert!(transport.calls_to(Endpoint::SendBulk).is_empty());
    }

    #[tokio::test]
    async fn send_transport_failure_is_reported() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Endpoint::GetTemplate,
            json!({"status": true, "data": template(1, 0, "")}),
        );
        transport.fail(Endpoint::SendBulk);
        let mut controller = controller(&transport);
        assert_eq!(controller.send(&RecordId::from(1)).await, CommandOutcome::Failed);
        assert_eq!(
            latest(&controller),
            (Severity::Error, "Error sending email.".into())
        );
    }
}
