//! Recipient configuration of the list controller.

use async_trait::async_trait;
use mailroom_api_models::{
    ApiOutcome, Recipient, RecipientCreateRequest, RecipientListRequest, RecipientStatus,
    RecipientUpdateRequest, RecordId, UnknownStatusCode,
};

use crate::api::{ApiClient, ApiResult, SpreadsheetUpload};
use crate::core::forms::FieldErrors;
use crate::features::recipients::logic::{validate_recipient, validate_upload};
use crate::features::recipients::state::RecipientForm;
use crate::features::records::{
    CommandOutcome, ListController, Messages, Paging, RecordKind, RecordStatus, Texts, ViewState,
};
use crate::footer::augment_recipient_content;

/// Notification texts for the recipient screen.
pub static RECIPIENT_MESSAGES: Messages = Messages {
    noun: "Email",
    load: Texts {
        success: None,
        failed: "Failed to load emails",
        error: "Error fetching emails",
    },
    fetch: Texts {
        success: None,
        failed: "Failed to fetch email",
        error: "Error fetching email",
    },
    create: Texts {
        success: Some("Email created successfully"),
        failed: "Failed to create email",
        error: "Failed to save email",
    },
    update: Texts {
        success: Some("Email updated successfully"),
        failed: "Failed to update email",
        error: "Failed to save email",
    },
    delete: Texts {
        success: Some("Email deleted successfully"),
        failed: "Failed to delete email",
        error: "Error deleting email",
    },
    restore: Texts {
        success: Some("Email restored successfully"),
        failed: "Failed to restore email",
        error: "Error restoring email",
    },
    inactive: "Only active emails can be changed",
    invalid_filter: "Unknown email status filter",
    invalid_page_size: "Page size must be one of 5, 10, 25, 50, 100",
};

const IMPORT_TEXTS: Texts = Texts {
    success: Some("File uploaded successfully"),
    failed: "Failed to upload file",
    error: "Error uploading file",
};

/// Recipient list controller.
pub type RecipientsController = ListController<RecipientKind>;

/// Recipient record contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientKind {
    unsubscribe_base: String,
}

impl RecipientKind {
    /// Kind whose footer links point under `unsubscribe_base`.
    #[must_use]
    pub fn new(unsubscribe_base: impl Into<String>) -> Self {
        Self {
            unsubscribe_base: unsubscribe_base.into(),
        }
    }
}

const fn wire_status(status: RecordStatus) -> RecipientStatus {
    match status {
        RecordStatus::Active => RecipientStatus::Active,
        RecordStatus::Deleted => RecipientStatus::Deleted,
        RecordStatus::Unsubscribed => RecipientStatus::Unsubscribed,
    }
}

#[async_trait]
impl RecordKind for RecipientKind {
    type Record = Recipient;
    type Form = RecipientForm;

    fn messages(&self) -> &'static Messages {
        &RECIPIENT_MESSAGES
    }

    fn paging(&self) -> Paging {
        Paging::Server
    }

    fn id(record: &Recipient) -> &RecordId {
        &record.id
    }

    fn status(record: &Recipient) -> RecordStatus {
        record.status.into()
    }

    fn mark(record: &mut Recipient, status: RecordStatus) {
        record.status = wire_status(status);
    }

    fn accepts_filter(&self, _status: RecordStatus) -> bool {
        true
    }

    fn parse_filter(&self, input: &str) -> Result<RecordStatus, UnknownStatusCode> {
        input.parse::<RecipientStatus>().map(RecordStatus::from)
    }

    fn form_from(record: &Recipient) -> RecipientForm {
        RecipientForm {
            name: record.name.clone(),
            email: record.email.clone(),
            body: record.content.clone().unwrap_or_default(),
        }
    }

    fn validate(form: &RecipientForm) -> Result<(), FieldErrors> {
        validate_recipient(form)
    }

    async fn fetch(
        &self,
        api: &ApiClient,
        view: &ViewState,
    ) -> ApiResult<ApiOutcome<Vec<Recipient>>> {
        let request = RecipientListRequest {
            page: view.page,
            items_per_page: view.page_size,
            status: view.filter.map(wire_status),
        };
        api.list_recipients(&request).await
    }

    async fn fetch_one(&self, api: &ApiClient, id: &RecordId) -> ApiResult<ApiOutcome<Recipient>> {
        api.get_recipient(id).await
    }

    async fn save(
        &self,
        api: &ApiClient,
        form: &RecipientForm,
        target: Option<&RecordId>,
    ) -> ApiResult<ApiOutcome<()>> {
        let content = augment_recipient_content(&form.body, &self.unsubscribe_base, target);
        match target {
            None => {
                let request = RecipientCreateRequest {
                    name: form.name.clone(),
                    email: form.email.clone(),
                    content,
                };
                api.create_recipient(&request).await
            }
            Some(id) => {
                let request = RecipientUpdateRequest {
                    name: Some(form.name.clone()),
                    email: Some(form.email.clone()),
                    status: Some(RecipientStatus::Active),
                    content: Some(content),
                };
                api.update_recipient(id, &request).await
            }
        }
    }

    async fn set_status(
        &self,
        api: &ApiClient,
        id: &RecordId,
        status: RecordStatus,
    ) -> ApiResult<ApiOutcome<()>> {
        let request = RecipientUpdateRequest::status_only(wire_status(status));
        api.update_recipient(id, &request).await
    }
}

impl ListController<RecipientKind> {
    /// Upload a recipient spreadsheet and reload on acknowledgement.
    pub async fn import(&mut self, upload: &SpreadsheetUpload) -> CommandOutcome {
        if let Err(errors) = validate_upload(upload) {
            for (_, message) in errors.iter() {
                self.notifications.warning(message);
            }
            return CommandOutcome::Blocked;
        }
        let ack = match self.api.import_recipients(upload).await {
            Ok(ack) => ack,
            Err(err) => {
                tracing::error!(operation = err.operation(), error = %err, "import failed");
                self.notifications.error(IMPORT_TEXTS.error);
                return CommandOutcome::Failed;
            }
        };
        if !ack.accepted {
            tracing::warn!(file = %upload.file_name, "import rejected");
            self.notifications.error(IMPORT_TEXTS.failed);
            return CommandOutcome::Failed;
        }
        tracing::info!(file = %upload.file_name, "spreadsheet imported");
        if let Some(message) = IMPORT_TEXTS.success {
            self.notifications.success(message);
        }
        let _ = self.refresh().await;
        CommandOutcome::Success
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use mailroom_api_models::{DUPLICATE_SAVED_MESSAGE, Endpoint};
    use serde_json::json;

    use super::*;
    use crate::core::forms::{EMAIL_MISSING_AT, fields};
    use crate::core::notify::Severity;
    use crate::testing::ScriptedTransport;

    const BASE: &str = "https://front.example/unsubscribe";

    fn controller(transport: &Arc<ScriptedTransport>) -> RecipientsController {
        ListController::new(
            RecipientKind::new(BASE),
            ApiClient::new(transport.clone()),
            10,
            Duration::from_secs(4),
        )
    }

    fn row(id: u64, status: u8) -> serde_json::Value {
        json!({"id": id, "name": format!("R{id}"), "email": format!("r{id}@x.io"), "status": status})
    }

    fn latest(controller: &RecipientsController) -> (Severity, String) {
        let note = controller.notifications().latest().expect("notification");
        (note.severity, note.message.clone())
    }

    #[tokio::test]
    async fn active_filter_shows_green_rows() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Endpoint::ListRecipients,
            json!({"status": true, "data": [row(1, 1), row(2, 1), row(3, 1)]}),
        );
        let mut controller = controller(&transport);
        let outcome = controller.load(1, 10, Some(RecordStatus::Active)).await;
        assert_eq!(outcome, CommandOutcome::Success);
        assert_eq!(controller.state().total(), 3);
        let rows = controller.rows();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.badge.label == "Active"
            && row.badge.color == crate::features::records::BadgeColor::Green
            && row.actions.edit
            && !row.actions.send));
        assert_eq!(
            transport.calls_to(Endpoint::ListRecipients)[0].body,
            Some(json!({"page": 1, "itemsPerPage": 10, "status": 1}))
        );
    }

    #[tokio::test]
    async fn filter_is_reapplied_locally() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Endpoint::ListRecipients,
            json!({"status": true, "data": [row(1, 1), row(2, 0), row(3, 2)]}),
        );
        let mut controller = controller(&transport);
        let _ = controller.load(1, 10, Some(RecordStatus::Deleted)).await;
        assert_eq!(controller.state().total(), 1);
        assert_eq!(controller.visible()[0].id.as_str(), "2");
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_rows() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Endpoint::ListRecipients,
            json!({"status": true, "data": [row(1, 1), row(2, 1)]}),
        );
        transport.respond(Endpoint::ListRecipients, json!({"status": false}));
        transport.fail(Endpoint::ListRecipients);
        let mut controller = controller(&transport);
        let _ = controller.load(1, 10, None).await;
        let before = controller.state().clone();

        assert_eq!(controller.set_page(2).await, CommandOutcome::Failed);
        assert_eq!(controller.state(), &before);
        assert_eq!(latest(&controller), (Severity::Error, "Failed to load emails".into()));

        assert_eq!(controller.set_filter(Some(RecordStatus::Active)).await, CommandOutcome::Failed);
        assert_eq!(controller.state(), &before);
        assert_eq!(latest(&controller), (Severity::Error, "Error fetching emails".into()));
    }

    #[tokio::test]
    async fn page_size_change_resets_to_first_page() {
        let transport = ScriptedTransport::new();
        let mut controller = controller(&transport);
        let _ = controller.load(3, 10, None).await;
        assert_eq!(controller.view().page, 3);
        assert_eq!(controller.set_page_size(25).await, CommandOutcome::Success);
        assert_eq!(controller.view().page, 1);
        assert_eq!(controller.view().page_size, 25);
        assert_eq!(controller.set_page_size(7).await, CommandOutcome::Blocked);
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn invalid_recipient_never_reaches_the_network() {
        let transport = ScriptedTransport::new();
        let mut controller = controller(&transport);
        controller.open_create();
        if let Some(editor) = controller.editor_mut() {
            editor.form.name = "A".into();
            editor.form.email = "no-at-sign".into();
        }
        assert_eq!(controller.submit().await, CommandOutcome::Blocked);
        assert!(transport.calls().is_empty());
        let editor = controller.editor().expect("editor stays open");
        assert_eq!(editor.errors().get(fields::EMAIL), Some(EMAIL_MISSING_AT));
    }

    #[tokio::test]
    async fn create_appends_footer_for_new_record_and_reloads() {
        let transport = ScriptedTransport::new();
        let mut controller = controller(&transport);
        controller.open_create();
        if let Some(editor) = controller.editor_mut() {
            editor.form = RecipientForm {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                body: "<p>Hi</p>".into(),
            };
        }
        assert_eq!(controller.submit().await, CommandOutcome::Success);
        assert!(controller.editor().is_none());
        let create = &transport.calls_to(Endpoint::CreateRecipient)[0];
        let body = create.body.as_ref().expect("body");
        let expected = augment_recipient_content("<p>Hi</p>", BASE, None);
        assert_eq!(body["content"], json!(expected));
        assert!(expected.contains("https://front.example/unsubscribe/0"));
        assert_eq!(transport.calls_to(Endpoint::ListRecipients).len(), 1);
        assert_eq!(
            latest(&controller),
            (Severity::Success, "Email created successfully".into())
        );
    }

    #[tokio::test]
    async fn duplicate_create_is_a_warning_not_a_failure() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Endpoint::CreateRecipient,
            json!({"status": false, "message": DUPLICATE_SAVED_MESSAGE}),
        );
        let mut controller = controller(&transport);
        let form = RecipientForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            body: String::new(),
        };
        assert_eq!(controller.save(&form, None).await, CommandOutcome::Warning);
        assert_eq!(
            latest(&controller),
            (Severity::Warning, DUPLICATE_SAVED_MESSAGE.into())
        );
        assert_eq!(transport.calls_to(Endpoint::ListRecipients).len(), 1);
    }

    #[tokio::test]
    async fn edit_fetches_full_record_and_update_reappends_footer() {
        let transport = ScriptedTransport::new();
        let stored = augment_recipient_content("<p>Body</p>", BASE, Some(&RecordId::from(5)));
        transport.respond(
            Endpoint::GetRecipient,
            json!({"status": true, "data": {"id": 5, "name": "E", "email": "e@x.io", "status": 1, "content": stored}}),
        );
        let mut controller = controller(&transport);
        let id = RecordId::from(5);
        assert_eq!(controller.edit(&id).await, CommandOutcome::Success);
        let editor = controller.editor().expect("editor open");
        assert_eq!(editor.target(), Some(&id));
        assert_eq!(editor.title("Email"), "Edit Email");
        assert_eq!(controller.submit().await, CommandOutcome::Success);
        let update = &transport.calls_to(Endpoint::UpdateRecipient)[0];
        let body = update.body.as_ref().expect("body");
        assert_eq!(body["status"], json!(1));
        let content = body["content"].as_str().expect("content");
        assert_eq!(content.matches("unsubscribe here").count(), 2);
    }

    #[tokio::test]
    async fn failed_edit_fetch_keeps_editor_closed() {
        let transport = ScriptedTransport::new();
        transport.respond(Endpoint::GetRecipient, json!({"status": false}));
        let mut controller = controller(&transport);
        assert_eq!(controller.edit(&RecordId::from(5)).await, CommandOutcome::Failed);
        assert!(controller.editor().is_none());
        assert_eq!(
            latest(&controller),
            (Severity::Error, "Failed to fetch email".into())
        );
    }

    #[tokio::test]
    async fn rejected_update_keeps_editor_open_with_server_message() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Endpoint::UpdateRecipient,
            json!({"status": false, "message": "Email is locked"}),
        );
        let mut controller = controller(&transport);
        let form = RecipientForm {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            body: String::new(),
        };
        let outcome = controller.save(&form, Some(&RecordId::from(9))).await;
        assert_eq!(outcome, CommandOutcome::Failed);
        assert_eq!(latest(&controller), (Severity::Error, "Email is locked".into()));
        assert!(transport.calls_to(Endpoint::ListRecipients).is_empty());
    }

    #[tokio::test]
    async fn confirmed_delete_soft_deletes_and_hides_actions() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Endpoint::ListRecipients,
            json!({"status": true, "data": [row(4, 1)]}),
        );
        transport.respond(Endpoint::UpdateRecipient, json!({"status": true}));
        transport.respond(
            Endpoint::ListRecipients,
            json!({"status": true, "data": [row(4, 0)]}),
        );
        let mut controller = controller(&transport);
        let _ = controller.load(1, 10, None).await;
        let id = RecordId::from(4);

        assert_eq!(controller.request_delete(&id).await, CommandOutcome::Success);
        controller.cancel_delete();
        assert_eq!(controller.confirm_delete().await, CommandOutcome::Blocked);
        assert!(transport.calls_to(Endpoint::UpdateRecipient).is_empty());

        let _ = controller.request_delete(&id).await;
        assert_eq!(controller.pending_delete().map(|p| p.target()), Some(&id));
        assert_eq!(controller.confirm_delete().await, CommandOutcome::Success);
        assert_eq!(
            transport.calls_to(Endpoint::UpdateRecipient)[0].body,
            Some(json!({"status": 0}))
        );
        let rows = controller.rows();
        assert_eq!(rows[0].badge.label, "Deleted");
        assert_eq!(rows[0].actions, crate::features::records::RowActions::default());
    }

    #[tokio::test]
    async fn unsubscribed_rows_are_terminal() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Endpoint::ListRecipients,
            json!({"status": true, "data": [row(8, 2)]}),
        );
        let mut controller = controller(&transport);
        let _ = controller.load(1, 10, None).await;
        let id = RecordId::from(8);
        assert_eq!(controller.request_delete(&id).await, CommandOutcome::Blocked);
        assert_eq!(controller.edit(&id).await, CommandOutcome::Blocked);
        assert_eq!(controller.restore(&id).await, CommandOutcome::Blocked);
        assert_eq!(transport.calls().len(), 1);
        assert_eq!(controller.rows()[0].badge.color.as_str(), "orange");
    }

    #[tokio::test]
    async fn unloaded_unsubscribed_recipient_is_fetched_and_refused() {
        let transport = ScriptedTransport::new();
        transport.respond(Endpoint::GetRecipient, json!({"status": true, "data": row(8, 2)}));
        transport.respond(Endpoint::GetRecipient, json!({"status": true, "data": row(8, 2)}));
        let mut controller = controller(&transport);
        let id = RecordId::from(8);

        assert_eq!(controller.restore(&id).await, CommandOutcome::Blocked);
        assert_eq!(controller.request_delete(&id).await, CommandOutcome::Blocked);
        assert!(controller.pending_delete().is_none());
        assert_eq!(controller.confirm_delete().await, CommandOutcome::Blocked);
        assert_eq!(transport.calls_to(Endpoint::GetRecipient).len(), 2);
        assert!(transport.calls_to(Endpoint::UpdateRecipient).is_empty());
    }

    #[tokio::test]
    async fn filtered_view_still_guards_hidden_unsubscribed_rows() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Endpoint::ListRecipients,
            json!({"status": true, "data": [row(3, 0), row(8, 2)]}),
        );
        transport.respond(Endpoint::GetRecipient, json!({"status": true, "data": row(8, 2)}));
        let mut controller = controller(&transport);
        let _ = controller.load(1, 10, Some(RecordStatus::Deleted)).await;
        assert_eq!(controller.visible().len(), 1);

        assert_eq!(
            controller.restore(&RecordId::from(8)).await,
            CommandOutcome::Blocked
        );
        assert!(transport.calls_to(Endpoint::UpdateRecipient).is_empty());

        assert_eq!(
            controller.restore(&RecordId::from(3)).await,
            CommandOutcome::Success
        );
        assert_eq!(transport.calls_to(Endpoint::GetRecipient).len(), 1);
        assert_eq!(
            transport.calls_to(Endpoint::UpdateRecipient)[0].body,
            Some(json!({"status": 1}))
        );
    }

    #[tokio::test]
    async fn failed_status_lookup_blocks_the_update() {
        let transport = ScriptedTransport::new();
        transport.fail(Endpoint::GetRecipient);
        let mut controller = controller(&transport);
        assert_eq!(
            controller.restore(&RecordId::from(5)).await,
            CommandOutcome::Failed
        );
        assert!(transport.calls_to(Endpoint::UpdateRecipient).is_empty());
        assert_eq!(latest(&controller).0, Severity::Error);
    }

    #[tokio::test]
    async fn restore_sets_active_status() {
        let transport = ScriptedTransport::new();
        transport.respond(Endpoint::GetRecipient, json!({"status": true, "data": row(3, 0)}));
        let mut controller = controller(&transport);
        assert_eq!(
            controller.restore(&RecordId::from(3)).await,
            CommandOutcome::Success
        );
        assert_eq!(
            transport.calls_to(Endpoint::UpdateRecipient)[0].body,
            Some(json!({"status": 1}))
        );
    }

    #[tokio::test]
    async fn import_gates_extension_and_reloads_on_ack() {
        let transport = ScriptedTransport::new();
        let mut controller = controller(&transport);
        let csv = SpreadsheetUpload {
            file_name: "people.csv".into(),
            bytes: vec![1, 2, 3],
        };
        assert_eq!(controller.import(&csv).await, CommandOutcome::Blocked);
        assert!(transport.calls().is_empty());

        let xlsx = SpreadsheetUpload {
            file_name: "people.xlsx".into(),
            bytes: vec![1, 2, 3],
        };
        assert_eq!(controller.import(&xlsx).await, CommandOutcome::Success);
        assert_eq!(
            transport.calls_to(Endpoint::ImportRecipients)[0].body,
            Some(json!({"fileName": "people.xlsx", "size": 3}))
        );
        assert_eq!(transport.calls_to(Endpoint::ListRecipients).len(), 1);

        transport.respond(Endpoint::ImportRecipients, serde_json::Value::Null);
        assert_eq!(controller.import(&xlsx).await, CommandOutcome::Failed);
        assert_eq!(
            latest(&controller),
            (Severity::Error, "Failed to upload file".into())
        );
    }

    #[test]
    fn filters_parse_names_and_codes() {
        let kind = RecipientKind::new(BASE);
        assert_eq!(kind.parse_filter("2"), Ok(RecordStatus::Unsubscribed));
        assert_eq!(kind.parse_filter("active"), Ok(RecordStatus::Active));
        assert!(kind.parse_filter("7").is_err());
    }
}
