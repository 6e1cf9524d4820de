//! Command handlers for a record list screen.

use std::time::Duration;

use mailroom_api_models::{ApiOutcome, DUPLICATE_SAVED_MESSAGE, RecordId};

use crate::api::{ApiClient, ApiResult};
use crate::config::PAGE_SIZE_OPTIONS;
use crate::core::notify::Notifications;
use crate::features::records::confirm::DeleteConfirmation;
use crate::features::records::editor::EditorDialog;
use crate::features::records::kind::{RecordKind, RecordStatus, StatusBadge, Texts};
use crate::features::records::state::{ListState, ViewState};

/// Result of one controller command, for surfaces choosing an exit status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum CommandOutcome {
    /// The command completed.
    Success,
    /// The command completed with a caveat the operator should read.
    Warning,
    /// The command was refused locally; nothing was sent.
    Blocked,
    /// The collaborator or the transport reported failure.
    Failed,
}

impl CommandOutcome {
    /// Whether the command took effect.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success | Self::Warning)
    }
}

/// Row actions offered for a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RowActions {
    /// Edit control visible.
    pub edit: bool,
    /// Delete control visible.
    pub delete: bool,
    /// Send control visible.
    pub send: bool,
}

/// One rendered row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowView<'a, R> {
    /// Stored record.
    pub record: &'a R,
    /// Status badge.
    pub badge: StatusBadge,
    /// Available actions.
    pub actions: RowActions,
}

/// Generic controller for a paginated, filterable record screen.
pub struct ListController<K: RecordKind> {
    pub(crate) kind: K,
    pub(crate) api: ApiClient,
    state: ListState<K::Record>,
    editor: Option<EditorDialog<K::Form>>,
    confirmation: Option<DeleteConfirmation>,
    pub(crate) notifications: Notifications,
}

impl<K: RecordKind> std::fmt::Debug for ListController<K> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ListController")
            .field("view", &self.state.view())
            .field("total", &self.state.total())
            .field("editing", &self.editor.is_some())
            .field("pending_delete", &self.confirmation)
            .finish_non_exhaustive()
    }
}

impl<K: RecordKind> ListController<K> {
    /// Controller with an empty list on page 1.
    #[must_use]
    pub fn new(
        kind: K,
        api: ApiClient,
        page_size: u32,
        notification_lifetime: Duration,
    ) -> Self {
        Self {
            kind,
            api,
            state: ListState::new(ViewState::first(page_size)),
            editor: None,
            confirmation: None,
            notifications: Notifications::new(notification_lifetime),
        }
    }

    /// Record kind configuration.
    #[must_use]
    pub const fn kind(&self) -> &K {
        &self.kind
    }

    /// Current list state.
    #[must_use]
    pub const fn state(&self) -> &ListState<K::Record> {
        &self.state
    }

    /// Current view.
    #[must_use]
    pub const fn view(&self) -> ViewState {
        self.state.view()
    }

    /// Rows on the current page.
    #[must_use]
    pub fn visible(&self) -> &[K::Record] {
        self.state.visible(self.kind.paging())
    }

    /// Rows on the current page with badges and actions.
    #[must_use]
    pub fn rows(&self) -> Vec<RowView<'_, K::Record>> {
        let can_send = self.kind.can_send();
        self.visible()
            .iter()
            .map(|record| {
                let status = K::status(record);
                let enabled = status.allows_actions();
                RowView {
                    record,
                    badge: status.badge(),
                    actions: RowActions {
                        edit: enabled,
                        delete: enabled,
                        send: enabled && can_send,
                    },
                }
            })
            .collect()
    }

    /// Open editor, if any.
    #[must_use]
    pub const fn editor(&self) -> Option<&EditorDialog<K::Form>> {
        self.editor.as_ref()
    }

    /// Mutable access to the open editor's form.
    pub fn editor_mut(&mut self) -> Option<&mut EditorDialog<K::Form>> {
        self.editor.as_mut()
    }

    /// Pending delete confirmation, if any.
    #[must_use]
    pub const fn pending_delete(&self) -> Option<&DeleteConfirmation> {
        self.confirmation.as_ref()
    }

    /// Notification queue.
    #[must_use]
    pub const fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Mutable notification queue for dismissal and expiry.
    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    /// Fetch the records for a view and replace the list on success.
    pub async fn load(
        &mut self,
        page: u32,
        page_size: u32,
        filter: Option<RecordStatus>,
    ) -> CommandOutcome {
        let messages = self.kind.messages();
        if filter.is_some_and(|status| !self.kind.accepts_filter(status)) {
            self.notifications.warning(messages.invalid_filter);
            return CommandOutcome::Blocked;
        }
        if page_size == 0 {
            self.notifications.warning(messages.invalid_page_size);
            return CommandOutcome::Blocked;
        }
        let view = ViewState {
            page: page.max(1),
            page_size,
            filter,
        };
        tracing::debug!(
            page = view.page,
            page_size = view.page_size,
            status = filter.map(RecordStatus::label),
            "loading records"
        );
        let result = self.kind.fetch(&self.api, &view).await;
        let Some(records) = self.settle(result, &messages.load) else {
            return CommandOutcome::Failed;
        };
        let retained: Vec<_> = match filter {
            Some(status) => records
                .into_iter()
                .filter(|record| K::status(record) == status)
                .collect(),
            None => records,
        };
        self.state.replace(retained, view);
        if let Some(message) = messages.load.success {
            self.notifications.success(message);
        }
        CommandOutcome::Success
    }

    /// Reload the current view.
    pub async fn refresh(&mut self) -> CommandOutcome {
        let view = self.state.view();
        self.load(view.page, view.page_size, view.filter).await
    }

    /// Move to `page` keeping size and filter.
    pub async fn set_page(&mut self, page: u32) -> CommandOutcome {
        let view = self.state.view();
        self.load(page, view.page_size, view.filter).await
    }

    /// Change the page size and return to page 1.
    pub async fn set_page_size(&mut self, page_size: u32) -> CommandOutcome {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            self.notifications
                .warning(self.kind.messages().invalid_page_size);
            return CommandOutcome::Blocked;
        }
        let view = self.state.view();
        self.load(1, page_size, view.filter).await
    }

    /// Change the status filter and return to page 1.
    pub async fn set_filter(&mut self, filter: Option<RecordStatus>) -> CommandOutcome {
        let view = self.state.view();
        self.load(1, view.page_size, filter).await
    }

    /// Open a blank editor.
    pub fn open_create(&mut self) {
        self.editor = Some(EditorDialog::create());
    }

    /// Discard the open editor without saving.
    pub fn cancel_edit(&mut self) {
        self.editor = None;
    }

    /// Fetch a full record and open the editor pre-populated with it.
    pub async fn edit(&mut self, id: &RecordId) -> CommandOutcome {
        let messages = self.kind.messages();
        if self.loaded_status(id).is_some_and(|status| !status.allows_actions()) {
            self.notifications.warning(messages.inactive);
            return CommandOutcome::Blocked;
        }
        let result = self.kind.fetch_one(&self.api, id).await;
        let Some(record) = self.settle(result, &messages.fetch) else {
            return CommandOutcome::Failed;
        };
        if !K::status(&record).allows_actions() {
            self.notifications.warning(messages.inactive);
            return CommandOutcome::Blocked;
        }
        self.editor = Some(EditorDialog::edit(id.clone(), K::form_from(&record)));
        if let Some(message) = messages.fetch.success {
            self.notifications.success(message);
        }
        CommandOutcome::Success
    }

    /// Fetch one full record for display without opening the editor.
    pub async fn fetch_record(&mut self, id: &RecordId) -> Option<K::Record> {
        let texts = self.kind.messages().fetch;
        let result = self.kind.fetch_one(&self.api, id).await;
        self.settle(result, &texts)
    }

    /// Save the open editor.
    pub async fn submit(&mut self) -> CommandOutcome {
        let Some(editor) = self.editor.as_ref() else {
            return CommandOutcome::Blocked;
        };
        let form = editor.form.clone();
        let target = editor.target().cloned();
        self.save(&form, target.as_ref()).await
    }

    /// Validate and save `form`, creating when `target` is `None`.
    ///
    /// Field errors block the save before any request and are attached to
    /// the open editor. Success closes the editor and reloads the list.
    pub async fn save(&mut self, form: &K::Form, target: Option<&RecordId>) -> CommandOutcome {
        if let Err(errors) = K::validate(form) {
            tracing::debug!(%errors, "save blocked by validation");
            if let Some(editor) = self.editor.as_mut() {
                editor.set_errors(errors);
            }
            return CommandOutcome::Blocked;
        }
        let messages = self.kind.messages();
        let texts = if target.is_some() {
            &messages.update
        } else {
            &messages.create
        };
        match self.kind.save(&self.api, form, target).await {
            Ok(ApiOutcome::Ok(())) => {
                tracing::info!(id = target.map(RecordId::as_str), "record saved");
                if let Some(message) = texts.success {
                    self.notifications.success(message);
                }
                self.editor = None;
                let _ = self.refresh().await;
                CommandOutcome::Success
            }
            Ok(ApiOutcome::Fail(Some(message)))
                if target.is_none() && message == DUPLICATE_SAVED_MESSAGE =>
            {
                tracing::warn!("duplicate address saved as a new record");
                self.notifications.warning(message);
                self.editor = None;
                let _ = self.refresh().await;
                CommandOutcome::Warning
            }
            Ok(ApiOutcome::Fail(message)) => {
                tracing::warn!(id = target.map(RecordId::as_str), "save rejected");
                self.notifications
                    .error(message.unwrap_or_else(|| texts.failed.to_string()));
                CommandOutcome::Failed
            }
            Err(err) => {
                tracing::error!(operation = err.operation(), error = %err, "save failed");
                self.notifications.error(texts.error);
                CommandOutcome::Failed
            }
        }
    }

    /// Open the delete confirmation for `id` when the record is active.
    ///
    /// Records outside the loaded page are fetched to learn their status.
    pub async fn request_delete(&mut self, id: &RecordId) -> CommandOutcome {
        let Some(status) = self.current_status(id).await else {
            return CommandOutcome::Failed;
        };
        if !status.allows_actions() {
            self.notifications.warning(self.kind.messages().inactive);
            return CommandOutcome::Blocked;
        }
        self.confirmation = Some(DeleteConfirmation::new(id.clone()));
        CommandOutcome::Success
    }

    /// Discard the pending delete with no side effect.
    pub fn cancel_delete(&mut self) {
        self.confirmation = None;
    }

    /// Soft-delete the record held by the confirmation dialog.
    pub async fn confirm_delete(&mut self) -> CommandOutcome {
        let Some(confirmation) = self.confirmation.take() else {
            return CommandOutcome::Blocked;
        };
        let id = confirmation.into_target();
        let texts = self.kind.messages().delete;
        self.change_status(&id, RecordStatus::Deleted, &texts).await
    }

    /// Reactivate a soft-deleted record. Unsubscribed records stay unsubscribed.
    pub async fn restore(&mut self, id: &RecordId) -> CommandOutcome {
        let Some(status) = self.current_status(id).await else {
            return CommandOutcome::Failed;
        };
        if status == RecordStatus::Unsubscribed {
            self.notifications.warning(self.kind.messages().inactive);
            return CommandOutcome::Blocked;
        }
        let texts = self.kind.messages().restore;
        self.change_status(id, RecordStatus::Active, &texts).await
    }

    async fn change_status(
        &mut self,
        id: &RecordId,
        status: RecordStatus,
        texts: &Texts,
    ) -> CommandOutcome {
        let result = self.kind.set_status(&self.api, id, status).await;
        if self.settle(result, texts).is_none() {
            return CommandOutcome::Failed;
        }
        tracing::info!(id = %id, status = status.label(), "record status changed");
        if let Some(record) = self
            .state
            .records_mut()
            .iter_mut()
            .find(|record| K::id(record) == id)
        {
            K::mark(record, status);
        }
        if let Some(message) = texts.success {
            self.notifications.success(message);
        }
        let _ = self.refresh().await;
        CommandOutcome::Success
    }

    /// Status from the loaded rows, else from the collaborator.
    async fn current_status(&mut self, id: &RecordId) -> Option<RecordStatus> {
        if let Some(status) = self.loaded_status(id) {
            return Some(status);
        }
        let texts = self.kind.messages().fetch;
        let result = self.kind.fetch_one(&self.api, id).await;
        self.settle(result, &texts).map(|record| K::status(&record))
    }

    fn loaded_status(&self, id: &RecordId) -> Option<RecordStatus> {
        self.state
            .records()
            .iter()
            .find(|record| K::id(record) == id)
            .map(K::status)
    }

    /// Unwrap a successful outcome, raising the failure notification otherwise.
    pub(crate) fn settle<T>(&mut self, result: ApiResult<ApiOutcome<T>>, texts: &Texts) -> Option<T> {
        match result {
            Ok(ApiOutcome::Ok(value)) => Some(value),
            Ok(ApiOutcome::Fail(message)) => {
                tracing::warn!(message = message.as_deref(), "collaborator rejected command");
                self.notifications
                    .error(message.unwrap_or_else(|| texts.failed.to_string()));
                None
            }
            Err(err) => {
                tracing::error!(operation = err.operation(), error = %err, "command failed");
                self.notifications.error(texts.error);
                None
            }
        }
    }
}
