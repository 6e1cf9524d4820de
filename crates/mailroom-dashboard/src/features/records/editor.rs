//! Record editor dialog state.

use mailroom_api_models::RecordId;

use crate::core::forms::FieldErrors;

/// Whether the editor creates or updates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorMode {
    /// New record.
    Create,
    /// Existing record.
    Edit(RecordId),
}

/// Open editor bound to one form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorDialog<F> {
    mode: EditorMode,
    /// Current form inputs.
    pub form: F,
    errors: FieldErrors,
}

impl<F: Default> EditorDialog<F> {
    /// Blank editor in create mode.
    #[must_use]
    pub fn create() -> Self {
        Self {
            mode: EditorMode::Create,
            form: F::default(),
            errors: FieldErrors::new(),
        }
    }
}

impl<F> EditorDialog<F> {
    /// Editor pre-populated for an existing record.
    #[must_use]
    pub fn edit(id: RecordId, form: F) -> Self {
        Self {
            mode: EditorMode::Edit(id),
            form,
            errors: FieldErrors::new(),
        }
    }

    /// Editor mode.
    #[must_use]
    pub const fn mode(&self) -> &EditorMode {
        &self.mode
    }

    /// Record targeted by an update, if any.
    #[must_use]
    pub const fn target(&self) -> Option<&RecordId> {
        match &self.mode {
            EditorMode::Create => None,
            EditorMode::Edit(id) => Some(id),
        }
    }

    /// Dialog title for `noun`.
    #[must_use]
    pub fn title(&self, noun: &str) -> String {
        match self.mode {
            EditorMode::Create => format!("Add {noun}"),
            EditorMode::Edit(_) => format!("Edit {noun}"),
        }
    }

    /// Field errors from the last submit.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub(crate) fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }
}
