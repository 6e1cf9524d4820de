//! Two-step delete guard.

use mailroom_api_models::RecordId;

/// Pending delete awaiting an explicit affirmative answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteConfirmation {
    target: RecordId,
}

impl DeleteConfirmation {
    /// Hold `target` until confirmed or cancelled.
    #[must_use]
    pub const fn new(target: RecordId) -> Self {
        Self { target }
    }

    /// Record the dialog will delete.
    #[must_use]
    pub const fn target(&self) -> &RecordId {
        &self.target
    }

    /// Consume the dialog, yielding its target.
    #[must_use]
    pub fn into_target(self) -> RecordId {
        self.target
    }
}
