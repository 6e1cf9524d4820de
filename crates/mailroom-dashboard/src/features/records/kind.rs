//! Per-record contract plugged into the list controller.

use std::str::FromStr;

use async_trait::async_trait;
use mailroom_api_models::{
    ApiOutcome, DeletionFlag, RecipientStatus, RecordId, UnknownStatusCode,
};

use crate::api::{ApiClient, ApiResult};
use crate::core::forms::FieldErrors;
use crate::features::records::state::ViewState;

/// Display status shared by every record kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordStatus {
    /// Live record.
    Active,
    /// Soft-deleted record.
    Deleted,
    /// Recipient unsubscribed through the collaborator.
    Unsubscribed,
}

impl RecordStatus {
    /// Badge label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Deleted => "Deleted",
            Self::Unsubscribed => "Unsubscribed",
        }
    }

    /// Badge colour.
    #[must_use]
    pub const fn color(self) -> BadgeColor {
        match self {
            Self::Active => BadgeColor::Green,
            Self::Deleted => BadgeColor::Red,
            Self::Unsubscribed => BadgeColor::Orange,
        }
    }

    /// Whether row actions are available.
    #[must_use]
    pub const fn allows_actions(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Label and colour pair.
    #[must_use]
    pub const fn badge(self) -> StatusBadge {
        StatusBadge {
            label: self.label(),
            color: self.color(),
        }
    }
}

impl From<RecipientStatus> for RecordStatus {
    fn from(value: RecipientStatus) -> Self {
        match value {
            RecipientStatus::Active => Self::Active,
            RecipientStatus::Deleted => Self::Deleted,
            RecipientStatus::Unsubscribed => Self::Unsubscribed,
        }
    }
}

impl From<DeletionFlag> for RecordStatus {
    fn from(value: DeletionFlag) -> Self {
        if value.is_deleted() {
            Self::Deleted
        } else {
            Self::Active
        }
    }
}

impl FromStr for RecordStatus {
    type Err = UnknownStatusCode;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "deleted" => Ok(Self::Deleted),
            "unsubscribed" | "unsubscribe" => Ok(Self::Unsubscribed),
            _ => Err(UnknownStatusCode(input.to_string())),
        }
    }
}

/// Badge colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadgeColor {
    /// Active.
    Green,
    /// Deleted.
    Red,
    /// Unsubscribed.
    Orange,
}

impl BadgeColor {
    /// Lowercase colour name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Red => "red",
            Self::Orange => "orange",
        }
    }
}

/// Rendered status badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusBadge {
    /// Display label.
    pub label: &'static str,
    /// Display colour.
    pub color: BadgeColor,
}

/// Where pagination happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paging {
    /// The collaborator returns exactly the requested page.
    Server,
    /// One window is fetched and sliced locally.
    Local {
        /// Number of records requested per fetch.
        fetch_window: u32,
    },
}

/// Notification texts for one operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Texts {
    /// Raised on success, when the operation announces it.
    pub success: Option<&'static str>,
    /// Fallback when the collaborator reports failure without a message.
    pub failed: &'static str,
    /// Raised on transport failure.
    pub error: &'static str,
}

/// Notification texts for every list operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Messages {
    /// Singular noun used in editor titles.
    pub noun: &'static str,
    /// List load.
    pub load: Texts,
    /// Single-record fetch for editing.
    pub fetch: Texts,
    /// Create.
    pub create: Texts,
    /// Update.
    pub update: Texts,
    /// Soft delete.
    pub delete: Texts,
    /// Restore.
    pub restore: Texts,
    /// Raised when an action targets a record that is not active.
    pub inactive: &'static str,
    /// Raised when a filter does not apply to this record kind.
    pub invalid_filter: &'static str,
    /// Raised when a page size is not one of the offered options.
    pub invalid_page_size: &'static str,
}

/// Per-record contract consumed by [`ListController`](super::ListController).
#[async_trait]
pub trait RecordKind: Send + Sync {
    /// Stored record type.
    type Record: Clone + Send + Sync;
    /// Editable form type.
    type Form: Clone + Default + Send + Sync;

    /// Notification texts.
    fn messages(&self) -> &'static Messages;

    /// Pagination strategy.
    fn paging(&self) -> Paging;

    /// Record identifier.
    fn id(record: &Self::Record) -> &RecordId;

    /// Record display status.
    fn status(record: &Self::Record) -> RecordStatus;

    /// Apply a status locally after the collaborator confirmed it.
    fn mark(record: &mut Self::Record, status: RecordStatus);

    /// Whether `status` is a valid filter for this kind.
    fn accepts_filter(&self, status: RecordStatus) -> bool;

    /// Parse a filter from a name or wire code.
    ///
    /// # Errors
    /// Returns [`UnknownStatusCode`] for anything outside this kind's codes.
    fn parse_filter(&self, input: &str) -> Result<RecordStatus, UnknownStatusCode>;

    /// Pre-populate the editor from a stored record.
    fn form_from(record: &Self::Record) -> Self::Form;

    /// Local validation run before any save.
    ///
    /// # Errors
    /// Returns the failing fields.
    fn validate(form: &Self::Form) -> Result<(), FieldErrors>;

    /// Whether active rows offer a send action.
    fn can_send(&self) -> bool {
        false
    }

    /// Fetch the records for `view`.
    async fn fetch(
        &self,
        api: &ApiClient,
        view: &ViewState,
    ) -> ApiResult<ApiOutcome<Vec<Self::Record>>>;

    /// Fetch one full record.
    async fn fetch_one(&self, api: &ApiClient, id: &RecordId)
    -> ApiResult<ApiOutcome<Self::Record>>;

    /// Create (`target == None`) or update a record from a validated form.
    async fn save(
        &self,
        api: &ApiClient,
        form: &Self::Form,
        target: Option<&RecordId>,
    ) -> ApiResult<ApiOutcome<()>>;

    /// Issue a status-only update.
    async fn set_status(
        &self,
        api: &ApiClient,
        id: &RecordId,
        status: RecordStatus,
    ) -> ApiResult<ApiOutcome<()>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badges_follow_status() {
        assert_eq!(
            RecordStatus::Active.badge(),
            StatusBadge {
                label: "Active",
                color: BadgeColor::Green
            }
        );
        assert_eq!(RecordStatus::Deleted.color(), BadgeColor::Red);
        assert_eq!(RecordStatus::Unsubscribed.color().as_str(), "orange");
        assert!(!RecordStatus::Unsubscribed.allows_actions());
    }

    #[test]
    fn wire_values_map_to_display_status() {
        assert_eq!(
            RecordStatus::from(RecipientStatus::Unsubscribed),
            RecordStatus::Unsubscribed
        );
        assert_eq!(
            RecordStatus::from(DeletionFlag::Deleted),
            RecordStatus::Deleted
        );
        assert_eq!("Deleted".parse(), Ok(RecordStatus::Deleted));
        assert!("paused".parse::<RecordStatus>().is_err());
    }
}
