//! Generic record list controller shared by the recipient and template screens.
//!
//! # Design
//! - One controller drives both screens; [`RecordKind`] supplies the per-record contract.
//! - Each command mutates an owned state struct and reports through notifications.
//! - Failed commands never leave the list half-updated.

pub mod confirm;
pub mod controller;
pub mod editor;
pub mod kind;
pub mod state;

pub use confirm::DeleteConfirmation;
pub use controller::{CommandOutcome, ListController, RowActions, RowView};
pub use editor::{EditorDialog, EditorMode};
pub use kind::{BadgeColor, Messages, Paging, RecordKind, RecordStatus, StatusBadge, Texts};
pub use state::{ListState, ViewState};
