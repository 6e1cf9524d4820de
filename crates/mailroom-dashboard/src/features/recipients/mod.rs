//! Recipient ("email") management screen.
//!
//! # Design
//! - Server-side paging with a local status filter over the returned page.
//! - Every saved body gets the recipient footer appended, edit or create.
//! - Spreadsheet import is specific to this screen.

pub mod kind;
pub mod logic;
pub mod state;

pub use kind::{RECIPIENT_MESSAGES, RecipientKind, RecipientsController};
pub use logic::{is_spreadsheet, validate_recipient, validate_upload};
pub use state::RecipientForm;
