#![forbid(unsafe_code)]
#![deny(unused_must_use, rustdoc::broken_intra_doc_links, rustdoc::bare_urls)]
#![warn(
    missing_docs,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]
//! Rendering-agnostic core of the Mailroom admin dashboard.
//!
//! Layout:
//! - `api.rs`: collaborator transport seam, typed client, and errors
//! - `config.rs`: dashboard tunables (footer links, page sizes)
//! - `core/`: session, forms, notifications, and the navigation shell
//! - `features/records`: generic list controller, editor, delete confirmation
//! - `features/recipients`, `features/templates`: per-record configurations
//! - `footer.rs`: unsubscribe footer augmentation
//! - `dashboard.rs`: session-gated aggregate handed to surfaces

pub mod api;
pub mod config;
pub mod core;
pub mod dashboard;
pub mod features;
pub mod footer;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use api::{ApiClient, ApiError, ApiResult, SpreadsheetUpload, Transport};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use features::records::{CommandOutcome, ListController, RecordStatus};
pub use features::recipients::{RecipientForm, RecipientKind, RecipientsController};
pub use features::templates::{TemplateForm, TemplateKind, TemplatesController};
