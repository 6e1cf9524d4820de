//! Template management screen.
//!
//! # Design
//! - Fetch one window of templates and paginate it locally.
//! - Send is read-only: it never mutates the stored template.

pub mod kind;
pub mod logic;
pub mod state;

pub use kind::{TEMPLATE_MESSAGES, TemplateKind, TemplatesController};
pub use logic::{PreviewError, content_preview, validate_template};
pub use state::TemplateForm;
