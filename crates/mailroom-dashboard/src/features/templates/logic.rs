//! Pure template helpers.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::core::forms::{FieldErrors, fields, require_text};
use crate::features::templates::state::TemplateForm;

const TAG_PATTERN: &str = r"<[^>]*>";

static TAGS: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(TAG_PATTERN));

/// Failures while building a content preview.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The markup pattern failed to compile.
    #[error("failed to compile preview pattern")]
    RegexCompile {
        /// Pattern that failed.
        pattern: &'static str,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
}

/// Validate a template before saving.
///
/// # Errors
/// Returns field errors when the name or subject is blank.
pub fn validate_template(form: &TemplateForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require_text(&mut errors, fields::NAME, &form.name, "Name is required");
    require_text(&mut errors, fields::SUBJECT, &form.subject, "Subject is required");
    errors.into_result()
}

/// Plain-text preview of HTML content: tags removed, whitespace collapsed.
///
/// # Errors
/// Returns [`PreviewError::RegexCompile`] when the tag pattern cannot be built.
pub fn content_preview(html: &str) -> Result<String, PreviewError> {
    let tags = TAGS.as_ref().map_err(|source| PreviewError::RegexCompile {
        pattern: TAG_PATTERN,
        source: source.clone(),
    })?;
    Ok(tags
        .replace_all(html, " ")
        .replace("&nbsp;", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" "))
}
