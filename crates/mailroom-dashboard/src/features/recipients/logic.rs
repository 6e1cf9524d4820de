//! Pure recipient helpers.

use crate::api::SpreadsheetUpload;
use crate::core::forms::{FieldErrors, fields, require_email, require_text};
use crate::features::recipients::state::RecipientForm;

/// Extensions accepted by the import endpoint.
pub const SPREADSHEET_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Message raised for unsupported import files.
pub const UNSUPPORTED_FILE_MESSAGE: &str = "Only .xlsx or .xls files can be imported";

/// Validate a recipient before saving.
///
/// # Errors
/// Returns field errors when the name is blank or the email is missing or lacks `@`.
pub fn validate_recipient(form: &RecipientForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require_text(&mut errors, fields::NAME, &form.name, "Name is required");
    require_email(&mut errors, fields::EMAIL, &form.email);
    errors.into_result()
}

/// Whether `file_name` carries a spreadsheet extension.
#[must_use]
pub fn is_spreadsheet(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| {
            !stem.is_empty()
                && SPREADSHEET_EXTENSIONS
                    .iter()
                    .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Gate an upload before it reaches the collaborator.
///
/// # Errors
/// Returns a `file` field error for non-spreadsheet files.
pub fn validate_upload(upload: &SpreadsheetUpload) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if !is_spreadsheet(&upload.file_name) {
        errors.insert(fields::FILE, UNSUPPORTED_FILE_MESSAGE);
    }
    errors.into_result()
}
