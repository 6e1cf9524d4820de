//! Template editor inputs.

/// Editable template fields, kept as raw strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateForm {
    /// Template name.
    pub name: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub content: String,
}
