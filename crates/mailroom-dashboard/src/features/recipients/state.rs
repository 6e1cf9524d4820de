//! Recipient editor inputs.

/// Editable recipient fields, kept as raw strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipientForm {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// HTML body, without the footer.
    pub body: String,
}
