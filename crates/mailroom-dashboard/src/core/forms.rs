//! Field-level validation shared by every form.
//!
//! # Design
//! - Keep form inputs as plain strings; validation never mutates them.
//! - Collect every failing field instead of stopping at the first one.

use std::fmt::{self, Display, Formatter};

/// Field identifiers used as error keys.
pub mod fields {
    /// Display name field.
    pub const NAME: &str = "name";
    /// Email address field.
    pub const EMAIL: &str = "email";
    /// Template subject field.
    pub const SUBJECT: &str = "subject";
    /// Password field.
    pub const PASSWORD: &str = "password";
    /// Retyped password field.
    pub const CONFIRM_PASSWORD: &str = "confirmPassword";
    /// Upload file field.
    pub const FILE: &str = "file";
}

/// Message shown when an email lacks an `@`.
pub const EMAIL_MISSING_AT: &str = "Email must contain \"@\"";

/// Ordered set of field-scoped validation messages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(&'static str, String)>,
}

impl FieldErrors {
    /// Empty error set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| *name == field) {
            entry.1 = message;
        } else {
            self.entries.push((field, message));
        }
    }

    /// Message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    /// Whether no field failed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(field, message)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries
            .iter()
            .map(|(name, message)| (*name, message.as_str()))
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    /// Returns the collected errors when any field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Display for FieldErrors {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        for (index, (field, message)) in self.iter().enumerate() {
            if index > 0 {
                formatter.write_str("; ")?;
            }
            write!(formatter, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Require a non-blank value.
pub fn require_text(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field, message);
    }
}

/// Require a non-blank value containing `@`.
pub fn require_email(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.insert(field, "Email is required");
    } else if !value.contains('@') {
        errors.insert(field, EMAIL_MISSING_AT);
    }
}

/// Login form inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email entered by the operator.
    pub email: String,
    /// Password entered by the operator.
    pub password: String,
}

impl LoginForm {
    /// Validate the login form.
    ///
    /// # Errors
    /// Returns field errors for a missing/malformed email or a missing password.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_email(&mut errors, fields::EMAIL, &self.email);
        if self.password.is_empty() {
            errors.insert(fields::PASSWORD, "Password is required");
        }
        errors.into_result()
    }
}

/// Signup form inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupForm {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Retyped password.
    pub confirm_password: String,
}

impl SignupForm {
    /// Validate the signup form.
    ///
    /// # Errors
    /// Returns field errors for every missing or mismatched field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, fields::NAME, &self.name, "Name is required");
        require_email(&mut errors, fields::EMAIL, &self.email);
        if self.password.is_empty() {
            errors.insert(fields::PASSWORD, "Password is required");
        }
        if self.confirm_password.is_empty() {
            errors.insert(fields::CONFIRM_PASSWORD, "Please retype your password");
        } else if self.password != self.confirm_password {
            errors.insert(fields::CONFIRM_PASSWORD, "Passwords do not match");
        }
        errors.into_result()
    }
}
