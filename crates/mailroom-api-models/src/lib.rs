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
//! Shared HTTP DTOs for the Mailroom collaborator API.
//!
//! Every endpoint answers with a loose `{status, data?, message?}` envelope.
//! The envelope is decoded here and immediately collapsed into
//! [`ApiOutcome`], so callers never inspect raw response shapes.
//! The request payloads mirror the collaborator's camelCase contract.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Message the collaborator returns when a create request hit an existing
/// address but still stored a new record.
pub const DUPLICATE_SAVED_MESSAGE: &str = "Email already exists, but new record saved";

/// Multipart field name used by the spreadsheet import endpoint.
pub const IMPORT_FIELD_NAME: &str = "uploadFile";

/// Server-assigned record identifier.
///
/// The collaborator emits identifiers as JSON numbers or strings depending on
/// the record store; both are normalised to their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    /// Whether `value` can address a record: ASCII letters, digits, `-`
    /// and `_` only, so it is always a single literal path segment.
    #[must_use]
    pub fn is_valid(value: &str) -> bool {
        !value.is_empty()
            && value
                .bytes()
                .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_'))
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for RecordId {
    type Err = InvalidRecordId;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if !Self::is_valid(trimmed) {
            return Err(InvalidRecordId(input.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Int(value) => Ok(Self(value.to_string())),
            Raw::Str(value) if Self::is_valid(&value) => Ok(Self(value)),
            Raw::Str(value) => Err(de::Error::custom(format!(
                "record id '{value}' is not a valid path segment"
            ))),
        }
    }
}

/// Identifier text that cannot address a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRecordId(pub String);

impl Display for InvalidRecordId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "invalid record id '{}'", self.0)
    }
}

impl std::error::Error for InvalidRecordId {}

/// Recipient lifecycle status, encoded on the wire as `0`, `1`, or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RecipientStatus {
    /// Soft-deleted recipient (`0`).
    Deleted,
    /// Recipient eligible for sends (`1`).
    #[default]
    Active,
    /// Recipient unsubscribed through the collaborator (`2`).
    Unsubscribed,
}

impl RecipientStatus {
    /// Every status in wire-code order.
    pub const ALL: [Self; 3] = [Self::Deleted, Self::Active, Self::Unsubscribed];

    /// Numeric wire code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Deleted => 0,
            Self::Active => 1,
            Self::Unsubscribed => 2,
        }
    }

    /// Lowercase name accepted by filters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::Active => "active",
            Self::Unsubscribed => "unsubscribed",
        }
    }
}

impl TryFrom<u8> for RecipientStatus {
    type Error = UnknownStatusCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Deleted),
            1 => Ok(Self::Active),
            2 => Ok(Self::Unsubscribed),
            other => Err(UnknownStatusCode(other.to_string())),
        }
    }
}

impl From<RecipientStatus> for u8 {
    fn from(value: RecipientStatus) -> Self {
        value.code()
    }
}

impl FromStr for RecipientStatus {
    type Err = UnknownStatusCode;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "0" | "deleted" => Ok(Self::Deleted),
            "1" | "active" => Ok(Self::Active),
            "2" | "unsubscribed" | "unsubscribe" => Ok(Self::Unsubscribed),
            _ => Err(UnknownStatusCode(input.to_string())),
        }
    }
}

/// Status code outside the defined set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatusCode(pub String);

impl Display for UnknownStatusCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "unknown status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatusCode {}

/// Template deletion flag, encoded on the wire as `0` / `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeletionFlag {
    /// Template is live (`0`).
    #[default]
    Active,
    /// Template is soft-deleted (`1`).
    Deleted,
}

impl DeletionFlag {
    /// Build a flag from a boolean "is deleted" value.
    #[must_use]
    pub const fn from_deleted(deleted: bool) -> Self {
        if deleted { Self::Deleted } else { Self::Active }
    }

    /// Whether the flag marks the template deleted.
    #[must_use]
    pub const fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl Serialize for DeletionFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(self.is_deleted()))
    }
}

impl<'de> Deserialize<'de> for DeletionFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Int(i64),
        }
        // Only an explicit `1`/`true` marks deletion; everything else renders live.
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            Some(Raw::Bool(true) | Raw::Int(1)) => Self::Deleted,
            _ => Self::Active,
        })
    }
}

/// Stored recipient record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Server-assigned identifier.
    pub id: RecordId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Lifecycle status.
    #[serde(default)]
    pub status: RecipientStatus,
    /// Stored HTML body; list responses may omit or truncate it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Stored HTML template record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Server-assigned identifier.
    pub id: RecordId,
    /// Template name.
    #[serde(default)]
    pub name: String,
    /// Subject line used when sending.
    #[serde(default)]
    pub subject: String,
    /// HTML content body.
    #[serde(default)]
    pub content: String,
    /// Soft-deletion flag.
    #[serde(rename = "isDeleted", default)]
    pub deletion: DeletionFlag,
}

/// Body for `POST /email/getAllEmail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientListRequest {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub items_per_page: u32,
    /// Optional status filter; omitted for the unfiltered set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecipientStatus>,
}

/// Body for `POST /template/getAllTemplate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateListRequest {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub items_per_page: u32,
}

/// Body for `POST /email/createEmail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientCreateRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Footer-augmented HTML body.
    pub content: String,
}

/// Body for `PUT /email/updateEmail/{id}`; absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecipientUpdateRequest {
    /// Replacement display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Replacement status (soft delete / restore).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecipientStatus>,
    /// Replacement HTML body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl RecipientUpdateRequest {
    /// Status-only update used for soft delete and restore.
    #[must_use]
    pub fn status_only(status: RecipientStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Body for `POST /template/createTemplate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateCreateRequest {
    /// Template name.
    pub name: String,
    /// Subject line.
    pub subject: String,
    /// HTML content body.
    pub content: String,
}

/// Body for `PUT /template/updateTemplate/{id}`.
///
/// The deletion flag is always sent; the collaborator treats every update
/// as also setting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateUpdateRequest {
    /// Deletion flag to store.
    #[serde(rename = "isDeleted")]
    pub deletion: DeletionFlag,
    /// Replacement name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Replacement content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl TemplateUpdateRequest {
    /// Flag-only update used for soft delete and restore.
    #[must_use]
    pub const fn flag_only(deletion: DeletionFlag) -> Self {
        Self {
            deletion,
            name: None,
            subject: None,
            content: None,
        }
    }
}

/// Body for `POST /email/sendBulkEmail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSendRequest {
    /// Subject line.
    pub subject: String,
    /// Footer-augmented HTML content.
    pub content: String,
}

/// Loose response envelope shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Success indicator; absence counts as failure.
    #[serde(default)]
    pub status: Option<Value>,
    /// Optional payload.
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    /// Optional human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Whether the envelope carries a truthy success indicator.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status.as_ref().is_some_and(is_truthy)
    }

    /// Collapse the envelope into a strict outcome.
    pub fn into_outcome(self) -> ApiOutcome<Option<T>> {
        if self.succeeded() {
            ApiOutcome::Ok(self.data)
        } else {
            ApiOutcome::Fail(self.message.filter(|message| !message.trim().is_empty()))
        }
    }
}

/// Strict result of an application-level call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum ApiOutcome<T> {
    /// The collaborator reported success.
    Ok(T),
    /// The collaborator reported failure, optionally with a message.
    Fail(Option<String>),
}

impl<T> ApiOutcome<T> {
    /// Map the success payload.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiOutcome<U> {
        match self {
            Self::Ok(value) => ApiOutcome::Ok(f(value)),
            Self::Fail(message) => ApiOutcome::Fail(message),
        }
    }

    /// Whether the outcome is a success.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Server-provided failure message, if any.
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Fail(message) => message.as_deref(),
        }
    }
}

impl<T> ApiOutcome<Option<T>> {
    /// Treat a successful response without payload as a failure.
    pub fn require(self) -> ApiOutcome<T> {
        match self {
            Self::Ok(Some(value)) => ApiOutcome::Ok(value),
            Self::Ok(None) => ApiOutcome::Fail(None),
            Self::Fail(message) => ApiOutcome::Fail(message),
        }
    }

    /// Substitute the default payload when a success response omits it.
    pub fn or_default(self) -> ApiOutcome<T>
    where
        T: Default,
    {
        self.map(Option::unwrap_or_default)
    }
}

/// Acknowledgement of a spreadsheet import.
///
/// The import contract is coarse: any truthy response body counts as
/// accepted and no per-row outcome is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportAck {
    /// Whether the collaborator acknowledged the upload.
    pub accepted: bool,
    /// Optional message carried in the body.
    pub message: Option<String>,
}

impl ImportAck {
    /// Interpret a raw response body.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            accepted: is_truthy(value),
            message: value
                .get("message")
                .and_then(Value::as_str)
                .filter(|message| !message.trim().is_empty())
                .map(str::to_string),
        }
    }
}

/// Truthiness of a JSON value, matching how the collaborator's clients read
/// loose flags.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// HTTP method used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`.
    Get,
    /// `POST`.
    Post,
    /// `PUT`.
    Put,
}

/// Endpoints consumed from the collaborator API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Paged, filterable recipient list.
    ListRecipients,
    /// Create a recipient.
    CreateRecipient,
    /// Update a recipient or set its status.
    UpdateRecipient,
    /// Fetch a single recipient.
    GetRecipient,
    /// Spreadsheet import.
    ImportRecipients,
    /// Send templated content to recipients.
    SendBulk,
    /// Template list.
    ListTemplates,
    /// Create a template.
    CreateTemplate,
    /// Update a template or set its deletion flag.
    UpdateTemplate,
    /// Fetch a single template.
    GetTemplate,
}

impl Endpoint {
    /// HTTP method for the endpoint.
    #[must_use]
    pub const fn method(self) -> Method {
        match self {
            Self::GetRecipient | Self::GetTemplate => Method::Get,
            Self::UpdateRecipient | Self::UpdateTemplate => Method::Put,
            Self::ListRecipients
            | Self::CreateRecipient
            | Self::ImportRecipients
            | Self::SendBulk
            | Self::ListTemplates
            | Self::CreateTemplate => Method::Post,
        }
    }

    /// Route template; `{id}` marks the record segment.
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::ListRecipients => "/email/getAllEmail",
            Self::CreateRecipient => "/email/createEmail",
            Self::UpdateRecipient => "/email/updateEmail/{id}",
            Self::GetRecipient => "/email/get/{id}",
            Self::ImportRecipients => "/email/uploadExcel",
            Self::SendBulk => "/email/sendBulkEmail",
            Self::ListTemplates => "/template/getAllTemplate",
            Self::CreateTemplate => "/template/createTemplate",
            Self::UpdateTemplate => "/template/updateTemplate/{id}",
            Self::GetTemplate => "/template/get/{id}",
        }
    }

    /// Concrete path, substituting the record id when the route needs one.
    #[must_use]
    pub fn path(self, id: Option<&RecordId>) -> String {
        let route = self.route();
        match id {
            Some(id) => route.replace("{id}", id.as_str()),
            None => route.to_string(),
        }
    }

    /// Stable operation label used in logs and errors.
    #[must_use]
    pub const fn operation(self) -> &'static str {
        match self {
            Self::ListRecipients => "recipients.list",
            Self::CreateRecipient => "recipients.create",
            Self::UpdateRecipient => "recipients.update",
            Self::GetRecipient => "recipients.get",
            Self::ImportRecipients => "recipients.import",
            Self::SendBulk => "templates.send",
            Self::ListTemplates => "templates.list",
            Self::CreateTemplate => "templates.create",
            Self::UpdateTemplate => "templates.update",
            Self::GetTemplate => "templates.get",
        }
    }
}
