//! Collaborator API seam.
//!
//! # Design
//! - Surfaces implement [`Transport`] (raw JSON in, raw JSON out) so the
//!   dashboard stays free of any HTTP stack.
//! - [`ApiClient`] owns the typed contract and collapses every envelope into
//!   an [`ApiOutcome`] before controllers see it.
//! - Transport failures are `Err`; application failures are `Ok(Fail(..))`.

use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;
use mailroom_api_models::{
    ApiEnvelope, ApiOutcome, BulkSendRequest, Endpoint, ImportAck, Recipient,
    RecipientCreateRequest, RecipientListRequest, RecipientUpdateRequest, RecordId, Template,
    TemplateCreateRequest, TemplateListRequest, TemplateUpdateRequest,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Boxed error used to carry transport-specific failures.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result alias for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Transport-level failures. Application-level failures never use this type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be delivered or the response could not be read.
    #[error("request failed")]
    Transport {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying transport error.
        #[source]
        source: BoxError,
    },
    /// The collaborator answered with a non-success HTTP status.
    #[error("unexpected response status")]
    Status {
        /// Operation identifier.
        operation: &'static str,
        /// HTTP status code.
        status: u16,
    },
    /// The request payload could not be encoded.
    #[error("request body could not be encoded")]
    Encode {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
    /// The response body did not match the envelope contract.
    #[error("response body could not be decoded")]
    Decode {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Operation identifier attached to the failure.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Transport { operation, .. }
            | Self::Status { operation, .. }
            | Self::Encode { operation, .. }
            | Self::Decode { operation, .. } => operation,
        }
    }
}

/// Spreadsheet selected for bulk import.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpreadsheetUpload {
    /// Original file name, including extension.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Raw request/response channel to the collaborator API.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a JSON request and return the parsed response body.
    async fn send_json(
        &self,
        endpoint: Endpoint,
        id: Option<&RecordId>,
        body: Option<Value>,
    ) -> ApiResult<Value>;

    /// Upload a file as multipart form data and return the parsed response body.
    async fn send_multipart(&self, endpoint: Endpoint, upload: &SpreadsheetUpload)
    -> ApiResult<Value>;
}

/// Decode a raw body into the strict outcome for `endpoint`.
///
/// # Errors
/// Returns [`ApiError::Decode`] when the body is not a valid envelope.
pub fn decode_outcome<T: DeserializeOwned>(
    endpoint: Endpoint,
    body: Value,
) -> ApiResult<ApiOutcome<Option<T>>> {
    let envelope: ApiEnvelope<T> =
        serde_json::from_value(body).map_err(|source| ApiError::Decode {
            operation: endpoint.operation(),
            source,
        })?;
    Ok(envelope.into_outcome())
}

/// Typed client for the collaborator API.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("ApiClient").finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Wrap a transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        id: Option<&RecordId>,
        body: Option<Value>,
    ) -> ApiResult<ApiOutcome<Option<T>>> {
        tracing::debug!(
            operation = endpoint.operation(),
            path = %endpoint.path(id),
            "calling collaborator api"
        );
        let raw = self.transport.send_json(endpoint, id, body).await?;
        let outcome = decode_outcome::<T>(endpoint, raw)?;
        if let ApiOutcome::Fail(message) = &outcome {
            tracing::warn!(
                operation = endpoint.operation(),
                message = message.as_deref().unwrap_or("<none>"),
                "collaborator reported failure"
            );
        }
        Ok(outcome)
    }

    async fn call_unit(
        &self,
        endpoint: Endpoint,
        id: Option<&RecordId>,
        body: Option<Value>,
    ) -> ApiResult<ApiOutcome<()>> {
        Ok(self.call::<Value>(endpoint, id, body).await?.map(|_| ()))
    }

    /// Fetch a page of recipients.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport or decoding failures.
    pub async fn list_recipients(
        &self,
        request: &RecipientListRequest,
    ) -> ApiResult<ApiOutcome<Vec<Recipient>>> {
        let body = encode(Endpoint::ListRecipients, request)?;
        Ok(self
            .call::<Vec<Recipient>>(Endpoint::ListRecipients, None, Some(body))
            .await?
            .or_default())
    }

    /// Fetch a single recipient with its full content.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport or decoding failures.
    pub async fn get_recipient(&self, id: &RecordId) -> ApiResult<ApiOutcome<Recipient>> {
        Ok(self
            .call::<Recipient>(Endpoint::GetRecipient, Some(id), None)
            .await?
            .require())
    }

    /// Create a recipient.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport or decoding failures.
    pub async fn create_recipient(
        &self,
        request: &RecipientCreateRequest,
    ) -> ApiResult<ApiOutcome<()>> {
        let body = encode(Endpoint::CreateRecipient, request)?;
        self.call_unit(Endpoint::CreateRecipient, None, Some(body))
            .await
    }

    /// Update a recipient or change its status.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport or decoding failures.
    pub async fn update_recipient(
        &self,
        id: &RecordId,
        request: &RecipientUpdateRequest,
    ) -> ApiResult<ApiOutcome<()>> {
        let body = encode(Endpoint::UpdateRecipient, request)?;
        self.call_unit(Endpoint::UpdateRecipient, Some(id), Some(body))
            .await
    }

    /// Upload a recipient spreadsheet.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport failures.
    pub async fn import_recipients(&self, upload: &SpreadsheetUpload) -> ApiResult<ImportAck> {
        tracing::debug!(
            operation = Endpoint::ImportRecipients.operation(),
            file = %upload.file_name,
            bytes = upload.bytes.len(),
            "uploading spreadsheet"
        );
        let raw = self
            .transport
            .send_multipart(Endpoint::ImportRecipients, upload)
            .await?;
        Ok(ImportAck::from_value(&raw))
    }

    /// Send templated content to recipients.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport or decoding failures.
    pub async fn send_bulk(&self, request: &BulkSendRequest) -> ApiResult<ApiOutcome<()>> {
        let body = encode(Endpoint::SendBulk, request)?;
        self.call_unit(Endpoint::SendBulk, None, Some(body)).await
    }

    /// Fetch a window of templates.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport or decoding failures.
    pub async fn list_templates(
        &self,
        request: &TemplateListRequest,
    ) -> ApiResult<ApiOutcome<Vec<Template>>> {
        let body = encode(Endpoint::ListTemplates, request)?;
        Ok(self
            .call::<Vec<Template>>(Endpoint::ListTemplates, None, Some(body))
            .await?
            .or_default())
    }

    /// Fetch a single template.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport or decoding failures.
    pub async fn get_template(&self, id: &RecordId) -> ApiResult<ApiOutcome<Template>> {
        Ok(self
            .call::<Template>(Endpoint::GetTemplate, Some(id), None)
            .await?
            .require())
    }

    /// Create a template.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport or decoding failures.
    pub async fn create_template(
        &self,
        request: &TemplateCreateRequest,
    ) -> ApiResult<ApiOutcome<()>> {
        let body = encode(Endpoint::CreateTemplate, request)?;
        self.call_unit(Endpoint::CreateTemplate, None, Some(body))
            .await
    }

    /// Update a template or change its deletion flag.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on transport or decoding failures.
    pub async fn update_template(
        &self,
        id: &RecordId,
        request: &TemplateUpdateRequest,
    ) -> ApiResult<ApiOutcome<()>> {
        let body = encode(Endpoint::UpdateTemplate, request)?;
        self.call_unit(Endpoint::UpdateTemplate, Some(id), Some(body))
            .await
    }
}

fn encode<B: Serialize>(endpoint: Endpoint, body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|source| ApiError::Encode {
        operation: endpoint.operation(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn list_recipients_decodes_rows() {
        let transport = ScriptedTransport::new();
        transport.respond(
            Endpoint::ListRecipients,
            json!({"status": true, "data": [{"id": 1, "name": "A", "email": "a@x", "status": 1}]}),
        );
        let client = ApiClient::new(transport.clone());
        let request = RecipientListRequest {
            page: 1,
            items_per_page: 10,
            status: None,
        };
        let outcome = client.list_recipients(&request).await.expect("transport ok");
        let ApiOutcome::Ok(rows) = outcome else {
            panic!("expected success");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(
            transport.calls()[0].body,
            Some(json!({"page": 1, "itemsPerPage": 10}))
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let transport = ScriptedTransport::new();
        transport.respond(Endpoint::GetTemplate, json!({"status": true, "data": "oops"}));
        let client = ApiClient::new(transport);
        let err = client
            .get_template(&RecordId::from(3))
            .await
            .expect_err("decode should fail");
        assert!(matches!(err, ApiError::Decode { operation: "templates.get", .. }));
    }

    #[tokio::test]
    async fn transport_failure_propagates() {
        let transport = ScriptedTransport::new();
        transport.fail(Endpoint::SendBulk);
        let client = ApiClient::new(transport);
        let request = BulkSendRequest {
            subject: "s".into(),
            content: "c".into(),
        };
        let err = client.send_bulk(&request).await.expect_err("should fail");
        assert_eq!(err.operation(), "templates.send");
    }
}
