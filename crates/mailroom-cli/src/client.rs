//! Shared client utilities: CLI errors, HTTP wiring, and the reqwest transport.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use mailroom_api_models::{Endpoint, IMPORT_FIELD_NAME, Method, RecordId};
use mailroom_dashboard::api::{ApiError, ApiResult, SpreadsheetUpload, Transport};
use mailroom_dashboard::core::shell::ShellError;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;
use url::Url;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ShellError> for CliError {
    fn from(error: ShellError) -> Self {
        match error {
            ShellError::NotLoggedIn { path } => Self::validation(format!(
                "{path} requires a session; run `mailroom login` first"
            )),
        }
    }
}

/// Build the shared HTTP client with the request id and timeout applied.
pub(crate) fn build_http_client(timeout_secs: u64, trace_id: &str) -> CliResult<Client> {
    let mut default_headers = HeaderMap::new();
    let request_id = HeaderValue::from_str(trace_id)
        .map_err(|_| CliError::failure(anyhow!("trace identifier contains invalid characters")))?;
    default_headers.insert(HEADER_REQUEST_ID, request_id);

    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .default_headers(default_headers)
        .build()
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

/// [`Transport`] over HTTP using `reqwest`.
#[derive(Clone, Debug)]
pub(crate) struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub(crate) const fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Append the endpoint route to the base path one encoded segment at a time.
    fn endpoint_url(&self, endpoint: Endpoint, id: Option<&RecordId>) -> ApiResult<Url> {
        let invalid = |reason: &'static str| ApiError::Transport {
            operation: endpoint.operation(),
            source: reason.into(),
        };
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| invalid("API base URL cannot carry a path"))?;
            segments.pop_if_empty();
            for segment in endpoint.route().split('/').filter(|part| !part.is_empty()) {
                if segment == "{id}" {
                    let id = id.ok_or_else(|| invalid("route requires a record id"))?;
                    segments.push(id.as_str());
                } else {
                    segments.push(segment);
                }
            }
        }
        Ok(url)
    }
}

fn transport_error(endpoint: Endpoint) -> impl FnOnce(reqwest::Error) -> ApiError {
    move |err| ApiError::Transport {
        operation: endpoint.operation(),
        source: Box::new(err),
    }
}

async fn read_body(endpoint: Endpoint, response: Response) -> ApiResult<Value> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(operation = endpoint.operation(), status = status.as_u16(), "unexpected response status");
        return Err(ApiError::Status {
            operation: endpoint.operation(),
            status: status.as_u16(),
        });
    }
    let bytes = response.bytes().await.map_err(transport_error(endpoint))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
        operation: endpoint.operation(),
        source,
    })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_json(
        &self,
        endpoint: Endpoint,
        id: Option<&RecordId>,
        body: Option<Value>,
    ) -> ApiResult<Value> {
        let url = self.endpoint_url(endpoint, id)?;
        let method = match endpoint.method() {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };
        let mut request = self.client.request(method, url);
        if let Some(body) = &body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(transport_error(endpoint))?;
        read_body(endpoint, response).await
    }

    async fn send_multipart(
        &self,
        endpoint: Endpoint,
        upload: &SpreadsheetUpload,
    ) -> ApiResult<Value> {
        let url = self.endpoint_url(endpoint, None)?;
        let part = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
        let form = Form::new().part(IMPORT_FIELD_NAME, part);
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error(endpoint))?;
        read_body(endpoint, response).await
    }
}
