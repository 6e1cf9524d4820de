//! Scripted in-memory transport for controller tests.
//!
//! Responses are queued per endpoint and consumed in order; an endpoint with
//! nothing queued answers `{"status": true}`. Every call is recorded so tests
//! can assert that validation failures never reach the seam.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use mailroom_api_models::{Endpoint, RecordId};
use serde_json::{Value, json};

use crate::api::{ApiError, ApiResult, SpreadsheetUpload, Transport};

/// One call observed by [`ScriptedTransport`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    /// Endpoint invoked.
    pub endpoint: Endpoint,
    /// Record id in the path, if any.
    pub id: Option<RecordId>,
    /// JSON body; uploads are recorded as `{"fileName", "size"}`.
    pub body: Option<Value>,
}

#[derive(Clone, Debug)]
enum Scripted {
    Respond(Value),
    Fail,
}

/// In-memory [`Transport`] driven by queued responses.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<Endpoint, VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedTransport {
    /// Empty script.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response body for `endpoint`.
    pub fn respond(&self, endpoint: Endpoint, body: Value) {
        guard(&self.scripts)
            .entry(endpoint)
            .or_default()
            .push_back(Scripted::Respond(body));
    }

    /// Queue a transport failure for `endpoint`.
    pub fn fail(&self, endpoint: Endpoint) {
        guard(&self.scripts)
            .entry(endpoint)
            .or_default()
            .push_back(Scripted::Fail);
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        guard(&self.calls).clone()
    }

    /// Calls made to `endpoint`.
    #[must_use]
    pub fn calls_to(&self, endpoint: Endpoint) -> Vec<RecordedCall> {
        guard(&self.calls)
            .iter()
            .filter(|call| call.endpoint == endpoint)
            .cloned()
            .collect()
    }

    fn answer(&self, call: RecordedCall) -> ApiResult<Value> {
        let endpoint = call.endpoint;
        guard(&self.calls).push(call);
        let next = guard(&self.scripts)
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Scripted::Respond(body)) => Ok(body),
            Some(Scripted::Fail) => Err(ApiError::Transport {
                operation: endpoint.operation(),
                source: "scripted transport failure".into(),
            }),
            None => Ok(json!({"status": true})),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send_json(
        &self,
        endpoint: Endpoint,
        id: Option<&RecordId>,
        body: Option<Value>,
    ) -> ApiResult<Value> {
        self.answer(RecordedCall {
            endpoint,
            id: id.cloned(),
            body,
        })
    }

    async fn send_multipart(
        &self,
        endpoint: Endpoint,
        upload: &SpreadsheetUpload,
    ) -> ApiResult<Value> {
        self.answer(RecordedCall {
            endpoint,
            id: None,
            body: Some(json!({"fileName": upload.file_name, "size": upload.bytes.len()})),
        })
    }
}
