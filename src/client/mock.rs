//! `MockClient`: a test double for `RestClient`.
//!
//! Records every call it receives and answers from a script, so flows can be
//! exercised without an Information Server host.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::{
    Result,
    client::{HttpMethod, RawResponse, RestClient},
};

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Search(Value),
    GetAssetById(String),
    GetAssetPropertiesById {
        rid: String,
        asset_type: String,
        properties: Vec<String>,
        page_size: u32,
        full_detail: bool,
    },
    Create {
        asset_type: String,
        details: Value,
    },
    Update {
        rid: String,
        details: Value,
    },
    DeleteAssetById(String),
    MakeRequest {
        method: HttpMethod,
        path: String,
        body: Option<Value>,
    },
}

impl Call {
    pub fn operation(&self) -> &'static str {
        match self {
            Call::Search(_) => "search",
            Call::GetAssetById(_) => "getAssetById",
            Call::GetAssetPropertiesById {
                ..
            } => "getAssetPropertiesById",
            Call::Create {
                ..
            } => "create",
            Call::Update {
                ..
            } => "update",
            Call::DeleteAssetById(_) => "deleteAssetById",
            Call::MakeRequest {
                ..
            } => "makeRequest",
        }
    }
}

/// A scripted `RestClient`.
///
/// Typed calls pop from the result script, raw calls from the response
/// script; when a script is empty the default value is returned (with
/// status 200 for raw calls).
#[derive(Clone)]
pub struct MockClient {
    default: Value,
    results: Arc<Mutex<VecDeque<Result<Value>>>>,
    responses: Arc<Mutex<VecDeque<Result<RawResponse>>>>,
    gates: Arc<Mutex<VecDeque<Option<oneshot::Receiver<()>>>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockClient {
    /// Create a mock answering every call with `value`.
    pub fn returning(value: Value) -> Self {
        Self {
            default: value,
            results: Arc::new(Mutex::new(VecDeque::new())),
            responses: Arc::new(Mutex::new(VecDeque::new())),
            gates: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue the result of the next typed call.
    pub fn push_result(
        &self,
        result: Result<Value>,
    ) -> &Self {
        self.results.lock().unwrap().push_back(result);
        self
    }

    /// Queue the response of the next raw call.
    pub fn push_response(
        &self,
        response: Result<RawResponse>,
    ) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Hold the next call (in call order) until the returned sender fires or
    /// is dropped.
    pub fn gate(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(Some(rx));
        tx
    }

    /// Let the next call through without holding it.
    pub fn pass(&self) {
        self.gates.lock().unwrap().push_back(None);
    }

    /// Every call seen so far, in call order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn record(
        &self,
        call: Call,
    ) {
        self.calls.lock().unwrap().push(call);
        let gate = self.gates.lock().unwrap().pop_front().flatten();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }

    async fn typed(
        &self,
        call: Call,
    ) -> Result<Value> {
        let result = self.results.lock().unwrap().pop_front();
        self.record(call).await;
        result.unwrap_or_else(|| Ok(self.default.clone()))
    }
}

#[async_trait]
impl RestClient for MockClient {
    async fn search(
        &self,
        query: &Value,
    ) -> Result<Value> {
        self.typed(Call::Search(query.clone())).await
    }

    async fn get_asset_by_id(
        &self,
        rid: &str,
    ) -> Result<Value> {
        self.typed(Call::GetAssetById(rid.to_string())).await
    }

    async fn get_asset_properties_by_id(
        &self,
        rid: &str,
        asset_type: &str,
        properties: &[String],
        page_size: u32,
        full_detail: bool,
    ) -> Result<Value> {
        self.typed(Call::GetAssetPropertiesById {
            rid: rid.to_string(),
            asset_type: asset_type.to_string(),
            properties: properties.to_vec(),
            page_size,
            full_detail,
        })
        .await
    }

    async fn create(
        &self,
        asset_type: &str,
        details: &Value,
    ) -> Result<Value> {
        self.typed(Call::Create {
            asset_type: asset_type.to_string(),
            details: details.clone(),
        })
        .await
    }

    async fn update(
        &self,
        rid: &str,
        details: &Value,
    ) -> Result<Value> {
        self.typed(Call::Update {
            rid: rid.to_string(),
            details: details.clone(),
        })
        .await
    }

    async fn delete_asset_by_id(
        &self,
        rid: &str,
    ) -> Result<Value> {
        self.typed(Call::DeleteAssetById(rid.to_string())).await
    }

    async fn make_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse> {
        let response = self.responses.lock().unwrap().pop_front();
        self.record(Call::MakeRequest {
            method,
            path: path.to_string(),
            body: body.cloned(),
        })
        .await;
        response.unwrap_or_else(|| Ok(RawResponse::new(200, self.default.clone())))
    }
}
