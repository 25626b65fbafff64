//! REST client capability consumed by the action nodes.
//!
//! Every action node talks to the repository through the [`RestClient`] trait,
//! so the resolution and dispatch logic can run against [`HttpRestClient`] in
//! production and against [`MockClient`] in tests.

mod http;
pub mod mock;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{IgcError, Result};

pub use http::HttpRestClient;
pub use mock::MockClient;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

/// Status, headers and body of a raw request, returned unchecked.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
}

impl RawResponse {
    pub fn new(
        status: u16,
        body: Value,
    ) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body,
        }
    }

    pub fn with_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Body if the status matches `expected`, otherwise a transport error
    /// carrying the status code and headers.
    pub fn expect_status(
        self,
        expected: u16,
    ) -> Result<Value> {
        if self.status == expected {
            return Ok(self.body);
        }
        Err(self.into_error())
    }

    /// Body for any 2xx status.
    pub fn expect_success(self) -> Result<Value> {
        if (200..300).contains(&self.status) {
            return Ok(self.body);
        }
        Err(self.into_error())
    }

    fn into_error(self) -> IgcError {
        let message = match &self.body {
            Value::Null => "empty response".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        IgcError::status(self.status, self.headers, message)
    }
}

/// Operations of the IGC REST API used by the action nodes.
///
/// Each call is a single attempt; retries and timeouts beyond the transport's
/// own are not part of this contract.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Run a search query (`POST /search`).
    async fn search(
        &self,
        query: &Value,
    ) -> Result<Value>;

    /// Fetch the full asset.
    async fn get_asset_by_id(
        &self,
        rid: &str,
    ) -> Result<Value>;

    /// Fetch selected properties of one asset of the given type.
    async fn get_asset_properties_by_id(
        &self,
        rid: &str,
        asset_type: &str,
        properties: &[String],
        page_size: u32,
        full_detail: bool,
    ) -> Result<Value>;

    async fn create(
        &self,
        asset_type: &str,
        details: &Value,
    ) -> Result<Value>;

    async fn update(
        &self,
        rid: &str,
        details: &Value,
    ) -> Result<Value>;

    async fn delete_asset_by_id(
        &self,
        rid: &str,
    ) -> Result<Value>;

    /// Issue a raw request against a host-rooted path. Non-success statuses
    /// are returned, not raised; only failures without a response are `Err`.
    async fn make_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse>;

    /// GET a host-rooted path and require `expected_status`.
    async fn get_other(
        &self,
        path: &str,
        expected_status: u16,
    ) -> Result<Value> {
        self.make_request(HttpMethod::GET, path, None).await?.expect_status(expected_status)
    }
}
