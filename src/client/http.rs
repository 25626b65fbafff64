use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, InvalidHeaderValue};
use serde_json::{Value, json};
use tracing::{debug, trace};

use crate::{
    IgcError, Result,
    client::{HttpMethod, RawResponse, RestClient},
    connection::{Connection, REST_API_PATH},
};

/// Property added to a properties request when full detail is asked for.
const CONTEXT_PROPERTY: &str = "_context";

/// reqwest-backed client for one IGC connection.
pub struct HttpRestClient {
    connection: Arc<Connection>,
    http: reqwest::Client,
}

impl HttpRestClient {
    pub fn new(connection: Arc<Connection>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(connection.invalid_certs_accepted())
            .timeout(connection.request_timeout())
            .build()?;

        Ok(Self {
            connection,
            http,
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            self.connection.authorization().parse().map_err(|err: InvalidHeaderValue| IgcError::Config(err.to_string()))?,
        );
        Ok(headers)
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse> {
        let url = format!("{}{}", self.connection.origin(), path);
        debug!(%method, %url, "igc request");

        let method: reqwest::Method = method.as_ref().parse().map_err(|_| IgcError::Convert(format!("invalid method '{}'", method)))?;
        let mut request = self.http.request(method, &url).headers(self.headers()?);
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let res = request.send().await?;
        let status = res.status().as_u16();
        let headers: BTreeMap<String, String> = res.headers().iter().map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string())).collect();
        let text = res.text().await?;
        trace!(status, len = text.len(), "igc response");

        Ok(RawResponse {
            status,
            headers,
            body: parse_body(&text),
        })
    }

    async fn call(
        &self,
        method: HttpMethod,
        api_path: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        let path = format!("{}{}", REST_API_PATH, api_path);
        self.send(method, &path, body).await?.expect_success()
    }
}

/// JSON when the body parses, the raw text otherwise, null when empty.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// `/assets/{rid}` with the rid encoded as a single path segment.
fn asset_path(rid: &str) -> Result<String> {
    let mut url = reqwest::Url::parse("https://localhost/assets").map_err(|e| IgcError::Convert(e.to_string()))?;
    url.path_segments_mut().map_err(|_| IgcError::Convert("asset url cannot take path segments".to_string()))?.push(rid);
    Ok(url.path().to_string())
}

/// Search query selecting one asset by id.
pub(crate) fn properties_query(
    rid: &str,
    asset_type: &str,
    properties: &[String],
    page_size: u32,
    full_detail: bool,
) -> Value {
    let mut properties = properties.to_vec();
    if full_detail && !properties.iter().any(|p| p == CONTEXT_PROPERTY) {
        properties.push(CONTEXT_PROPERTY.to_string());
    }

    json!({
        "properties": properties,
        "types": [asset_type],
        "where": {
            "conditions": [{
                "property": "_id",
                "operator": "=",
                "value": rid,
            }],
            "operator": "and",
        },
        "pageSize": page_size,
    })
}

#[async_trait]
impl RestClient for HttpRestClient {
    async fn search(
        &self,
        query: &Value,
    ) -> Result<Value> {
        self.call(HttpMethod::POST, "/search", Some(query)).await
    }

    async fn get_asset_by_id(
        &self,
        rid: &str,
    ) -> Result<Value> {
        self.call(HttpMethod::GET, &asset_path(rid)?, None).await
    }

    async fn get_asset_properties_by_id(
        &self,
        rid: &str,
        asset_type: &str,
        properties: &[String],
        page_size: u32,
        full_detail: bool,
    ) -> Result<Value> {
        let query = properties_query(rid, asset_type, properties, page_size, full_detail);
        let res = self.call(HttpMethod::POST, "/search", Some(&query)).await?;

        // the id condition matches at most one asset
        Ok(res.get("items").and_then(|items| items.get(0)).cloned().unwrap_or(Value::Null))
    }

    async fn create(
        &self,
        asset_type: &str,
        details: &Value,
    ) -> Result<Value> {
        let mut body = details.as_object().cloned().unwrap_or_default();
        body.insert("_type".to_string(), Value::String(asset_type.to_string()));
        self.call(HttpMethod::POST, "/assets", Some(&Value::Object(body))).await
    }

    async fn update(
        &self,
        rid: &str,
        details: &Value,
    ) -> Result<Value> {
        self.call(HttpMethod::PUT, &asset_path(rid)?, Some(details)).await
    }

    async fn delete_asset_by_id(
        &self,
        rid: &str,
    ) -> Result<Value> {
        self.call(HttpMethod::DELETE, &asset_path(rid)?, None).await
    }

    async fn make_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&Value>,
    ) -> Result<RawResponse> {
        self.send(method, path, body).await
    }
}
