//! Inbound and outbound messages of an action node.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The fields of an inbound message an action node reads.
///
/// Built leniently from an untyped JSON message: a field of the wrong type is
/// treated as absent, so resolution falls back to the node's static value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InboundMessage {
    /// Search query, as an object or a JSON string.
    pub query: Option<Value>,
    pub rid: Option<String>,
    /// The `type` field: asset type for properties lookups and creation.
    pub asset_type: Option<String>,
    pub properties: Option<Vec<String>>,
    pub url: Option<String>,
    /// Create/update body, as an object or a JSON string.
    pub details: Option<Value>,
    /// Alternative name for the update body.
    pub update: Option<Value>,
    /// Carried for completeness; resolution never reads it and the outbound
    /// message replaces it.
    pub payload: Option<Value>,
}

impl InboundMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(msg: &Value) -> Self {
        Self {
            query: document_field(msg, "query"),
            rid: string_field(msg, "rid"),
            asset_type: string_field(msg, "type"),
            properties: msg.get("properties").and_then(string_list),
            url: string_field(msg, "url"),
            details: document_field(msg, "details"),
            update: document_field(msg, "update"),
            payload: msg.get("payload").cloned(),
        }
    }

    pub fn with_query(
        mut self,
        query: Value,
    ) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_rid(
        mut self,
        rid: impl Into<String>,
    ) -> Self {
        self.rid = Some(rid.into());
        self
    }

    pub fn with_type(
        mut self,
        asset_type: impl Into<String>,
    ) -> Self {
        self.asset_type = Some(asset_type.into());
        self
    }

    pub fn with_properties<I, S>(
        mut self,
        properties: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = Some(properties.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_url(
        mut self,
        url: impl Into<String>,
    ) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_details(
        mut self,
        details: Value,
    ) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<Value> for InboundMessage {
    fn from(msg: Value) -> Self {
        Self::from_json(&msg)
    }
}

fn string_field(
    msg: &Value,
    key: &str,
) -> Option<String> {
    msg.get(key).and_then(Value::as_str).map(str::to_string)
}

fn document_field(
    msg: &Value,
    key: &str,
) -> Option<Value> {
    match msg.get(key) {
        Some(v @ Value::Object(_)) | Some(v @ Value::String(_)) => Some(v.clone()),
        _ => None,
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array()?.iter().map(|v| v.as_str().map(str::to_string)).collect()
}

/// What a node forwards downstream: the REST result, or null on failure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub payload: Value,
}

impl OutboundMessage {
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
        }
    }

    /// The message emitted for a failed invocation.
    pub fn null() -> Self {
        Self {
            payload: Value::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        self.payload.is_null()
    }
}

impl From<OutboundMessage> for Value {
    fn from(msg: OutboundMessage) -> Self {
        serde_json::json!({ "payload": msg.payload })
    }
}

#[cfg(test)]
mod test {
    use serde_json::{Value, json};

    use super::{InboundMessage, OutboundMessage};

    #[test]
    fn test_from_json_typed_fields() {
        let msg = InboundMessage::from_json(&json!({
            "query": {"types": ["term"]},
            "rid": "abc",
            "type": "term",
            "properties": ["name", "short_description"],
            "url": "/ibm/iis/igc-rest/v1/search",
            "details": "{\"name\": \"x\"}",
            "payload": 42,
        }));

        assert_eq!(msg.query, Some(json!({"types": ["term"]})));
        assert_eq!(msg.rid.as_deref(), Some("abc"));
        assert_eq!(msg.asset_type.as_deref(), Some("term"));
        assert_eq!(msg.properties, Some(vec!["name".to_string(), "short_description".to_string()]));
        assert_eq!(msg.details, Some(json!("{\"name\": \"x\"}")));
        assert_eq!(msg.payload, Some(json!(42)));
        assert_eq!(msg.update, None);
    }

    #[test]
    fn test_from_json_wrong_types_are_absent() {
        let msg = InboundMessage::from_json(&json!({
            "query": 12,
            "rid": 7,
            "type": ["term"],
            "properties": ["name", 3],
            "url": null,
            "details": [1, 2],
        }));

        assert_eq!(msg, InboundMessage::default());
    }

    #[test]
    fn test_from_json_non_object_message() {
        assert_eq!(InboundMessage::from_json(&json!("text")), InboundMessage::default());
    }

    #[test]
    fn test_outbound_shape() {
        let value: Value = OutboundMessage::new(json!({"items": []})).into();
        assert_eq!(value, json!({"payload": {"items": []}}));

        let value: Value = OutboundMessage::null().into();
        assert_eq!(value, json!({"payload": null}));
    }
}
