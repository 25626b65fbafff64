use std::{collections::BTreeMap, sync::Arc, time::Duration};

use igcflow::{
    ActionSpec, ActionType, ConfigNode, Connection, IgcError, InboundMessage, MockClient, RawResponse,
    client::{HttpMethod, mock::Call},
    invoke,
};
use serde_json::{Value, json};

fn server(client: &MockClient) -> ConfigNode {
    ConfigNode::with_client("igc", Connection::new("infosvr", "9446", "isadmin", "secret"), Arc::new(client.clone()))
}

fn spec(
    uses: ActionType,
    params: Value,
) -> ActionSpec {
    ActionSpec::create(uses, params).unwrap()
}

async fn first_call(
    uses: ActionType,
    params: Value,
    msg: Value,
) -> Call {
    let client = MockClient::returning(json!({}));
    invoke(&server(&client), &spec(uses, params), &InboundMessage::from_json(&msg)).await.unwrap();
    let calls = client.calls();
    assert_eq!(calls.len(), 1, "exactly one call per invocation");
    calls[0].clone()
}

#[tokio::test]
async fn test_message_value_wins_in_every_mode() {
    let cases = vec![
        (
            ActionType::Search,
            json!({"query": "{\"types\": [\"term\"]}"}),
            json!({"query": {"types": ["category"]}}),
            Call::Search(json!({"types": ["category"]})),
        ),
        (ActionType::GetById, json!({"rid": "static"}), json!({"rid": "dynamic"}), Call::GetAssetById("dynamic".to_string())),
        (
            ActionType::GetById,
            json!({"rid": "static", "ridtype": "term", "ridproperties": "name"}),
            json!({"rid": "dynamic", "type": "category", "properties": ["short_description"]}),
            Call::GetAssetPropertiesById {
                rid: "dynamic".to_string(),
                asset_type: "category".to_string(),
                properties: vec!["short_description".to_string()],
                page_size: 10,
                full_detail: true,
            },
        ),
        (
            ActionType::GetByUrl,
            json!({"url": "/ibm/iis/igc-rest/v1/types"}),
            json!({"url": "/ibm/iis/igc-rest/v1/assets/abc"}),
            Call::MakeRequest {
                method: HttpMethod::GET,
                path: "/ibm/iis/igc-rest/v1/assets/abc".to_string(),
                body: None,
            },
        ),
        (
            ActionType::Create,
            json!({"asset_type": "term", "details": {"name": "static"}}),
            json!({"type": "category", "details": {"name": "dynamic"}}),
            Call::Create {
                asset_type: "category".to_string(),
                details: json!({"name": "dynamic"}),
            },
        ),
        (
            ActionType::Update,
            json!({"rid": "static", "details": "{\"name\": \"static\"}"}),
            json!({"rid": "dynamic", "details": "{\"name\": \"dynamic\"}"}),
            Call::Update {
                rid: "dynamic".to_string(),
                details: json!({"name": "dynamic"}),
            },
        ),
        (ActionType::Delete, json!({"rid": "static"}), json!({"rid": "dynamic"}), Call::DeleteAssetById("dynamic".to_string())),
    ];

    for (uses, params, msg, expected) in cases {
        assert_eq!(first_call(uses, params, msg).await, expected, "mode {}", uses);
    }
}

#[tokio::test]
async fn test_static_value_used_when_message_is_silent() {
    assert_eq!(first_call(ActionType::Delete, json!({"rid": "static"}), json!({})).await, Call::DeleteAssetById("static".to_string()));
    // blank message values do not count as present
    assert_eq!(first_call(ActionType::Delete, json!({"rid": "static"}), json!({"rid": "  "})).await, Call::DeleteAssetById("static".to_string()));
    assert_eq!(
        first_call(ActionType::Search, json!({"query": {"types": ["term"]}}), json!({"query": ""})).await,
        Call::Search(json!({"types": ["term"]}))
    );
}

#[tokio::test]
async fn test_update_takes_legacy_update_field() {
    let call = first_call(ActionType::Update, json!({"rid": "r1"}), json!({"update": {"short_description": "x"}})).await;
    assert_eq!(
        call,
        Call::Update {
            rid: "r1".to_string(),
            details: json!({"short_description": "x"}),
        }
    );
}

#[tokio::test]
async fn test_get_by_id_property_lists() {
    // empty list means the full asset
    let call = first_call(ActionType::GetById, json!({"rid": "r1", "ridproperties": ""}), json!({})).await;
    assert_eq!(call, Call::GetAssetById("r1".to_string()));

    let call = first_call(ActionType::GetById, json!({"rid": "r1", "ridproperties": "name"}), json!({"properties": []})).await;
    assert_eq!(call, Call::GetAssetById("r1".to_string()));

    let call = first_call(ActionType::GetById, json!({"rid": "r1", "ridtype": "term", "ridproperties": " name , short_description ,"}), json!({})).await;
    assert_eq!(
        call,
        Call::GetAssetPropertiesById {
            rid: "r1".to_string(),
            asset_type: "term".to_string(),
            properties: vec!["name".to_string(), "short_description".to_string()],
            page_size: 10,
            full_detail: true,
        }
    );
}

#[tokio::test]
async fn test_failures_before_dispatch_issue_no_call() {
    let cases = vec![
        (ActionType::Search, json!({}), json!({}), "query"),
        (ActionType::GetById, json!({}), json!({}), "rid"),
        (ActionType::GetById, json!({"rid": "r1"}), json!({"properties": ["name"]}), "type"),
        (ActionType::GetByUrl, json!({}), json!({"url": ""}), "url"),
        (ActionType::Create, json!({"asset_type": "term"}), json!({}), "details"),
        (ActionType::Create, json!({}), json!({"details": {"name": "x"}}), "type"),
        (ActionType::Update, json!({"details": {"name": "x"}}), json!({}), "rid"),
        (ActionType::Delete, json!({}), json!({"rid": ""}), "rid"),
    ];

    for (uses, params, msg, field) in cases {
        let client = MockClient::returning(json!({}));
        let err = invoke(&server(&client), &spec(uses, params), &InboundMessage::from_json(&msg)).await.unwrap_err();
        assert_eq!(err, IgcError::MissingParameter(field.to_string()), "mode {}", uses);
        assert_eq!(client.call_count(), 0);
    }

    let client = MockClient::returning(json!({}));
    let err = invoke(&server(&client), &spec(ActionType::Search, json!({"query": "{\"types\": "})), &InboundMessage::new()).await.unwrap_err();
    assert!(matches!(err, IgcError::Parse(_)));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_url_normalization() {
    let cases = vec![
        ("https://infosvr:9446/ibm/iis/igc-rest/v1/assets/abc?pageSize=5", "/ibm/iis/igc-rest/v1/assets/abc?pageSize=5"),
        ("/ibm/iis/igc-rest/v1/types", "/ibm/iis/igc-rest/v1/types"),
        ("proxy/ibm/iis/igc-rest/v1/types", "/ibm/iis/igc-rest/v1/types"),
        ("v1/search", "/v1/search"),
    ];

    for (url, path) in cases {
        let call = first_call(ActionType::GetByUrl, json!({}), json!({"url": url})).await;
        assert_eq!(
            call,
            Call::MakeRequest {
                method: HttpMethod::GET,
                path: path.to_string(),
                body: None,
            },
            "url {}",
            url
        );
    }
}

#[tokio::test]
async fn test_transport_failure_carries_status_and_headers() {
    let client = MockClient::returning(json!(null));
    client.push_response(Ok(RawResponse::new(500, json!("Internal Server Error")).with_header("x-request-id", "42")));

    let err = invoke(&server(&client), &spec(ActionType::GetByUrl, json!({})), &InboundMessage::new().with_url("/ibm/iis/igc-rest/v1/types"))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    let mut headers = BTreeMap::new();
    headers.insert("x-request-id".to_string(), "42".to_string());
    assert_eq!(err.headers(), Some(&headers));
}

#[tokio::test]
async fn test_success_payload_is_client_result() {
    let result = json!({"_id": "r1", "_type": "term", "_name": "Customer", "nested": {"a": [1, 2, 3]}});
    let client = MockClient::returning(result.clone());

    let out = invoke(&server(&client), &spec(ActionType::GetById, json!({"rid": "r1"})), &InboundMessage::new()).await.unwrap();
    assert_eq!(out.payload, result);

    let value: Value = out.into();
    assert_eq!(value, json!({ "payload": result }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_outstanding_call_does_not_block_later_invocations() {
    let client = MockClient::returning(json!(null));
    client.push_result(Ok(json!("first"))).push_result(Ok(json!("second")));
    let gate = client.gate();
    client.pass();

    let node = server(&client);
    let get = spec(ActionType::GetById, json!({}));

    let first = {
        let (node, get) = (node.clone(), get.clone());
        tokio::spawn(async move { invoke(&node, &get, &InboundMessage::new().with_rid("a")).await })
    };
    while client.call_count() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let second = tokio::time::timeout(Duration::from_secs(2), invoke(&node, &get, &InboundMessage::new().with_rid("b"))).await.unwrap().unwrap();
    assert_eq!(second.payload, json!("second"));
    assert!(!first.is_finished());

    gate.send(()).unwrap();
    let first = tokio::time::timeout(Duration::from_secs(2), first).await.unwrap().unwrap().unwrap();
    assert_eq!(first.payload, json!("first"));
}
