use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    Result,
    flow::{
        InboundMessage,
        actions::{Action, ActionType, ResolvedCall},
        resolve,
    },
};

/// Page size of a properties lookup.
pub const PROPERTIES_PAGE_SIZE: u32 = 10;

/// Fetches one asset by its repository id, either whole or a set of its
/// properties.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GetByIdAction {
    #[serde(default)]
    rid: Option<String>,
    /// asset type, required when properties are requested
    #[serde(default, alias = "ridtype")]
    rid_type: Option<String>,
    /// comma-separated property names
    #[serde(default, alias = "ridproperties")]
    rid_properties: Option<String>,
}

impl Action for GetByIdAction {
    fn create(params: Value) -> Result<Self> {
        jsonschema::validate(&Self::schema(), &params)?;
        let action = serde_json::from_value::<Self>(params)?;
        Ok(action)
    }

    fn schema() -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "rid": { "type": ["string", "null"] },
                "rid_type": { "type": ["string", "null"] },
                "ridtype": { "type": ["string", "null"] },
                "rid_properties": {
                    "type": ["string", "null"],
                    "description": "Comma-separated property names; empty fetches the full asset"
                },
                "ridproperties": { "type": ["string", "null"] }
            }
        })
    }

    fn action_type(&self) -> ActionType {
        ActionType::GetById
    }

    fn resolve(
        &self,
        msg: &InboundMessage,
    ) -> Result<ResolvedCall> {
        let rid = resolve::required_string("rid", msg.rid.as_deref(), self.rid.as_deref())?;
        let properties = resolve::properties(msg.properties.as_deref(), self.rid_properties.as_deref());

        if properties.is_empty() {
            return Ok(ResolvedCall::GetAssetById {
                rid,
            });
        }

        let asset_type = resolve::required_string("type", msg.asset_type.as_deref(), self.rid_type.as_deref())?;
        Ok(ResolvedCall::GetAssetPropertiesById {
            rid,
            asset_type,
            properties,
            page_size: PROPERTIES_PAGE_SIZE,
            full_detail: true,
        })
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::GetByIdAction;
    use crate::{
        IgcError,
        flow::{
            InboundMessage,
            actions::{Action, ResolvedCall},
        },
    };

    #[test]
    fn test_no_properties_fetches_full_asset() {
        let action = GetByIdAction::create(json!({"rid": "rid1", "rid_properties": ""})).unwrap();
        assert_eq!(
            action.resolve(&InboundMessage::new()).unwrap(),
            ResolvedCall::GetAssetById {
                rid: "rid1".to_string()
            }
        );
    }

    #[test]
    fn test_properties_from_static_list() {
        let action = GetByIdAction::create(json!({
            "ridtype": "term",
            "ridproperties": "name, short_description"
        }))
        .unwrap();
        let msg = InboundMessage::new().with_rid("rid2");

        assert_eq!(
            action.resolve(&msg).unwrap(),
            ResolvedCall::GetAssetPropertiesById {
                rid: "rid2".to_string(),
                asset_type: "term".to_string(),
                properties: vec!["name".to_string(), "short_description".to_string()],
                page_size: 10,
                full_detail: true,
            }
        );
    }

    #[test]
    fn test_message_values_win() {
        let action = GetByIdAction::create(json!({
            "rid": "static-rid",
            "rid_type": "term",
            "rid_properties": "name"
        }))
        .unwrap();
        let msg = InboundMessage::new().with_rid("msg-rid").with_type("category").with_properties(["parent_category"]);

        match action.resolve(&msg).unwrap() {
            ResolvedCall::GetAssetPropertiesById {
                rid,
                asset_type,
                properties,
                ..
            } => {
                assert_eq!(rid, "msg-rid");
                assert_eq!(asset_type, "category");
                assert_eq!(properties, vec!["parent_category"]);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_single_empty_property_fetches_full_asset() {
        let action = GetByIdAction::create(json!({"rid_properties": "name"})).unwrap();
        let msg = InboundMessage::new().with_rid("rid1").with_properties([""]);
        assert_eq!(
            action.resolve(&msg).unwrap(),
            ResolvedCall::GetAssetById {
                rid: "rid1".to_string()
            }
        );
    }

    #[test]
    fn test_properties_require_type() {
        let action = GetByIdAction::create(json!({"rid": "rid1", "rid_properties": "name"})).unwrap();
        assert_eq!(
            action.resolve(&InboundMessage::new()).unwrap_err(),
            IgcError::MissingParameter("type".to_string())
        );
    }
}
