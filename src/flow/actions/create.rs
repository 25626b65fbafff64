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

/// Creates a new asset of the given type.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CreateAction {
    #[serde(default, alias = "assettype")]
    asset_type: Option<String>,
    /// asset body as a JSON object or a JSON string
    #[serde(default)]
    details: Option<Value>,
}

impl Action for CreateAction {
    fn create(params: Value) -> Result<Self> {
        jsonschema::validate(&Self::schema(), &params)?;
        let action = serde_json::from_value::<Self>(params)?;
        Ok(action)
    }

    fn schema() -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "asset_type": { "type": ["string", "null"] },
                "assettype": { "type": ["string", "null"] },
                "details": { "type": ["string", "object", "null"] }
            }
        })
    }

    fn action_type(&self) -> ActionType {
        ActionType::Create
    }

    fn resolve(
        &self,
        msg: &InboundMessage,
    ) -> Result<ResolvedCall> {
        let asset_type = resolve::required_string("type", msg.asset_type.as_deref(), self.asset_type.as_deref())?;
        let details = resolve::required_document("details", msg.details.as_ref(), self.details.as_ref())?;
        Ok(ResolvedCall::Create {
            asset_type,
            details,
        })
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::CreateAction;
    use crate::{
        IgcError,
        flow::{
            InboundMessage,
            actions::{Action, ResolvedCall},
        },
    };

    #[test]
    fn test_static_details_parsed() {
        let action = CreateAction::create(json!({
            "assettype": "term",
            "details": "{\"name\": \"Customer\", \"parent_category\": \"6662c0f2\"}"
        }))
        .unwrap();

        assert_eq!(
            action.resolve(&InboundMessage::new()).unwrap(),
            ResolvedCall::Create {
                asset_type: "term".to_string(),
                details: json!({"name": "Customer", "parent_category": "6662c0f2"}),
            }
        );
    }

    #[test]
    fn test_message_wins() {
        let action = CreateAction::create(json!({"asset_type": "term", "details": {"name": "static"}})).unwrap();
        let msg = InboundMessage::new().with_type("category").with_details(json!({"name": "msg"}));

        assert_eq!(
            action.resolve(&msg).unwrap(),
            ResolvedCall::Create {
                asset_type: "category".to_string(),
                details: json!({"name": "msg"}),
            }
        );
    }

    #[test]
    fn test_missing_details() {
        let action = CreateAction::create(json!({"asset_type": "term"})).unwrap();
        assert_eq!(
            action.resolve(&InboundMessage::new()).unwrap_err(),
            IgcError::MissingParameter("details".to_string())
        );
    }

    #[test]
    fn test_malformed_message_details() {
        let action = CreateAction::create(json!({"asset_type": "term", "details": {"name": "static"}})).unwrap();
        let msg = InboundMessage::new().with_details(json!("{\"name\": "));
        assert!(matches!(action.resolve(&msg), Err(IgcError::Parse(_))));
    }
}
