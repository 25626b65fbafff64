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

/// Deletes an asset by its repository id.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DeleteAction {
    #[serde(default)]
    rid: Option<String>,
}

impl Action for DeleteAction {
    fn create(params: Value) -> Result<Self> {
        jsonschema::validate(&Self::schema(), &params)?;
        let action = serde_json::from_value::<Self>(params)?;
        Ok(action)
    }

    fn schema() -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "rid": { "type": ["string", "null"] }
            }
        })
    }

    fn action_type(&self) -> ActionType {
        ActionType::Delete
    }

    fn resolve(
        &self,
        msg: &InboundMessage,
    ) -> Result<ResolvedCall> {
        let rid = resolve::required_string("rid", msg.rid.as_deref(), self.rid.as_deref())?;
        Ok(ResolvedCall::Delete {
            rid,
        })
    }
}
