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

/// Updates properties of an existing asset.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UpdateAction {
    #[serde(default)]
    rid: Option<String>,
    /// changed properties as a JSON object or a JSON string
    #[serde(default)]
    details: Option<Value>,
}

impl Action for UpdateAction {
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
                "details": { "type": ["string", "object", "null"] }
            }
        })
    }

    fn action_type(&self) -> ActionType {
        ActionType::Update
    }

    fn resolve(
        &self,
        msg: &InboundMessage,
    ) -> Result<ResolvedCall> {
        let rid = resolve::required_string("rid", msg.rid.as_deref(), self.rid.as_deref())?;

        // `details` first, then `update`, on the message side
        let details = match resolve::document("details", msg.details.as_ref(), None)? {
            Some(details) => details,
            None => resolve::required_document("details", msg.update.as_ref(), self.details.as_ref())?,
        };

        Ok(ResolvedCall::Update {
            rid,
            details,
        })
    }
}
