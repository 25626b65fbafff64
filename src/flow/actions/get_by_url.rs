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

/// GETs a REST URL, typically one taken from a previous result's `_url`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GetByUrlAction {
    #[serde(default)]
    url: Option<String>,
}

impl Action for GetByUrlAction {
    fn create(params: Value) -> Result<Self> {
        jsonschema::validate(&Self::schema(), &params)?;
        let action = serde_json::from_value::<Self>(params)?;
        Ok(action)
    }

    fn schema() -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": ["string", "null"],
                    "description": "Absolute URL or path under /ibm/iis/igc-rest"
                }
            }
        })
    }

    fn action_type(&self) -> ActionType {
        ActionType::GetByUrl
    }

    fn resolve(
        &self,
        msg: &InboundMessage,
    ) -> Result<ResolvedCall> {
        let url = resolve::required_string("url", msg.url.as_deref(), self.url.as_deref())?;
        Ok(ResolvedCall::GetByUrl {
            path: resolve::normalize_url(&url)?,
        })
    }
}
