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

/// Runs a repository search.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SearchAction {
    /// query as a JSON object or a JSON string
    #[serde(default)]
    query: Option<Value>,
}

impl Action for SearchAction {
    fn create(params: Value) -> Result<Self> {
        jsonschema::validate(&Self::schema(), &params)?;
        let action = serde_json::from_value::<Self>(params)?;
        Ok(action)
    }

    fn schema() -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": ["string", "object", "null"],
                    "description": "IGC search query, used when the message carries none"
                }
            }
        })
    }

    fn action_type(&self) -> ActionType {
        ActionType::Search
    }

    fn resolve(
        &self,
        msg: &InboundMessage,
    ) -> Result<ResolvedCall> {
        let query = resolve::required_document("query", msg.query.as_ref(), self.query.as_ref())?;
        Ok(ResolvedCall::Search {
            query,
        })
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::SearchAction;
    use crate::{
        IgcError,
        flow::{
            InboundMessage,
            actions::{Action, ResolvedCall},
        },
    };

    #[test]
    fn test_static_query_string_parsed() {
        let action = SearchAction::create(json!({"query": "{\"types\": [\"term\"], \"pageSize\": 5}"})).unwrap();
        let call = action.resolve(&InboundMessage::new()).unwrap();
        assert_eq!(
            call,
            ResolvedCall::Search {
                query: json!({"types": ["term"], "pageSize": 5})
            }
        );
    }

    #[test]
    fn test_message_query_wins() {
        let action = SearchAction::create(json!({"query": "{\"types\": [\"term\"]}"})).unwrap();
        let msg = InboundMessage::new().with_query(json!({"types": ["category"]}));
        let call = action.resolve(&msg).unwrap();
        assert_eq!(
            call,
            ResolvedCall::Search {
                query: json!({"types": ["category"]})
            }
        );
    }

    #[test]
    fn test_malformed_static_query() {
        let action = SearchAction::create(json!({"query": "{\"types\": "})).unwrap();
        assert!(matches!(action.resolve(&InboundMessage::new()), Err(IgcError::Parse(_))));
    }

    #[test]
    fn test_empty_static_query_is_missing() {
        let action = SearchAction::create(json!({"query": ""})).unwrap();
        assert_eq!(
            action.resolve(&InboundMessage::new()).unwrap_err(),
            IgcError::MissingParameter("query".to_string())
        );
    }
}
