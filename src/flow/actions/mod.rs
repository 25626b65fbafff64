pub mod create;
pub mod delete;
pub mod get_by_id;
pub mod get_by_url;
pub mod search;
pub mod update;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Result, flow::InboundMessage};

pub use create::CreateAction;
pub use delete::DeleteAction;
pub use get_by_id::GetByIdAction;
pub use get_by_url::GetByUrlAction;
pub use search::SearchAction;
pub use update::UpdateAction;

/// Mode selector of an action node.
///
/// Also accepts the selector values of the original "IGC in" node
/// (`_query_`, `_id_`, `_url_`).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[serde(alias = "_query_")]
    #[strum(to_string = "search", serialize = "_query_")]
    Search,
    #[serde(alias = "_id_")]
    #[strum(to_string = "get_by_id", serialize = "_id_")]
    GetById,
    #[serde(alias = "_url_")]
    #[strum(to_string = "get_by_url", serialize = "_url_")]
    GetByUrl,
    #[strum(to_string = "create")]
    Create,
    #[strum(to_string = "update")]
    Update,
    #[strum(to_string = "delete")]
    Delete,
}

impl ActionType {
    /// Label of the log line written after a successful write operation.
    pub fn result_label(&self) -> Option<&'static str> {
        match self {
            ActionType::Create => Some("Create result"),
            ActionType::Update => Some("Update result"),
            ActionType::Delete => Some("Delete result"),
            _ => None,
        }
    }
}

pub trait Action: Send + Sync {
    /// Creates a new instance of the action from the node's static configuration.
    ///
    /// # Arguments
    ///
    /// * `params` - The [`serde_json::Value`] holding the static fields.
    ///
    /// # Returns
    ///
    /// Returns a [`Result`] containing the created action instance.
    fn create(params: Value) -> Result<Self>
    where
        Self: Sized;

    /// Returns the JSON schema the static configuration is validated against.
    fn schema() -> Value
    where
        Self: Sized;

    /// Returns the [`ActionType`] of the action.
    fn action_type(&self) -> ActionType;

    /// Merges the static configuration with the message into one call.
    ///
    /// Fails with `MissingParameter` or `Parse` before anything is sent.
    fn resolve(
        &self,
        msg: &InboundMessage,
    ) -> Result<ResolvedCall>;
}

/// Static configuration of one action node; exactly one mode per node.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionSpec {
    Search(SearchAction),
    GetById(GetByIdAction),
    GetByUrl(GetByUrlAction),
    Create(CreateAction),
    Update(UpdateAction),
    Delete(DeleteAction),
}

impl ActionSpec {
    pub fn create(
        uses: ActionType,
        params: Value,
    ) -> Result<Self> {
        Ok(match uses {
            ActionType::Search => ActionSpec::Search(SearchAction::create(params)?),
            ActionType::GetById => ActionSpec::GetById(GetByIdAction::create(params)?),
            ActionType::GetByUrl => ActionSpec::GetByUrl(GetByUrlAction::create(params)?),
            ActionType::Create => ActionSpec::Create(CreateAction::create(params)?),
            ActionType::Update => ActionSpec::Update(UpdateAction::create(params)?),
            ActionType::Delete => ActionSpec::Delete(DeleteAction::create(params)?),
        })
    }

    fn action(&self) -> &dyn Action {
        match self {
            ActionSpec::Search(a) => a,
            ActionSpec::GetById(a) => a,
            ActionSpec::GetByUrl(a) => a,
            ActionSpec::Create(a) => a,
            ActionSpec::Update(a) => a,
            ActionSpec::Delete(a) => a,
        }
    }

    pub fn action_type(&self) -> ActionType {
        self.action().action_type()
    }

    pub fn resolve(
        &self,
        msg: &InboundMessage,
    ) -> Result<ResolvedCall> {
        self.action().resolve(msg)
    }
}

/// Fully resolved arguments of exactly one REST client call.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedCall {
    Search {
        query: Value,
    },
    GetAssetById {
        rid: String,
    },
    GetAssetPropertiesById {
        rid: String,
        asset_type: String,
        properties: Vec<String>,
        page_size: u32,
        full_detail: bool,
    },
    GetByUrl {
        path: String,
    },
    Create {
        asset_type: String,
        details: Value,
    },
    Update {
        rid: String,
        details: Value,
    },
    Delete {
        rid: String,
    },
}

impl ResolvedCall {
    /// Name of the REST operation, as reported in logs and error reports.
    pub fn operation(&self) -> &'static str {
        match self {
            ResolvedCall::Search {
                ..
            } => "search",
            ResolvedCall::GetAssetById {
                ..
            } => "getAssetById",
            ResolvedCall::GetAssetPropertiesById {
                ..
            } => "getAssetPropertiesById",
            ResolvedCall::GetByUrl {
                ..
            } => "makeRequest",
            ResolvedCall::Create {
                ..
            } => "create",
            ResolvedCall::Update {
                ..
            } => "update",
            ResolvedCall::Delete {
                ..
            } => "deleteAssetById",
        }
    }

    /// Mode this call belongs to.
    pub fn action_type(&self) -> ActionType {
        match self {
            ResolvedCall::Search {
                ..
            } => ActionType::Search,
            ResolvedCall::GetAssetById {
                ..
            }
            | ResolvedCall::GetAssetPropertiesById {
                ..
            } => ActionType::GetById,
            ResolvedCall::GetByUrl {
                ..
            } => ActionType::GetByUrl,
            ResolvedCall::Create {
                ..
            } => ActionType::Create,
            ResolvedCall::Update {
                ..
            } => ActionType::Update,
            ResolvedCall::Delete {
                ..
            } => ActionType::Delete,
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use serde_json::json;

    use super::{ActionSpec, ActionType};
    use crate::{IgcError, flow::InboundMessage};

    #[test]
    fn test_action_type_selectors() {
        assert_eq!(ActionType::from_str("search").unwrap(), ActionType::Search);
        assert_eq!(ActionType::from_str("_query_").unwrap(), ActionType::Search);
        assert_eq!(ActionType::from_str("_id_").unwrap(), ActionType::GetById);
        assert_eq!(ActionType::from_str("_url_").unwrap(), ActionType::GetByUrl);
        assert_eq!(ActionType::from_str("delete").unwrap(), ActionType::Delete);
        assert!(ActionType::from_str("purge").is_err());

        assert_eq!(ActionType::GetById.to_string(), "get_by_id");
        assert_eq!(ActionType::GetByUrl.as_ref(), "get_by_url");
    }

    #[test]
    fn test_action_type_serde_alias() {
        let uses: ActionType = serde_json::from_value(json!("_url_")).unwrap();
        assert_eq!(uses, ActionType::GetByUrl);
        assert_eq!(serde_json::to_value(ActionType::GetById).unwrap(), json!("get_by_id"));
    }

    #[test]
    fn test_resolved_call_matches_configured_mode() {
        let msg = InboundMessage::from_json(&json!({
            "query": {"types": ["term"]},
            "rid": "rid1",
            "type": "term",
            "properties": ["name"],
            "url": "https://h:9446/ibm/iis/igc-rest/v1/types",
            "details": {"name": "n"},
        }));

        for uses in [
            ActionType::Search,
            ActionType::GetById,
            ActionType::GetByUrl,
            ActionType::Create,
            ActionType::Update,
            ActionType::Delete,
        ] {
            let spec = ActionSpec::create(uses, json!({})).unwrap();
            let call = spec.resolve(&msg).unwrap();
            assert_eq!(call.action_type(), uses);
            assert_eq!(spec.action_type(), uses);
        }
    }

    #[test]
    fn test_every_mode_fails_without_parameters() {
        for uses in [
            ActionType::Search,
            ActionType::GetById,
            ActionType::GetByUrl,
            ActionType::Create,
            ActionType::Update,
            ActionType::Delete,
        ] {
            let spec = ActionSpec::create(uses, json!({})).unwrap();
            let err = spec.resolve(&InboundMessage::new()).unwrap_err();
            assert!(matches!(err, IgcError::MissingParameter(_)), "{uses}: {err}");
        }
    }

    #[test]
    fn test_invalid_static_configuration() {
        assert!(ActionSpec::create(ActionType::GetById, json!({"rid": 12})).is_err());
        assert!(ActionSpec::create(ActionType::Search, json!("query")).is_err());
    }
}
