use serde::{Deserialize, Serialize};

/// One action node of a flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeModel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// id of the configuration node holding the connection
    #[serde(default)]
    pub server: String,
    /// mode selector, e.g. "search" or "_id_"
    pub uses: String,
    /// static fields of the mode
    #[serde(default = "empty_object")]
    pub action: serde_json::Value,
}

fn empty_object() -> serde_json::Value {
    serde_json::json!({})
}
