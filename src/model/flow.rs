use serde::{Deserialize, Serialize};

use crate::{
    IgcError, Result,
    config::ServerConfig,
    model::NodeModel,
};

/// A deployable flow: configuration nodes and the action nodes using them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlowModel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    /// configuration nodes declared by the flow itself
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
    pub nodes: Vec<NodeModel>,
}

impl FlowModel {
    pub fn from_json(s: &str) -> Result<Self> {
        let flow = serde_json::from_str::<FlowModel>(s);
        match flow {
            Ok(v) => Ok(v),
            Err(e) => Err(IgcError::Config(format!("{}", e))),
        }
    }
}

/// Serialized without server credentials.
impl Serialize for FlowModel {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let servers: Vec<&str> = self.servers.iter().map(|s| s.id.as_str()).collect();
        let mut state = serializer.serialize_struct("FlowModel", 5)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("desc", &self.desc)?;
        state.serialize_field("servers", &servers)?;
        state.serialize_field("nodes", &self.nodes)?;
        state.end()
    }
}
