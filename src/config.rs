use std::{fs, path::Path};

use serde::Deserialize;

use crate::{IgcError, Result};

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT: u64 = 30_000;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// number of async worker threads, range [1, 32768), defaults to 16
    #[serde(default = "default_worker_threads")]
    pub async_worker_thread_number: u16,
    /// IGC configuration nodes shared by every flow deployed on the engine
    #[serde(default)]
    pub servers: Vec<ServerConfig>,
}

/// Connection settings of one IGC configuration node.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// configuration node id, referenced by action nodes
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub host: String,
    /// kept as a string, the way the node editor stores it
    #[serde(deserialize_with = "port_from_any")]
    pub port: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, alias = "pass")]
    pub password: String,
    /// surface client failures through the error report instead of returning them
    #[serde(default = "default_true")]
    pub disable_error_throw: bool,
    /// accept self-signed certificates, common on Information Server installs
    #[serde(default)]
    pub accept_invalid_certs: bool,
    /// request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("disable_error_throw", &self.disable_error_throw)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn default_worker_threads() -> u16 {
    16
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT
}

fn port_from_any<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Str(String),
        Num(u64),
    }

    Ok(match Port::deserialize(deserializer)? {
        Port::Str(s) => s,
        Port::Num(n) => n.to_string(),
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            async_worker_thread_number: default_worker_threads(),
            servers: Vec::new(),
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref()).map_err(|e| IgcError::Config(format!("failed to load config file {:?}: {}", path.as_ref(), e)))?;

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.async_worker_thread_number == 0 || self.async_worker_thread_number >= 32768 {
            return Err(IgcError::Config(format!(
                "async_worker_thread_number must be in [1, 32768), got {}",
                self.async_worker_thread_number
            )));
        }
        for server in &self.servers {
            if server.host.trim().is_empty() {
                return Err(IgcError::Config(format!("server '{}' has an empty host", server.id)));
            }
        }
        Ok(())
    }
}
