//! Connection descriptor and the configuration node that owns it.

use std::{fmt, sync::Arc, time::Duration};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::info;

use crate::{
    Result,
    client::{HttpRestClient, RestClient},
    config::{DEFAULT_TIMEOUT, ServerConfig},
};

/// Fixed root of the IGC REST API on the Information Server host.
pub const REST_ROOT: &str = "/ibm/iis/igc-rest";
/// Versioned API path every typed call is issued under.
pub const REST_API_PATH: &str = "/ibm/iis/igc-rest/v1";

/// Host, port and credentials of one IGC repository.
///
/// Built once per configuration node and shared read-only (behind an `Arc`)
/// with the REST client and every action node referencing it.
#[derive(Clone, PartialEq, Eq)]
pub struct Connection {
    host: String,
    port: String,
    username: String,
    password: String,
    disable_error_throw: bool,
    accept_invalid_certs: bool,
    timeout: Duration,
}

impl Connection {
    pub fn new(
        host: impl Into<String>,
        port: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            username: username.into(),
            password: password.into(),
            disable_error_throw: true,
            accept_invalid_certs: false,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT),
        }
    }

    /// Return failures from `ActionNode::handle` as `Err` in addition to the
    /// error report and the null-payload message.
    pub fn throwing_errors(mut self) -> Self {
        self.disable_error_throw = false;
        self
    }

    pub fn accept_invalid_certs(
        mut self,
        accept: bool,
    ) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn disable_error_throw(&self) -> bool {
        self.disable_error_throw
    }

    pub fn invalid_certs_accepted(&self) -> bool {
        self.accept_invalid_certs
    }

    pub fn request_timeout(&self) -> Duration {
        self.timeout
    }

    /// `https://host:port`, without a trailing slash.
    pub fn origin(&self) -> String {
        if self.port.is_empty() {
            format!("https://{}", self.host)
        } else {
            format!("https://{}:{}", self.host, self.port)
        }
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
    }
}

impl fmt::Debug for Connection {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Connection")
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

impl From<&ServerConfig> for Connection {
    fn from(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            disable_error_throw: config.disable_error_throw,
            accept_invalid_certs: config.accept_invalid_certs,
            timeout: Duration::from_millis(config.timeout),
        }
    }
}

/// The configuration node: a named connection plus the client bound to it.
#[derive(Clone)]
pub struct ConfigNode {
    id: String,
    name: String,
    connection: Arc<Connection>,
    client: Arc<dyn RestClient>,
}

impl ConfigNode {
    /// Build the node and an HTTP client bound to its connection.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let connection = Arc::new(Connection::from(config));
        let client = Arc::new(HttpRestClient::new(connection.clone())?);
        info!(id = %config.id, host = %connection.host(), port = %connection.port(), "igc configuration node created");

        Ok(Self {
            id: config.id.clone(),
            name: config.name.clone(),
            connection,
            client,
        })
    }

    /// Build the node around an existing client, e.g. a test double.
    pub fn with_client(
        id: impl Into<String>,
        connection: Connection,
        client: Arc<dyn RestClient>,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            connection: Arc::new(connection),
            client,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn connection(&self) -> Arc<Connection> {
        self.connection.clone()
    }

    pub fn client(&self) -> Arc<dyn RestClient> {
        self.client.clone()
    }
}
