use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::{Config, Engine, Result, connection::ConfigNode};

pub struct EngineBuilder {
    async_worker_thread_number: u16,
    config: Option<Config>,
    rt: Option<Arc<Runtime>>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            async_worker_thread_number: 16,
            config: None,
            rt: None,
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn async_worker_thread_number(
        mut self,
        n: u16,
    ) -> Self {
        self.async_worker_thread_number = n;
        self
    }

    /// Take the worker count and configuration nodes from `config`.
    pub fn config(
        mut self,
        config: Config,
    ) -> Self {
        self.async_worker_thread_number = config.async_worker_thread_number;
        self.config = Some(config);
        self
    }

    pub fn runtime(
        mut self,
        runtime: Arc<Runtime>,
    ) -> Self {
        self.rt = Some(runtime);
        self
    }

    pub fn build(&self) -> Result<Engine> {
        let runtime = match &self.rt {
            Some(rt) => rt.clone(),
            None => Arc::new(Builder::new_multi_thread().worker_threads(self.async_worker_thread_number.into()).enable_all().build()?),
        };
        let engine = Engine::new(runtime);

        if let Some(config) = &self.config {
            for server in &config.servers {
                engine.register_server(ConfigNode::new(server)?);
            }
        }

        Ok(engine)
    }
}
