use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::CommandError;
use crate::module::{AlertEvent, Module};

/// In-process command bus: the "send named command to named module"
/// primitive the RPC adapter forwards to. Modules register once at
/// startup; there is no runtime patching.
pub struct CommandBus {
    modules: HashMap<String, Arc<dyn Module>>,
}

impl CommandBus {
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    pub fn register(&mut self, module: Arc<dyn Module>) {
        self.modules.insert(module.name().to_string(), module);
    }

    fn module(&self, name: &str) -> Result<&Arc<dyn Module>, CommandError> {
        self.modules
            .get(name)
            .ok_or_else(|| CommandError::UnknownModule(name.to_string()))
    }

    pub async fn send_command(
        &self,
        command: &str,
        to: &str,
        params: Value,
    ) -> Result<Value, CommandError> {
        self.module(to)?.handle_command(command, params).await
    }

    /// Read a module's current configuration.
    pub async fn module_config(&self, name: &str) -> Result<Value, CommandError> {
        Ok(self.module(name)?.config().await)
    }

    /// Offer an alert to every registered module; returns how many
    /// rendered it.
    pub async fn publish_alert(&self, alert: &AlertEvent) -> usize {
        let mut rendered = 0;
        for module in self.modules.values() {
            if module.on_alert(alert).await {
                rendered += 1;
            }
        }
        rendered
    }
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

/// The host cache: per-module configuration, fetched once and served
/// from memory until a reload is requested.
pub struct ConfigCache {
    bus: Arc<CommandBus>,
    configs: RwLock<HashMap<String, Value>>,
}

impl ConfigCache {
    pub fn new(bus: Arc<CommandBus>) -> Self {
        Self {
            bus,
            configs: RwLock::new(HashMap::new()),
        }
    }

    /// Cached read of a module's configuration.
    pub async fn module_config(&self, name: &str) -> Result<Value, CommandError> {
        if let Some(config) = self.configs.read().await.get(name) {
            return Ok(config.clone());
        }
        self.reload_module_config(name).await
    }

    /// Re-fetch a module's configuration, refresh the cache, and return
    /// the fresh value.
    pub async fn reload_module_config(&self, name: &str) -> Result<Value, CommandError> {
        let config = self.bus.module_config(name).await?;
        self.configs
            .write()
            .await
            .insert(name.to_string(), config.clone());
        Ok(config)
    }
}
