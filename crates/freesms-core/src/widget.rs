use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::bus::ConfigCache;
use crate::credentials::Credentials;
use crate::error::CommandError;
use crate::module::MODULE_NAME;
use crate::service::SmsService;

/// Sink for user-visible success notifications.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
}

pub const SAVED_MESSAGE: &str =
    "Configuration saved. Use the test button to validate your credentials.";
pub const TESTED_MESSAGE: &str = "SMS sent. Check your phone.";

/// The credentials form component: a transient, locally editable copy of
/// the module configuration plus the load/save/test operations.
///
/// The fields are never authoritative. A successful save re-fetches the
/// stored configuration and shows whatever came back.
pub struct CredentialsWidget {
    pub user_id: String,
    pub api_key: String,
    cache: Arc<ConfigCache>,
    service: SmsService,
}

impl CredentialsWidget {
    pub fn new(cache: Arc<ConfigCache>, service: SmsService) -> Self {
        Self {
            user_id: String::new(),
            api_key: String::new(),
            cache,
            service,
        }
    }

    /// Fetch the current module configuration and show it. A failed
    /// fetch leaves the fields untouched.
    pub async fn load(&mut self) {
        match self.cache.module_config(MODULE_NAME).await {
            Ok(config) => self.apply(&config),
            Err(err) => warn!("unable to load module config: {err}"),
        }
    }

    /// Persist the edited credentials, reload the module configuration,
    /// show the reloaded values, then notify. Errors bubble up to the
    /// caller's generic failure handling.
    pub async fn save(&mut self, notifier: &dyn Notifier) -> Result<(), CommandError> {
        self.service
            .set_credentials(&self.user_id, &self.api_key)
            .await?;
        let config = self.cache.reload_module_config(MODULE_NAME).await?;
        self.apply(&config);
        notifier.success(SAVED_MESSAGE);
        Ok(())
    }

    /// Ask the module to send a test SMS.
    pub async fn test(&self, notifier: &dyn Notifier) -> Result<(), CommandError> {
        self.service.test().await?;
        notifier.success(TESTED_MESSAGE);
        Ok(())
    }

    fn apply(&mut self, config: &Value) {
        if let Ok(credentials) = serde_json::from_value::<Credentials>(config.clone()) {
            self.user_id = credentials.user_id;
            self.api_key = credentials.api_key;
        }
    }
}
