use std::sync::Arc;

use serde_json::{json, Value};

use crate::bus::CommandBus;
use crate::error::CommandError;
use crate::module::MODULE_NAME;

/// RPC adapter for the SMS module: two pass-through calls on top of the
/// bus primitive. No validation, no retries, no transformation.
#[derive(Clone)]
pub struct SmsService {
    bus: Arc<CommandBus>,
}

impl SmsService {
    pub fn new(bus: Arc<CommandBus>) -> Self {
        Self { bus }
    }

    pub async fn set_credentials(
        &self,
        user_id: &str,
        api_key: &str,
    ) -> Result<Value, CommandError> {
        self.bus
            .send_command(
                "set_credentials",
                MODULE_NAME,
                json!({ "userid": user_id, "apikey": api_key }),
            )
            .await
    }

    pub async fn test(&self) -> Result<Value, CommandError> {
        self.bus.send_command("test", MODULE_NAME, Value::Null).await
    }
}
