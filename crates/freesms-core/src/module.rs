use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::credentials::Credentials;
use crate::error::{CommandError, ProviderError};
use crate::provider::{FreeMobileClient, TEST_MESSAGE};
use crate::store::ConfigStore;

/// Name the SMS module answers to on the command bus.
pub const MODULE_NAME: &str = "freemobilesms";

/// An alert raised somewhere on the hub, offered to modules for
/// rendering (here: as an outgoing SMS).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    pub subject: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl AlertEvent {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A pluggable backend unit addressed by name on the command bus.
///
/// Registered once at startup; the trait doubles as the seam for test
/// doubles.
#[async_trait]
pub trait Module: Send + Sync {
    fn name(&self) -> &str;

    /// Current persisted configuration, in wire shape.
    async fn config(&self) -> Value;

    async fn handle_command(&self, command: &str, params: Value) -> Result<Value, CommandError>;

    /// Offer an alert; return true when this module rendered it.
    async fn on_alert(&self, alert: &AlertEvent) -> bool {
        let _ = alert;
        false
    }
}

/// The Free Mobile SMS module: persists the account credentials and
/// turns `test` commands and alert events into gateway calls.
pub struct SmsModule {
    credentials: RwLock<Credentials>,
    store: ConfigStore,
    provider: FreeMobileClient,
}

impl SmsModule {
    /// Bring the module up from its stored configuration.
    pub fn load(store: ConfigStore, provider: FreeMobileClient) -> Self {
        let credentials = store.load();
        Self {
            credentials: RwLock::new(credentials),
            store,
            provider,
        }
    }

    async fn set_credentials(&self, params: Value) -> Result<Value, CommandError> {
        let credentials = Credentials::new(
            string_param(&params, "userid")?,
            string_param(&params, "apikey")?,
        );
        credentials.validate()?;

        self.store.save(&credentials).map_err(|err| {
            error!("unable to save module config: {err:#}");
            CommandError::Internal
        })?;
        *self.credentials.write().await = credentials;

        Ok(json!(true))
    }

    async fn test(&self) -> Result<Value, CommandError> {
        let credentials = self.credentials.read().await.clone();
        if !credentials.is_configured() {
            return Err(CommandError::Failed(
                "Please fill credentials first".to_string(),
            ));
        }

        self.send(&credentials, TEST_MESSAGE).await?;
        Ok(json!(true))
    }

    async fn send(&self, credentials: &Credentials, message: &str) -> Result<(), CommandError> {
        match self.provider.send_sms(credentials, message).await {
            Ok(()) => {
                info!("SMS sent successfully");
                Ok(())
            }
            Err(ProviderError::Transport(err)) => {
                error!("error sending SMS: {err}");
                Err(CommandError::Internal)
            }
            Err(err) => {
                error!("error sending SMS: {err}");
                Err(err.into())
            }
        }
    }
}

fn string_param(params: &Value, name: &str) -> Result<String, CommandError> {
    match params.get(name) {
        None | Some(Value::Null) => Err(CommandError::MissingParameter(name.to_string())),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(CommandError::InvalidParameter(format!(
            "Parameter \"{name}\" is invalid (specified=\"{other}\")"
        ))),
    }
}

#[async_trait]
impl Module for SmsModule {
    fn name(&self) -> &str {
        MODULE_NAME
    }

    async fn config(&self) -> Value {
        serde_json::to_value(&*self.credentials.read().await).unwrap_or(Value::Null)
    }

    async fn handle_command(&self, command: &str, params: Value) -> Result<Value, CommandError> {
        match command {
            "set_credentials" => self.set_credentials(params).await,
            "test" => self.test().await,
            other => Err(CommandError::UnknownCommand {
                module: MODULE_NAME.to_string(),
                command: other.to_string(),
            }),
        }
    }

    async fn on_alert(&self, alert: &AlertEvent) -> bool {
        let credentials = self.credentials.read().await.clone();
        if !credentials.is_configured() {
            warn!("unable to send SMS because credentials are not configured");
            return false;
        }

        match self.provider.send_sms(&credentials, &alert.message).await {
            Ok(()) => {
                info!("SMS sent successfully");
                true
            }
            Err(err) => {
                error!("unable to send SMS: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn module_at(dir: &std::path::Path, gateway_url: String) -> SmsModule {
        SmsModule::load(
            ConfigStore::at(dir.join("freemobilesms.conf")),
            FreeMobileClient::with_base_url(gateway_url),
        )
    }

    #[tokio::test]
    async fn set_credentials_persists_and_updates_config() {
        let dir = tempfile::tempdir().unwrap();
        let module = module_at(dir.path(), "http://unused.invalid".into());

        let result = module
            .handle_command(
                "set_credentials",
                json!({"userid": "12345678", "apikey": "apikey"}),
            )
            .await
            .unwrap();
        assert_eq!(result, json!(true));

        // visible immediately
        assert_eq!(module.config().await["userid"], "12345678");

        // and across a restart
        let reloaded = module_at(dir.path(), "http://unused.invalid".into());
        assert_eq!(reloaded.config().await["apikey"], "apikey");
    }

    #[tokio::test]
    async fn set_credentials_rejects_bad_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let module = module_at(dir.path(), "http://unused.invalid".into());

        let err = module
            .handle_command("set_credentials", json!({"apikey": "apikey"}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Parameter \"userid\" is missing");

        let err = module
            .handle_command(
                "set_credentials",
                json!({"userid": "userid", "apikey": "apikey"}),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Userid must be 8 characters long");

        let err = module
            .handle_command(
                "set_credentials",
                json!({"userid": "12345678", "apikey": ""}),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parameter \"apikey\" is invalid (specified=\"\")"
        );

        // nothing was persisted
        assert_eq!(module.config().await["userid"], "");
    }

    #[tokio::test]
    async fn test_requires_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let module = module_at(dir.path(), "http://unused.invalid".into());

        let err = module.handle_command("test", Value::Null).await.unwrap_err();

        assert_eq!(err.to_string(), "Please fill credentials first");
    }

    #[tokio::test]
    async fn test_sends_the_test_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sendmsg")
            .match_query(Matcher::UrlEncoded("msg".into(), TEST_MESSAGE.into()))
            .with_status(200)
            .create_async()
            .await;

        let module = module_at(dir.path(), format!("{}/sendmsg", server.url()));
        module
            .handle_command(
                "set_credentials",
                json!({"userid": "12345678", "apikey": "apikey"}),
            )
            .await
            .unwrap();

        let result = module.handle_command("test", Value::Null).await.unwrap();

        assert_eq!(result, json!(true));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_reports_gateway_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sendmsg")
            .match_query(Matcher::Any)
            .with_status(402)
            .create_async()
            .await;

        let module = module_at(dir.path(), format!("{}/sendmsg", server.url()));
        module
            .handle_command(
                "set_credentials",
                json!({"userid": "12345678", "apikey": "apikey"}),
            )
            .await
            .unwrap();

        let err = module.handle_command("test", Value::Null).await.unwrap_err();

        assert_eq!(err.to_string(), "SMS limit reached");
    }

    #[tokio::test]
    async fn unknown_commands_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let module = module_at(dir.path(), "http://unused.invalid".into());

        let err = module
            .handle_command("reboot", Value::Null)
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Unknown command \"reboot\" for module \"freemobilesms\""
        );
    }

    #[tokio::test]
    async fn alerts_are_not_rendered_without_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let module = module_at(dir.path(), "http://unused.invalid".into());

        let rendered = module.on_alert(&AlertEvent::new("alert", "intruder")).await;

        assert!(!rendered);
    }

    #[tokio::test]
    async fn alerts_are_rendered_with_the_event_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sendmsg")
            .match_query(Matcher::UrlEncoded("msg".into(), "intruder".into()))
            .with_status(200)
            .create_async()
            .await;

        let module = module_at(dir.path(), format!("{}/sendmsg", server.url()));
        module
            .handle_command(
                "set_credentials",
                json!({"userid": "12345678", "apikey": "apikey"}),
            )
            .await
            .unwrap();

        let rendered = module.on_alert(&AlertEvent::new("alert", "intruder")).await;

        assert!(rendered);
        mock.assert_async().await;
    }
}
