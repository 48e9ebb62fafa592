use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// Length the gateway requires for the account identifier.
pub const USER_ID_LEN: usize = 8;

/// The Free Mobile account credentials, serialized with the wire field
/// names used in command payloads and the module config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "userid", default)]
    pub user_id: String,
    #[serde(rename = "apikey", default)]
    pub api_key: String,
}

impl Credentials {
    pub fn new(user_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Both fields filled in. An unconfigured module cannot send anything.
    pub fn is_configured(&self) -> bool {
        !self.user_id.is_empty() && !self.api_key.is_empty()
    }

    /// Module-side validation for `set_credentials`. The widget and the
    /// RPC adapter never validate; only the module does.
    pub fn validate(&self) -> Result<(), CommandError> {
        if self.user_id.is_empty() {
            return Err(CommandError::InvalidParameter(
                "Parameter \"userid\" is invalid (specified=\"\")".to_string(),
            ));
        }
        if self.user_id.len() != USER_ID_LEN {
            return Err(CommandError::InvalidParameter(
                "Userid must be 8 characters long".to_string(),
            ));
        }
        if self.api_key.is_empty() {
            return Err(CommandError::InvalidParameter(
                "Parameter \"apikey\" is invalid (specified=\"\")".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_credentials_pass() {
        assert!(Credentials::new("12345678", "apikey").validate().is_ok());
    }

    #[test]
    fn short_user_id_is_rejected() {
        let err = Credentials::new("userid", "apikey").validate().unwrap_err();
        assert_eq!(err.to_string(), "Userid must be 8 characters long");
    }

    #[test]
    fn empty_fields_are_rejected() {
        let err = Credentials::new("", "apikey").validate().unwrap_err();
        assert_eq!(err.to_string(), "Parameter \"userid\" is invalid (specified=\"\")");

        let err = Credentials::new("12345678", "").validate().unwrap_err();
        assert_eq!(err.to_string(), "Parameter \"apikey\" is invalid (specified=\"\")");
    }

    #[test]
    fn wire_field_names() {
        let json = serde_json::to_value(Credentials::new("12345678", "k1")).unwrap();
        assert_eq!(json["userid"], "12345678");
        assert_eq!(json["apikey"], "k1");
    }

    #[test]
    fn default_is_unconfigured() {
        assert!(!Credentials::default().is_configured());
    }
}
