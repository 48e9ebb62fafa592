use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::ProviderError;

/// Free Mobile SMS gateway endpoint.
pub const API_URL: &str = "https://smsapi.free-mobile.fr/sendmsg";

/// Message sent by the `test` command.
pub const TEST_MESSAGE: &str = "Hello, this is a test SMS from your hub";

// The gateway either answers fast or not at all.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Client for the Free Mobile personal SMS API: one GET per message,
/// outcome carried entirely by the response status code.
#[derive(Debug, Clone)]
pub struct FreeMobileClient {
    client: Client,
    base_url: String,
}

impl FreeMobileClient {
    pub fn new() -> Self {
        Self::with_base_url(API_URL)
    }

    /// Point the client at a different gateway URL, for tests or a
    /// self-hosted relay.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Send one SMS to the account owner. Resolves on HTTP 200; any other
    /// status maps to its documented meaning.
    pub async fn send_sms(
        &self,
        credentials: &Credentials,
        message: &str,
    ) -> Result<(), ProviderError> {
        debug!(url = %self.base_url, "sending SMS request");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("user", credentials.user_id.as_str()),
                ("pass", credentials.api_key.as_str()),
                ("msg", message),
            ])
            .send()
            .await?;

        let status = response.status().as_u16();
        debug!(status, "gateway response");

        match status_error(status) {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }
}

impl Default for FreeMobileClient {
    fn default() -> Self {
        Self::new()
    }
}

fn status_error(status: u16) -> Option<ProviderError> {
    match status {
        200 => None,
        400 => Some(ProviderError::MissingParameter),
        402 => Some(ProviderError::LimitReached),
        403 => Some(ProviderError::NotEnabled),
        500 => Some(ProviderError::Server),
        other => Some(ProviderError::Unknown(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn credentials() -> Credentials {
        Credentials::new("12345678", "apikey")
    }

    #[tokio::test]
    async fn sms_is_sent_with_query_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sendmsg")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("user".into(), "12345678".into()),
                Matcher::UrlEncoded("pass".into(), "apikey".into()),
                Matcher::UrlEncoded("msg".into(), "hello world".into()),
            ]))
            .with_status(200)
            .create_async()
            .await;

        let client = FreeMobileClient::with_base_url(format!("{}/sendmsg", server.url()));
        let result = client.send_sms(&credentials(), "hello world").await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn limit_reached_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sendmsg")
            .match_query(Matcher::Any)
            .with_status(402)
            .create_async()
            .await;

        let client = FreeMobileClient::with_base_url(format!("{}/sendmsg", server.url()));
        let err = client.send_sms(&credentials(), "hello").await.unwrap_err();

        assert_eq!(err.to_string(), "SMS limit reached");
    }

    #[tokio::test]
    async fn unknown_status_carries_the_code() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sendmsg")
            .match_query(Matcher::Any)
            .with_status(418)
            .create_async()
            .await;

        let client = FreeMobileClient::with_base_url(format!("{}/sendmsg", server.url()));
        let err = client.send_sms(&credentials(), "hello").await.unwrap_err();

        assert_eq!(err.to_string(), "Unknown error [418]");
    }

    #[test]
    fn status_mapping_matches_the_gateway_documentation() {
        assert!(status_error(200).is_none());
        assert_eq!(status_error(400).unwrap().to_string(), "Missing parameter");
        assert_eq!(status_error(403).unwrap().to_string(), "Service not enabled");
        assert_eq!(status_error(500).unwrap().to_string(), "Server error");
    }
}
