use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

pub type Result<T> = std::result::Result<T, TwilioError>;

#[derive(Debug, Error)]
pub enum TwilioError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for TwilioError {
    fn from(err: reqwest::Error) -> Self {
        TwilioError::Network(err.to_string())
    }
}

const BASE_URL: &str = "https://api.twilio.com/2010-04-01";

/// Sends WhatsApp messages through the Twilio Messages API.
///
/// Numbers carry the `whatsapp:` prefix, e.g. `whatsapp:+14155238886`.
pub struct TwilioClient {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from: String,
    to: String,
}

impl TwilioClient {
    pub fn new(account_sid: &str, auth_token: &str, from: &str, to: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Send one outbound message. No retry and no delivery tracking; the
    /// returned SID is only logged.
    pub async fn send(&self, body: &str) -> Result<()> {
        let url = format!("{}/Accounts/{}/Messages.json", BASE_URL, self.account_sid);

        let mut form: HashMap<&str, &str> = HashMap::new();
        form.insert("From", &self.from);
        form.insert("To", &self.to);
        form.insert("Body", body);

        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(TwilioError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if let Ok(json) = resp.json::<serde_json::Value>().await {
            if let Some(sid) = json.get("sid").and_then(|s| s.as_str()) {
                debug!(sid, "WhatsApp message accepted");
            }
        }

        Ok(())
    }
}
