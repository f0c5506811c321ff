use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the positional-line credentials file (Twilio + Telegram).
    pub credentials_file: String,
    /// Path to the Google service account key JSON.
    pub service_account_key_file: String,
    /// Spreadsheet holding the cycle state and the stat log.
    pub spreadsheet_id: String,

    // Rendering service
    pub browserless_url: String,
    pub browserless_token: Option<String>,

    /// Seconds between cycles. 40 by default; production deployments run
    /// with CYCLE_INTERVAL_SECS=43200 (12 hours).
    pub cycle_interval_secs: u64,

    /// Name used in the report greeting.
    pub recipient_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            credentials_file: env::var("CREDENTIALS_FILE")
                .unwrap_or_else(|_| "credentials.txt".to_string()),
            service_account_key_file: env::var("SERVICE_ACCOUNT_KEY_FILE")
                .unwrap_or_else(|_| "client_secret.json".to_string()),
            spreadsheet_id: required_env("SPREADSHEET_ID"),
            browserless_url: required_env("BROWSERLESS_URL"),
            browserless_token: env::var("BROWSERLESS_TOKEN").ok(),
            cycle_interval_secs: env::var("CYCLE_INTERVAL_SECS")
                .unwrap_or_else(|_| "40".to_string())
                .parse()
                .expect("CYCLE_INTERVAL_SECS must be a number"),
            recipient_name: env::var("RECIPIENT_NAME").unwrap_or_else(|_| "there".to_string()),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
