use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use browserless_client::BrowserlessClient;
use cantonwatch_common::{Config, Credentials};
use cantonwatch_watcher::cycle::{broadcast, run_cycle};
use cantonwatch_watcher::keywords::KEYWORDS;
use cantonwatch_watcher::report;
use cantonwatch_watcher::sources::SourceTable;
use cantonwatch_watcher::traits::{DualMessenger, SheetStateStore, StateStore};
use gsheets_client::{ServiceAccountKey, SheetsClient};
use telegram_client::TelegramClient;
use twilio_client::TwilioClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cantonwatch=info".parse()?))
        .init();

    info!("Canton watch starting...");

    let config = Config::from_env();
    let credentials = Credentials::from_file(&config.credentials_file)?;

    let messenger = DualMessenger::new(
        TwilioClient::new(
            &credentials.twilio_account_sid,
            &credentials.twilio_auth_token,
            &credentials.whatsapp_from,
            &credentials.whatsapp_to,
        ),
        TelegramClient::new(&credentials.telegram_bot_token, &credentials.telegram_chat_id),
    );

    // Startup boundary: a spreadsheet initialization failure is warned over
    // both channels, then still aborts the process.
    let store = match init_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            broadcast(
                &messenger,
                &report::spreadsheet_unavailable(&config.spreadsheet_id, &format!("{e:#}")),
            )
            .await;
            return Err(e);
        }
    };
    info!(spreadsheet = config.spreadsheet_id.as_str(), "Spreadsheet ready, launch time recorded");

    let fetcher = BrowserlessClient::new(
        &config.browserless_url,
        config.browserless_token.as_deref(),
    );
    let sources = SourceTable::default();

    // Cycles run strictly sequentially: the next tick is not serviced until
    // the previous cycle finishes.
    let mut interval = tokio::time::interval(Duration::from_secs(config.cycle_interval_secs));
    // The first tick of an interval completes immediately; consume it so the
    // first cycle runs a full period after startup.
    interval.tick().await;
    info!(interval_secs = config.cycle_interval_secs, "Entering watch loop");
    loop {
        interval.tick().await;
        match run_cycle(
            &store,
            &fetcher,
            &messenger,
            &sources,
            KEYWORDS,
            &config.recipient_name,
            Utc::now(),
        )
        .await
        {
            Ok(outcome) => info!(report = ?outcome.report, "Cycle complete"),
            Err(e) => error!(error = %format!("{e:#}"), "Cycle aborted"),
        }
    }
}

async fn init_store(config: &Config) -> Result<SheetStateStore> {
    let key = ServiceAccountKey::from_file(&config.service_account_key_file)?;
    let store = SheetStateStore::new(SheetsClient::new(key, &config.spreadsheet_id)?);
    // Writing the launch time doubles as the access check.
    store.record_launch(Utc::now()).await?;
    Ok(store)
}
