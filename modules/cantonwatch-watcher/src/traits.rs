// Trait seams for the cycle's three collaborators.
//
// ElementFetcher — rendered-page element lookup (Browserless in production).
// StateStore — the spreadsheet ledger holding launch time, last article
//   date, and the stat log.
// Messenger — one send per channel, fire-and-forget.
//
// These enable deterministic cycle tests with in-memory mocks: no network,
// no spreadsheet, no messaging sandbox.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use browserless_client::{BrowserlessClient, FetchError};
use cantonwatch_common::CycleState;
use gsheets_client::SheetsClient;
use telegram_client::TelegramClient;
use twilio_client::TwilioClient;

/// Spreadsheet cell (row, col) holding the launch timestamp (unix seconds).
const LAUNCH_CELL: (u32, u32) = (3, 2);
/// Spreadsheet cell holding the date of the last reported article. This is
/// also the first cell of the newest stat row.
const DATE_CELL: (u32, u32) = (6, 1);
/// Fresh updates insert their stat row here, pushing older rows down.
const STAT_ROW_INDEX: u32 = 6;

// ---------------------------------------------------------------------------
// ElementFetcher
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ElementFetcher: Send + Sync {
    /// Render `url` and return the text of the first element matching
    /// `selector`, waiting a bounded time for it to appear.
    async fn locate_text(&self, url: &str, selector: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl ElementFetcher for BrowserlessClient {
    async fn locate_text(&self, url: &str, selector: &str) -> Result<String, FetchError> {
        BrowserlessClient::locate_text(self, url, selector).await
    }
}

// ---------------------------------------------------------------------------
// StateStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait StateStore: Send + Sync {
    async fn read_state(&self) -> anyhow::Result<CycleState>;

    /// Record the program launch time. Called once at startup.
    async fn record_launch(&self, at: DateTime<Utc>) -> anyhow::Result<()>;

    /// Advance the stored article date without logging a stat row
    /// (degraded-stats path).
    async fn advance_date(&self, date: &str) -> anyhow::Result<()>;

    /// Insert a full stat row at the top of the log. The row's first cell is
    /// the article date, so this advances the stored date too.
    async fn insert_stat_row(&self, row: &[String]) -> anyhow::Result<()>;
}

/// Spreadsheet-backed state store.
pub struct SheetStateStore {
    sheet: SheetsClient,
}

impl SheetStateStore {
    pub fn new(sheet: SheetsClient) -> Self {
        Self { sheet }
    }
}

#[async_trait]
impl StateStore for SheetStateStore {
    async fn read_state(&self) -> anyhow::Result<CycleState> {
        let launch_raw = self
            .sheet
            .read_cell(LAUNCH_CELL.0, LAUNCH_CELL.1)
            .await?
            .ok_or_else(|| anyhow::anyhow!("launch time cell is empty"))?;
        let launch_secs: i64 = launch_raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("launch time cell is not a unix timestamp: {e}"))?;
        let launch_time = Utc
            .timestamp_opt(launch_secs, 0)
            .single()
            .ok_or_else(|| anyhow::anyhow!("launch time {launch_secs} out of range"))?;

        // Empty before the first ever update; string inequality against any
        // fetched date then reads as novelty, which is what we want.
        let last_update_date = self
            .sheet
            .read_cell(DATE_CELL.0, DATE_CELL.1)
            .await?
            .unwrap_or_default();

        Ok(CycleState {
            launch_time,
            last_update_date,
        })
    }

    async fn record_launch(&self, at: DateTime<Utc>) -> anyhow::Result<()> {
        self.sheet
            .update_cell(LAUNCH_CELL.0, LAUNCH_CELL.1, &at.timestamp().to_string())
            .await?;
        Ok(())
    }

    async fn advance_date(&self, date: &str) -> anyhow::Result<()> {
        self.sheet
            .update_cell(DATE_CELL.0, DATE_CELL.1, date)
            .await?;
        Ok(())
    }

    async fn insert_stat_row(&self, row: &[String]) -> anyhow::Result<()> {
        self.sheet.insert_row(STAT_ROW_INDEX, row).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Messenger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    WhatsApp,
    Telegram,
}

pub const CHANNELS: [Channel; 2] = [Channel::WhatsApp, Channel::Telegram];

#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, channel: Channel, body: &str) -> anyhow::Result<()>;
}

/// Production messenger: WhatsApp via Twilio, Telegram via the Bot API.
pub struct DualMessenger {
    whatsapp: TwilioClient,
    telegram: TelegramClient,
}

impl DualMessenger {
    pub fn new(whatsapp: TwilioClient, telegram: TelegramClient) -> Self {
        Self { whatsapp, telegram }
    }
}

#[async_trait]
impl Messenger for DualMessenger {
    async fn send(&self, channel: Channel, body: &str) -> anyhow::Result<()> {
        match channel {
            Channel::WhatsApp => self.whatsapp.send(body).await?,
            Channel::Telegram => self.telegram.send(body).await?,
        }
        Ok(())
    }
}
