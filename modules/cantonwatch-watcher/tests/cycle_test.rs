//! Cycle tests with in-memory collaborators: no network, no spreadsheet,
//! no messaging sandbox.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use browserless_client::FetchError;
use cantonwatch_common::{CycleState, VALUE_NOT_AVAILABLE};
use cantonwatch_watcher::cycle::{run_cycle, CycleOutcome, ReportKind};
use cantonwatch_watcher::keywords::KEYWORDS;
use cantonwatch_watcher::sources::SourceTable;
use cantonwatch_watcher::traits::{Channel, ElementFetcher, Messenger, StateStore};

// ---------------------------------------------------------------------------
// Mocks
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum Lookup {
    Text(&'static str),
    Network,
}

struct MockFetcher {
    by_selector: HashMap<String, Lookup>,
}

impl MockFetcher {
    fn new(entries: &[(&str, Lookup)]) -> Self {
        Self {
            by_selector: entries
                .iter()
                .map(|(s, l)| (s.to_string(), l.clone()))
                .collect(),
        }
    }
}

#[async_trait]
impl ElementFetcher for MockFetcher {
    async fn locate_text(&self, _url: &str, selector: &str) -> Result<String, FetchError> {
        match self.by_selector.get(selector) {
            Some(Lookup::Text(t)) => Ok(t.to_string()),
            Some(Lookup::Network) => Err(FetchError::Network("connection reset".to_string())),
            None => Err(FetchError::ElementNotFound {
                selector: selector.to_string(),
            }),
        }
    }
}

struct MockStore {
    state: Mutex<CycleState>,
    rows: Mutex<Vec<Vec<String>>>,
    date_writes: Mutex<Vec<String>>,
    fail_writes: bool,
}

impl MockStore {
    fn new(launch_time: DateTime<Utc>, last_update_date: &str) -> Self {
        Self {
            state: Mutex::new(CycleState {
                launch_time,
                last_update_date: last_update_date.to_string(),
            }),
            rows: Mutex::new(Vec::new()),
            date_writes: Mutex::new(Vec::new()),
            fail_writes: false,
        }
    }

    /// Store whose state writes fail, as when the sheets API is down.
    fn failing_writes(launch_time: DateTime<Utc>, last_update_date: &str) -> Self {
        Self {
            fail_writes: true,
            ..Self::new(launch_time, last_update_date)
        }
    }

    fn stored_date(&self) -> String {
        self.state.lock().unwrap().last_update_date.clone()
    }
}

#[async_trait]
impl StateStore for MockStore {
    async fn read_state(&self) -> anyhow::Result<CycleState> {
        Ok(self.state.lock().unwrap().clone())
    }

    async fn record_launch(&self, at: DateTime<Utc>) -> anyhow::Result<()> {
        self.state.lock().unwrap().launch_time = at;
        Ok(())
    }

    async fn advance_date(&self, date: &str) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("sheets API 503");
        }
        self.date_writes.lock().unwrap().push(date.to_string());
        self.state.lock().unwrap().last_update_date = date.to_string();
        Ok(())
    }

    async fn insert_stat_row(&self, row: &[String]) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("sheets API 503");
        }
        self.state.lock().unwrap().last_update_date = row[0].clone();
        self.rows.lock().unwrap().push(row.to_vec());
        Ok(())
    }
}

#[derive(Default)]
struct MockMessenger {
    sent: Mutex<Vec<(Channel, String)>>,
}

impl MockMessenger {
    fn sent(&self) -> Vec<(Channel, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send(&self, channel: Channel, body: &str) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push((channel, body.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const STORED_DATE: &str = "12 March 2021";
const FRESH_DATE: &str = "15 March 2021";
const FRESH_TITLE: &str = "Nouvelles règles sanitaires";

fn sources() -> SourceTable {
    SourceTable::default()
}

/// Fetcher where both pages are fully healthy.
fn healthy_fetcher(s: &SourceTable) -> MockFetcher {
    MockFetcher::new(&[
        (s.article_date.as_str(), Lookup::Text(FRESH_DATE)),
        (s.article_title.as_str(), Lookup::Text(FRESH_TITLE)),
        (s.new_cases.as_str(), Lookup::Text("+ 1,012 nouveaux cas")),
        (s.total_cases.as_str(), Lookup::Text("570,645")),
        (s.total_recovered.as_str(), Lookup::Text("317,600")),
        (s.total_deaths.as_str(), Lookup::Text("9,684")),
    ])
}

async fn run(
    store: &MockStore,
    fetcher: &MockFetcher,
    messenger: &MockMessenger,
    s: &SourceTable,
    now: DateTime<Utc>,
) -> CycleOutcome {
    run_cycle(store, fetcher, messenger, s, KEYWORDS, "Anthony", now)
        .await
        .expect("cycle should not abort")
}

// ---------------------------------------------------------------------------
// Report paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fresh_update_reports_and_advances_state() {
    let s = sources();
    let now = Utc::now();
    let store = MockStore::new(now - Duration::hours(1), STORED_DATE);
    let fetcher = healthy_fetcher(&s);
    let messenger = MockMessenger::default();

    let outcome = run(&store, &fetcher, &messenger, &s, now).await;

    assert_eq!(outcome.report, ReportKind::FreshUpdate);
    assert_eq!(outcome.state.last_update_date, FRESH_DATE);
    assert_eq!(store.stored_date(), FRESH_DATE);

    // One stat row: [date, new cases, total cases, total recovered, total deaths]
    let rows = store.rows.lock().unwrap().clone();
    assert_eq!(
        rows,
        vec![vec![
            FRESH_DATE.to_string(),
            "1012".to_string(),
            "570645".to_string(),
            "317600".to_string(),
            "9684".to_string(),
        ]]
    );

    // Same report on both channels, carrying all five facts.
    let sent = messenger.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].1, sent[1].1);
    for needle in [FRESH_DATE, FRESH_TITLE, "1012", "570645", "317600", "9684"] {
        assert!(sent[0].1.contains(needle), "missing {needle}");
    }
}

#[tokio::test]
async fn degraded_stats_still_advances_date() {
    let s = sources();
    let now = Utc::now();
    let store = MockStore::new(now - Duration::hours(1), STORED_DATE);
    // New-case count works, but the totals are gone.
    let fetcher = MockFetcher::new(&[
        (s.article_date.as_str(), Lookup::Text(FRESH_DATE)),
        (s.article_title.as_str(), Lookup::Text(FRESH_TITLE)),
        (s.new_cases.as_str(), Lookup::Text("1,012")),
    ]);
    let messenger = MockMessenger::default();

    let outcome = run(&store, &fetcher, &messenger, &s, now).await;

    assert_eq!(outcome.report, ReportKind::DegradedStats);
    // Date advanced even though the numeric report failed.
    assert_eq!(store.stored_date(), FRESH_DATE);
    assert_eq!(store.date_writes.lock().unwrap().clone(), vec![FRESH_DATE]);
    assert!(store.rows.lock().unwrap().is_empty(), "no stat row on the degraded path");

    let sent = messenger.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].1.contains(&s.stats_url));
    assert!(sent[0].1.contains("Error message:"));
}

#[tokio::test]
async fn unchanged_date_sends_per_channel_heartbeats() {
    let s = sources();
    let now = Utc::now();
    let store = MockStore::new(now - Duration::seconds(3725), FRESH_DATE);
    // Fetched date equals stored date: heartbeat regardless of title.
    let fetcher = healthy_fetcher(&s);
    let messenger = MockMessenger::default();

    let outcome = run(&store, &fetcher, &messenger, &s, now).await;

    assert_eq!(outcome.report, ReportKind::Heartbeat);
    assert_eq!(store.stored_date(), FRESH_DATE);
    assert!(store.rows.lock().unwrap().is_empty());
    assert!(store.date_writes.lock().unwrap().is_empty());

    let sent = messenger.sent();
    assert_eq!(sent.len(), 2);
    let whatsapp = sent.iter().find(|(c, _)| *c == Channel::WhatsApp).unwrap();
    let telegram = sent.iter().find(|(c, _)| *c == Channel::Telegram).unwrap();
    // Elapsed renders H:MM:SS and both carry the last known case count.
    assert!(whatsapp.1.contains("1:02:05"));
    assert!(telegram.1.contains("1:02:05"));
    assert!(whatsapp.1.contains("1012"));
    // Only the WhatsApp template includes the sandbox reconnect hint.
    assert!(whatsapp.1.contains("join jack-full"));
    assert!(!telegram.1.contains("join jack-full"));
}

#[tokio::test]
async fn irrelevant_title_is_a_heartbeat() {
    let s = sources();
    let now = Utc::now();
    let store = MockStore::new(now - Duration::hours(1), STORED_DATE);
    let fetcher = MockFetcher::new(&[
        (s.article_date.as_str(), Lookup::Text(FRESH_DATE)),
        (s.article_title.as_str(), Lookup::Text("Budget cantonal 2021 adopté")),
        (s.new_cases.as_str(), Lookup::Text("1,012")),
    ]);
    let messenger = MockMessenger::default();

    let outcome = run(&store, &fetcher, &messenger, &s, now).await;

    assert_eq!(outcome.report, ReportKind::Heartbeat);
    assert_eq!(store.stored_date(), STORED_DATE);
}

#[tokio::test]
async fn canton_page_failure_warns_and_leaves_state_untouched() {
    let s = sources();
    let now = Utc::now();
    let store = MockStore::new(now - Duration::hours(1), STORED_DATE);
    let fetcher = MockFetcher::new(&[
        (s.article_date.as_str(), Lookup::Network),
        (s.new_cases.as_str(), Lookup::Text("1,012")),
    ]);
    let messenger = MockMessenger::default();

    let outcome = run(&store, &fetcher, &messenger, &s, now).await;

    assert_eq!(outcome.report, ReportKind::SourceUnavailable);
    assert_eq!(store.stored_date(), STORED_DATE);
    assert!(store.rows.lock().unwrap().is_empty());

    // The warning names the canton source and the error, on both channels,
    // and no other message goes out this cycle.
    let sent = messenger.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].1.contains(&s.canton_url));
    assert!(sent[0].1.contains("connection reset"));
}

#[tokio::test]
async fn missing_new_case_count_warns_then_continues_with_sentinel() {
    let s = sources();
    let now = Utc::now();
    let store = MockStore::new(now - Duration::hours(1), FRESH_DATE);
    // Stats page down entirely; canton page healthy but unchanged.
    let fetcher = MockFetcher::new(&[
        (s.article_date.as_str(), Lookup::Text(FRESH_DATE)),
        (s.article_title.as_str(), Lookup::Text(FRESH_TITLE)),
    ]);
    let messenger = MockMessenger::default();

    let outcome = run(&store, &fetcher, &messenger, &s, now).await;

    assert_eq!(outcome.report, ReportKind::Heartbeat);

    // Two stats warnings plus two heartbeats.
    let sent = messenger.sent();
    assert_eq!(sent.len(), 4);
    assert!(sent[0].1.contains("⚠️"));
    assert!(sent[2].1.contains(VALUE_NOT_AVAILABLE));
    assert!(sent[3].1.contains(VALUE_NOT_AVAILABLE));
}

#[tokio::test]
async fn failed_stat_row_write_still_notifies() {
    let s = sources();
    let now = Utc::now();
    let store = MockStore::failing_writes(now - Duration::hours(1), STORED_DATE);
    let fetcher = healthy_fetcher(&s);
    let messenger = MockMessenger::default();

    let result = run_cycle(&store, &fetcher, &messenger, &s, KEYWORDS, "Anthony", now).await;

    // The cycle aborts, but never silently: the write failure goes out as a
    // warning on both channels first.
    assert!(result.is_err());
    assert_eq!(store.stored_date(), STORED_DATE);

    let sent = messenger.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].1.contains("could not be written to the spreadsheet"));
    assert!(sent[0].1.contains("sheets API 503"));
}

#[tokio::test]
async fn fresh_update_suppresses_realert_next_cycle() {
    let s = sources();
    let now = Utc::now();
    let store = MockStore::new(now - Duration::hours(1), STORED_DATE);
    let fetcher = healthy_fetcher(&s);
    let messenger = MockMessenger::default();

    let first = run(&store, &fetcher, &messenger, &s, now).await;
    assert_eq!(first.report, ReportKind::FreshUpdate);

    // Same article next cycle: novelty test now fails.
    let second = run(&store, &fetcher, &messenger, &s, now).await;
    assert_eq!(second.report, ReportKind::Heartbeat);
    assert_eq!(store.rows.lock().unwrap().len(), 1);
}
