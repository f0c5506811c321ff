//! One retrieve-compare-notify pass. Exactly one main-path message goes out
//! per cycle: fresh update, degraded-stats warning, heartbeat, or the
//! canton-source-unavailable warning. The early new-case fetch may add an
//! independent warning without replacing the main message.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use cantonwatch_common::{ArticleSnapshot, CycleState, VALUE_NOT_AVAILABLE};

use crate::detector::{decide, Decision};
use crate::report;
use crate::sources::SourceTable;
use crate::stats;
use crate::traits::{Channel, ElementFetcher, Messenger, StateStore, CHANNELS};

/// Which report path a cycle took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    FreshUpdate,
    DegradedStats,
    Heartbeat,
    SourceUnavailable,
}

#[derive(Debug)]
pub struct CycleOutcome {
    pub report: ReportKind,
    /// State after the cycle, persisted by the store on the fresh paths.
    pub state: CycleState,
}

pub async fn run_cycle(
    store: &dyn StateStore,
    fetcher: &dyn ElementFetcher,
    messenger: &dyn Messenger,
    sources: &SourceTable,
    keywords: &[&str],
    recipient: &str,
    now: DateTime<Utc>,
) -> Result<CycleOutcome> {
    let mut state = store.read_state().await.context("reading cycle state")?;
    info!(
        last_update_date = state.last_update_date.as_str(),
        "Cycle started"
    );

    // Fetched up front so heartbeats carry it too. Failure substitutes the
    // sentinel, warns, and the cycle continues.
    let last_day_new_cases = match stats::fetch_new_case_count(fetcher, sources).await {
        Ok(count) => count,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "New-case count unavailable");
            broadcast(
                messenger,
                &report::stats_unavailable(sources, &format!("{e:#}")),
            )
            .await;
            VALUE_NOT_AVAILABLE.to_string()
        }
    };

    // The canton page is the novelty source; without it the cycle ends with
    // a warning and untouched state.
    let article = match fetch_article(fetcher, sources).await {
        Ok(a) => a,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Canton news page unavailable");
            broadcast(
                messenger,
                &report::canton_unavailable(sources, &format!("{e:#}")),
            )
            .await;
            return Ok(CycleOutcome {
                report: ReportKind::SourceUnavailable,
                state,
            });
        }
    };

    match decide(&article, &state.last_update_date, keywords) {
        Decision::FreshUpdate => {
            let report_kind = match stats::fetch_stat_totals(fetcher, sources, &last_day_new_cases)
                .await
            {
                Ok(snapshot) => {
                    // A write failure must not leave the cycle silent: warn
                    // over both channels, then abort the cycle.
                    if let Err(e) = store.insert_stat_row(&snapshot.to_row(&article.date)).await {
                        warn!(error = %format!("{e:#}"), "Stat row write failed after fresh detection");
                        broadcast(messenger, &report::state_write_failed(&format!("{e:#}"))).await;
                        return Err(e.context("logging stat row"));
                    }
                    broadcast(
                        messenger,
                        &report::fresh_update(recipient, &article, &snapshot, sources),
                    )
                    .await;
                    info!(
                        date = article.date.as_str(),
                        title = article.title.as_str(),
                        "Fresh update reported"
                    );
                    ReportKind::FreshUpdate
                }
                Err(e) => {
                    // The article is still genuinely new; the date advances
                    // so the same article does not re-alert next cycle.
                    warn!(error = %format!("{e:#}"), "Stats page broke mid-update, sending degraded report");
                    broadcast(messenger, &report::degraded_stats(sources, &format!("{e:#}"))).await;
                    if let Err(e) = store.advance_date(&article.date).await {
                        warn!(error = %format!("{e:#}"), "Date write failed after degraded report");
                        broadcast(messenger, &report::state_write_failed(&format!("{e:#}"))).await;
                        return Err(e.context("advancing article date"));
                    }
                    ReportKind::DegradedStats
                }
            };
            state.last_update_date = article.date.clone();
            Ok(CycleOutcome {
                report: report_kind,
                state,
            })
        }
        Decision::Heartbeat => {
            let elapsed = now - state.launch_time;
            for channel in CHANNELS {
                let body = report::heartbeat(
                    channel,
                    elapsed,
                    &state.last_update_date,
                    &last_day_new_cases,
                );
                send_logged(messenger, channel, &body).await;
            }
            info!("Heartbeat sent");
            Ok(CycleOutcome {
                report: ReportKind::Heartbeat,
                state,
            })
        }
    }
}

async fn fetch_article(
    fetcher: &dyn ElementFetcher,
    sources: &SourceTable,
) -> Result<ArticleSnapshot> {
    let date = fetcher
        .locate_text(&sources.canton_url, &sources.article_date)
        .await
        .context("fetching most recent article date")?;
    let title = fetcher
        .locate_text(&sources.canton_url, &sources.article_title)
        .await
        .context("fetching most recent article title")?;
    Ok(ArticleSnapshot { date, title })
}

/// Send the same body over both channels.
pub async fn broadcast(messenger: &dyn Messenger, body: &str) {
    for channel in CHANNELS {
        send_logged(messenger, channel, body).await;
    }
}

/// Fire-and-forget send: a channel failure is logged, never escalated.
async fn send_logged(messenger: &dyn Messenger, channel: Channel, body: &str) {
    if let Err(e) = messenger.send(channel, body).await {
        warn!(?channel, error = %format!("{e:#}"), "Failed to send notification");
    }
}
