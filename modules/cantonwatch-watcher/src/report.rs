//! Message bodies for the four report paths. All formatting is pure so the
//! exact texts can be asserted in tests.

use chrono::Duration;

use cantonwatch_common::{ArticleSnapshot, StatSnapshot};

use crate::sources::SourceTable;
use crate::traits::Channel;

/// Render elapsed uptime as `H:MM:SS`, with a day prefix past 24 hours
/// (`"2 days, 1:02:05"`).
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.num_seconds().max(0);
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    let clock = format!("{hours}:{minutes:02}:{seconds:02}");
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

/// The full report for a new, relevant article with all four stats.
pub fn fresh_update(
    recipient: &str,
    article: &ArticleSnapshot,
    stats: &StatSnapshot,
    sources: &SourceTable,
) -> String {
    format!(
        "Hi {recipient}!\n\n\
         A new article about COVID-19 has been published on the canton website \
         (date: {date}, title: {title}, link: {canton}).\n\n\
         Here are a few fresh numbers for Switzerland:\n\
         - Number of last day new cases: {new_cases}\n\
         - Number of total laboratory-confirmed cases: {total_cases}\n\
         - Number of total deaths: {total_deaths}\n\
         - Number of total recovered cases: {total_recovered}\n\
         (Info taken from: {stats_url})\n\n\
         Have a nice day! See you! 😉",
        date = article.date,
        title = article.title,
        canton = sources.canton_url,
        new_cases = stats.last_day_new_cases,
        total_cases = stats.total_cases,
        total_deaths = stats.total_deaths,
        total_recovered = stats.total_recovered,
        stats_url = sources.stats_url,
    )
}

/// Sent instead of the numeric report when the stats page broke mid-update.
pub fn degraded_stats(sources: &SourceTable, error: &str) -> String {
    format!(
        "⚠️ Either the statistics page ({}) is not available or some of its \
         selectors have changed. Error message: {error}",
        sources.stats_url,
    )
}

/// Warning for the early new-case-count fetch (the cycle continues with the
/// sentinel value).
pub fn stats_unavailable(sources: &SourceTable, error: &str) -> String {
    format!(
        "⚠️ Either the statistics page ({}) or the number of last day new \
         cases is not available. Error message: {error}",
        sources.stats_url,
    )
}

/// Warning when the canton news page itself could not be read; ends the cycle.
pub fn canton_unavailable(sources: &SourceTable, error: &str) -> String {
    format!(
        "⚠️ Either the canton news page ({}) or the selectors for its most \
         recent article have changed. Error message: {error}",
        sources.canton_url,
    )
}

/// Warning when the spreadsheet rejected a state write mid-cycle. The cycle
/// still aborts afterwards, but not silently.
pub fn state_write_failed(error: &str) -> String {
    format!(
        "⚠️ A new article was detected but the update could not be written to \
         the spreadsheet. Error message: {error}"
    )
}

/// Startup warning when the spreadsheet cannot be initialized.
pub fn spreadsheet_unavailable(spreadsheet_id: &str, error: &str) -> String {
    format!(
        "Error while trying to work with the spreadsheet \"{spreadsheet_id}\"...\n\
         Error message:\n{error}"
    )
}

/// Liveness heartbeat. The WhatsApp variant carries the Twilio sandbox
/// reconnect hint; the Telegram one does not. Intentional per-channel
/// customization, not drift.
pub fn heartbeat(
    channel: Channel,
    elapsed: Duration,
    last_update_date: &str,
    last_day_new_cases: &str,
) -> String {
    let base = format!(
        "App still running (since {elapsed}), but no recent article about \
         COVID-19 has been published on the canton website... (last article \
         date: {last_update_date}). Number of last day new cases in 🇨🇭: \
         {last_day_new_cases}.",
        elapsed = format_elapsed(elapsed),
    );
    match channel {
        Channel::WhatsApp => format!(
            "{base}\n(In case you haven't received messages for some time, you \
             might be outside the free temporal Twilio window, please reconnect \
             to the sandbox by sending 'join jack-full' to the Twilio number)"
        ),
        Channel::Telegram => base,
    }
}
