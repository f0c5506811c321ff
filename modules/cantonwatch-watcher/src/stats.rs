//! Numeric-fact extraction from the statistics page.

use std::sync::LazyLock;

use anyhow::{anyhow, Context, Result};
use regex::Regex;

use cantonwatch_common::StatSnapshot;

use crate::sources::SourceTable;
use crate::traits::ElementFetcher;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("static regex"));

/// First integer run in the text after stripping thousands separators.
/// The stats page renders counts like `1,012` or `570'645` inside prose.
pub fn extract_count(text: &str) -> Option<String> {
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, ',' | '\'' | '\u{2019}' | '\u{202f}'))
        .collect();
    NUMBER.find(&stripped).map(|m| m.as_str().to_string())
}

/// Yesterday's new-case count, fetched early in the cycle so heartbeats can
/// carry it too.
pub async fn fetch_new_case_count(
    fetcher: &dyn ElementFetcher,
    sources: &SourceTable,
) -> Result<String> {
    let text = fetcher
        .locate_text(&sources.stats_url, &sources.new_cases)
        .await
        .context("fetching last day new cases")?;
    extract_count(&text).ok_or_else(|| anyhow!("no number found in element text {text:?}"))
}

/// The three totals, combined with the already-fetched new-case count into a
/// full snapshot. Any failure here aborts the whole snapshot; the caller
/// falls back to the degraded report.
pub async fn fetch_stat_totals(
    fetcher: &dyn ElementFetcher,
    sources: &SourceTable,
    last_day_new_cases: &str,
) -> Result<StatSnapshot> {
    let total_cases = fetch_total(fetcher, sources, &sources.total_cases, "total cases").await?;
    let total_recovered =
        fetch_total(fetcher, sources, &sources.total_recovered, "total recovered").await?;
    let total_deaths = fetch_total(fetcher, sources, &sources.total_deaths, "total deaths").await?;

    Ok(StatSnapshot {
        last_day_new_cases: last_day_new_cases.to_string(),
        total_cases,
        total_recovered,
        total_deaths,
    })
}

async fn fetch_total(
    fetcher: &dyn ElementFetcher,
    sources: &SourceTable,
    selector: &str,
    what: &str,
) -> Result<String> {
    let text = fetcher
        .locate_text(&sources.stats_url, selector)
        .await
        .with_context(|| format!("fetching {what}"))?;
    extract_count(&text).ok_or_else(|| anyhow!("no number found in {what} element text {text:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(extract_count("1,012"), Some("1012".to_string()));
        assert_eq!(extract_count("570'645 cas confirmés"), Some("570645".to_string()));
        assert_eq!(extract_count("+ 1,012 nouveaux cas"), Some("1012".to_string()));
    }

    #[test]
    fn no_digits_means_no_count() {
        assert_eq!(extract_count("n/a"), None);
        assert_eq!(extract_count(""), None);
    }
}
