use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder substituted for any numeric fact that could not be extracted.
pub const VALUE_NOT_AVAILABLE: &str = "(value not available)";

/// Persistent state carried between cycles, stored in the spreadsheet.
///
/// `last_update_date` changes at most once per cycle, and only when a new,
/// keyword-matching article was detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleState {
    pub launch_time: DateTime<Utc>,
    pub last_update_date: String,
}

/// The most recent article on the canton news page, fetched fresh each cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSnapshot {
    pub date: String,
    pub title: String,
}

/// Best-effort COVID statistics scraped from the tracker page. Any field may
/// hold [`VALUE_NOT_AVAILABLE`] when extraction failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot {
    pub last_day_new_cases: String,
    pub total_cases: String,
    pub total_recovered: String,
    pub total_deaths: String,
}

impl StatSnapshot {
    /// Spreadsheet row appended on each fresh update:
    /// `[date, last_day_new_cases, total_cases, total_recovered, total_deaths]`.
    pub fn to_row(&self, date: &str) -> Vec<String> {
        vec![
            date.to_string(),
            self.last_day_new_cases.clone(),
            self.total_cases.clone(),
            self.total_recovered.clone(),
            self.total_deaths.clone(),
        ]
    }
}
