pub mod auth;
pub mod error;

pub use auth::{ServiceAccountKey, TokenProvider};
pub use error::{Result, SheetsError};

use serde_json::json;
use tracing::debug;

const BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Client for the first sheet of one spreadsheet, addressed by (row, col)
/// coordinates (1-based, matching the sheet UI).
pub struct SheetsClient {
    client: reqwest::Client,
    auth: TokenProvider,
    spreadsheet_id: String,
}

impl SheetsClient {
    pub fn new(key: ServiceAccountKey, spreadsheet_id: &str) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            auth: TokenProvider::new(key)?,
            spreadsheet_id: spreadsheet_id.to_string(),
        })
    }

    /// Read a single cell. Empty cells come back as `None`.
    pub async fn read_cell(&self, row: u32, col: u32) -> Result<Option<String>> {
        let range = cell_range(row, col);
        let token = self.auth.token().await?;
        let url = format!("{}/{}/values/{}", BASE_URL, self.spreadsheet_id, range);

        let resp = self.client.get(&url).bearer_auth(&token).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = resp.json().await?;
        let value = body
            .get("values")
            .and_then(|v| v.get(0))
            .and_then(|r| r.get(0))
            .and_then(|c| c.as_str())
            .map(String::from);
        Ok(value)
    }

    /// Write a single cell, overwriting its value.
    pub async fn update_cell(&self, row: u32, col: u32, value: &str) -> Result<()> {
        let range = cell_range(row, col);
        self.write_range(&range, vec![vec![value.to_string()]])
            .await
    }

    /// Insert a new row at `index` (1-based), shifting existing rows down,
    /// then fill it with `values` starting at column A.
    pub async fn insert_row(&self, index: u32, values: &[String]) -> Result<()> {
        let token = self.auth.token().await?;
        let url = format!("{}/{}:batchUpdate", BASE_URL, self.spreadsheet_id);

        let body = json!({
            "requests": [{
                "insertDimension": {
                    "range": {
                        "sheetId": 0,
                        "dimension": "ROWS",
                        "startIndex": index - 1,
                        "endIndex": index,
                    },
                    "inheritFromBefore": false,
                }
            }]
        });

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let end_col = col_letter(values.len().max(1) as u32);
        let range = format!("A{index}:{end_col}{index}");
        self.write_range(&range, vec![values.to_vec()]).await?;

        debug!(index, cells = values.len(), "Inserted spreadsheet row");
        Ok(())
    }

    async fn write_range(&self, range: &str, values: Vec<Vec<String>>) -> Result<()> {
        let token = self.auth.token().await?;
        let url = format!(
            "{}/{}/values/{}?valueInputOption=RAW",
            BASE_URL, self.spreadsheet_id, range
        );

        let resp = self
            .client
            .put(&url)
            .bearer_auth(&token)
            .json(&json!({ "values": values }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}

/// A1 range for a single (row, col) cell, e.g. (3, 2) -> "B3".
fn cell_range(row: u32, col: u32) -> String {
    format!("{}{}", col_letter(col), row)
}

/// 1-based column index to letters: 1 -> A, 26 -> Z, 27 -> AA.
fn col_letter(mut col: u32) -> String {
    debug_assert!(col >= 1);
    let mut letters = Vec::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        letters.push(b'A' + rem);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).expect("ASCII only")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn col_letters() {
        assert_eq!(col_letter(1), "A");
        assert_eq!(col_letter(2), "B");
        assert_eq!(col_letter(26), "Z");
        assert_eq!(col_letter(27), "AA");
        assert_eq!(col_letter(52), "AZ");
    }

    #[test]
    fn cell_ranges_match_sheet_layout() {
        // Launch timestamp lives at (3,2), last article date at (6,1).
        assert_eq!(cell_range(3, 2), "B3");
        assert_eq!(cell_range(6, 1), "A6");
    }
}
