pub mod error;

pub use error::{FetchError, Result};

use std::time::Duration;

use scraper::{Html, Selector};
use tracing::debug;

/// How long the rendering service waits for a selector to appear before the
/// page is returned without it.
const ELEMENT_WAIT: Duration = Duration::from_secs(20);

/// Overall HTTP timeout per /content call. Must exceed [`ELEMENT_WAIT`] or
/// the transport gives up before the wait does.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

pub struct BrowserlessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BrowserlessClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    /// Fetch fully-rendered HTML for a URL via the Browserless /content
    /// endpoint, waiting up to [`ELEMENT_WAIT`] for `wait_for` to appear.
    pub async fn content(&self, url: &str, wait_for: Option<&str>) -> Result<String> {
        let mut endpoint = format!("{}/content", self.base_url);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }

        let mut body = serde_json::json!({ "url": url });
        if let Some(selector) = wait_for {
            body["waitForSelector"] = serde_json::json!({
                "selector": selector,
                "timeout": ELEMENT_WAIT.as_millis() as u64,
            });
        }

        let resp = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }

    /// Render `url` and return the text of the first element matching
    /// `selector`. Signals [`FetchError::ElementNotFound`] when the page
    /// rendered but the element never appeared; transport and API failures
    /// surface as their own variants.
    pub async fn locate_text(&self, url: &str, selector: &str) -> Result<String> {
        let html = self.content(url, Some(selector)).await?;
        debug!(url, selector, bytes = html.len(), "Page rendered");
        extract_text(&html, selector)
    }
}

/// Select the first element matching `selector` and return its trimmed text.
pub fn extract_text(html: &str, selector: &str) -> Result<String> {
    let parsed = Selector::parse(selector)
        .map_err(|e| FetchError::InvalidSelector(format!("{selector}: {e}")))?;

    let document = Html::parse_document(html);
    let element = document
        .select(&parsed)
        .next()
        .ok_or_else(|| FetchError::ElementNotFound {
            selector: selector.to_string(),
        })?;

    Ok(element.text().collect::<String>().trim().to_string())
}
