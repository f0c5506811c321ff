use thiserror::Error;

#[derive(Error, Debug)]
pub enum CantonWatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
