use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The page rendered but the requested element never appeared, even
    /// after the bounded wait.
    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}
