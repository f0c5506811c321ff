pub mod config;
pub mod credentials;
pub mod error;
pub mod types;

pub use config::Config;
pub use credentials::Credentials;
pub use error::CantonWatchError;
pub use types::*;
