//! Error types for the overlay.
//!
//! Nothing here is retried: every variant travels up to `main` and ends the
//! process with a message.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to start pointer listener: {0}")]
    Listener(#[source] std::io::Error),
    #[error("window error: {0}")]
    Window(String),
}

pub type Result<T> = std::result::Result<T, Error>;
