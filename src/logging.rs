//! Tracing bootstrap.
//!
//! `RUST_LOG` wins over the configured default filter. Installing twice is
//! a no-op.

use std::sync::OnceLock;

use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INSTALLED: OnceLock<()> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter `{filter}`: {reason}")]
    InvalidFilter { filter: String, reason: String },
    #[error("Another global subscriber is already installed")]
    ForeignSubscriber,
}

pub fn init_tracing(default_filter: &str) -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter).map_err(|e| LoggingError::InvalidFilter {
            filter: default_filter.to_string(),
            reason: e.to_string(),
        })?,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .map_err(|_| LoggingError::ForeignSubscriber)?;

    let _ = INSTALLED.set(());
    Ok(())
}
