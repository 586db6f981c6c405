//! Centralized error type for the cadenza umbrella crate.
//!
//! Wraps subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] cadenza_core::Error),

    #[cfg(feature = "automation")]
    #[error("Automation: {0}")]
    Automation(#[from] cadenza_automation::AutomationError),
}

pub type Result<T> = std::result::Result<T, Error>;
