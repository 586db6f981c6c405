//! Error types for cadenza-core.

use thiserror::Error;

/// Error type for cadenza-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Render observer list is full (capacity {capacity})")]
    ObserverCapacity { capacity: usize },

    #[error("Engine has been shut down")]
    EngineShutdown,

    #[error("Render cycle of {frames} frames exceeds the maximum of {max}")]
    CycleTooLarge { frames: u32, max: u32 },

    #[error("Engine is not in manual rendering mode")]
    NotInManualMode,

    #[error("Realtime render driver has already been taken")]
    DriverTaken,

    #[error("Engine is in manual rendering mode")]
    ManualModeActive,

    #[error("Duplicate parameter address: {0:#x}")]
    DuplicateParameter(u64),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
