//! Error types for cadenza-automation.

use thiserror::Error;

/// Errors surfaced by [`automate`](crate::AutomatedParameter::automate).
///
/// Unusable clock state is never an error: the origin falls back to the
/// last render time. Stopping an idle parameter is a no-op.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AutomationError {
    /// The engine refused the render observer. Automation did not start and
    /// any previous automation on the parameter has already been stopped.
    #[error("Render observer registration failed: {0}")]
    RegistrationFailed(#[source] cadenza_core::Error),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, AutomationError>;
