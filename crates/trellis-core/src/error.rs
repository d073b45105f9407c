//! Error types for Trellis core.

use thiserror::Error;

/// The main error type for Trellis core operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Dispatch-related error.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

/// Errors raised while marshaling a call onto an owning thread.
///
/// A panic inside the marshaled closure is *not* an error: it is re-raised on
/// the calling thread unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The owning thread's dispatcher was shut down or dropped before the
    /// call could run.
    #[error("dispatcher '{name}' has shut down")]
    Disconnected {
        /// Name of the dispatcher the call was sent to.
        name: String,
    },
}

/// A specialized Result type for Trellis core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
