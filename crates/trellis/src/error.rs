//! Error types for the cell system.

use thiserror::Error;
use trellis_core::DispatchError;

use crate::platform::PlatformError;

/// Errors raised by the cell system.
///
/// Faults inside provider code are panics and are never turned into a
/// `CellError`; they propagate to whoever triggered the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    /// The call could not be marshaled onto the owning thread.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// Backend configuration failed.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// A specialized Result type for cell operations.
pub type Result<T> = std::result::Result<T, CellError>;
