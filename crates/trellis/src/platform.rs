//! Rendering backend capabilities.
//!
//! A process has at most one active rendering backend. Its declared
//! [`PlatformFeatures`] are read once, the first time anything asks, and the
//! answer is then fixed for the lifetime of the process.
//!
//! The feature the cell system cares about is
//! [`PlatformFeatures::CUSTOM_CELL_SUPPORTS_CONTROL_VIEW`]: whether the backend
//! can host a live control inside a cell that is *not* being edited. Backends
//! without it paint non-editing cells and only materialize controls while a
//! cell is in edit mode.
//!
//! ```
//! use trellis::platform::{self, PlatformFeatures, RenderBackend};
//!
//! struct Retained;
//!
//! impl RenderBackend for Retained {
//!     fn name(&self) -> &str {
//!         "retained"
//!     }
//!
//!     fn supported_features(&self) -> PlatformFeatures {
//!         PlatformFeatures::CUSTOM_CELL_SUPPORTS_CONTROL_VIEW
//!     }
//! }
//!
//! platform::install_backend(Retained).unwrap();
//! assert!(platform::supports_control_view());
//! ```

use std::sync::OnceLock;

use bitflags::bitflags;
use thiserror::Error;

use crate::cell::TARGET;
use crate::error::Result;

bitflags! {
    /// Optional features a rendering backend may declare.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PlatformFeatures: u32 {
        /// Custom cells can show a live control outside edit mode.
        const CUSTOM_CELL_SUPPORTS_CONTROL_VIEW = 1 << 0;
    }
}

/// The rendering backend the process draws through.
pub trait RenderBackend: Send + Sync + 'static {
    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;

    /// Features this backend supports.
    fn supported_features(&self) -> PlatformFeatures;
}

/// A backend that declares no optional features.
///
/// This is what capability queries fall back to when no backend was
/// installed before the first query.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessBackend;

impl RenderBackend for HeadlessBackend {
    fn name(&self) -> &str {
        "headless"
    }

    fn supported_features(&self) -> PlatformFeatures {
        PlatformFeatures::empty()
    }
}

/// Errors raised while configuring the process backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// A backend has already been installed.
    #[error("a rendering backend is already installed ('{name}')")]
    BackendAlreadyInstalled {
        /// Name of the installed backend.
        name: String,
    },
    /// Capabilities were already read; installing now would change them.
    #[error("backend capabilities were already resolved; install the backend before first use")]
    CapabilitiesResolved,
}

/// The backend the process committed to, and the features read from it.
struct Resolved {
    backend: Option<Box<dyn RenderBackend>>,
    features: PlatformFeatures,
}

static RESOLVED: OnceLock<Resolved> = OnceLock::new();

/// Install the process rendering backend.
///
/// Installing and the first capability read commit through the same cell, so
/// an install either decides the flag or fails.
///
/// # Errors
///
/// Fails with [`PlatformError::BackendAlreadyInstalled`] if a backend is
/// already installed, or [`PlatformError::CapabilitiesResolved`] if
/// capabilities were already resolved without one (by an earlier call to
/// [`features`] or [`supports_control_view`]).
pub fn install_backend<B: RenderBackend>(backend: B) -> Result<()> {
    let features = backend.supported_features();
    let name = backend.name().to_string();
    let resolved = Resolved {
        backend: Some(Box::new(backend)),
        features,
    };

    if RESOLVED.set(resolved).is_err() {
        let error = match backend_name() {
            Some(installed) => PlatformError::BackendAlreadyInstalled {
                name: installed.to_string(),
            },
            None => PlatformError::CapabilitiesResolved,
        };
        tracing::warn!(target: TARGET, backend = %name, %error, "backend install rejected");
        return Err(error.into());
    }

    tracing::debug!(target: TARGET, backend = %name, ?features, "rendering backend installed");
    Ok(())
}

/// Name of the installed backend, if any.
pub fn backend_name() -> Option<&'static str> {
    RESOLVED.get()?.backend.as_deref().map(|b| b.name())
}

/// The features of the active backend, resolved once per process.
pub fn features() -> PlatformFeatures {
    RESOLVED
        .get_or_init(|| {
            let features = HeadlessBackend.supported_features();
            tracing::debug!(
                target: TARGET,
                ?features,
                "no backend installed, using headless features"
            );
            Resolved {
                backend: None,
                features,
            }
        })
        .features
}

/// Whether custom cells can use a control for their view (non-edit) mode.
///
/// When `false`, non-editing cells are painted through the paint channel and
/// controls are only created while a cell is being edited.
pub fn supports_control_view() -> bool {
    features().contains(PlatformFeatures::CUSTOM_CELL_SUPPORTS_CONTROL_VIEW)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_backend_has_no_features() {
        assert_eq!(HeadlessBackend.supported_features(), PlatformFeatures::empty());
        assert_eq!(HeadlessBackend.name(), "headless");
    }

    #[test]
    fn test_empty_features_exclude_control_view() {
        let control_view = PlatformFeatures::CUSTOM_CELL_SUPPORTS_CONTROL_VIEW;
        assert!(!PlatformFeatures::empty().contains(control_view));
        assert!(PlatformFeatures::all().contains(control_view));
    }
}
